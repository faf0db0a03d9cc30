use std::io;

use thiserror::Error;

use crate::outline::BlockId;

/// A broken tree invariant or a reference to a block that is not in the tree.
///
/// Boundary conditions (first block, top level, no previous sibling) are not
/// errors; operations report those as `Ok(None)`. Anything in here means a
/// previous mutation or a stale reference left the outline inconsistent and
/// the command that saw it must not commit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutlineError {
    #[error("unknown block {0}")]
    UnknownBlock(BlockId),

    #[error("block {block} names {parent} as parent, but {parent} does not list it")]
    Orphaned { block: BlockId, parent: BlockId },

    #[error("block {child} is listed by {listed_by}, but its parent is {recorded:?}")]
    ParentMismatch {
        child: BlockId,
        listed_by: BlockId,
        recorded: Option<BlockId>,
    },

    #[error("block {0} is reachable more than once from the root")]
    Cycle(BlockId),

    #[error("duplicate block id {0}")]
    DuplicateId(BlockId),

    #[error("block {0} is not reachable from the root")]
    Unreachable(BlockId),

    #[error("cursor refers to block {0}, which is not in the outline")]
    StaleCursor(BlockId),
}

pub type OutlineResult<T> = Result<T, OutlineError>;

/// Failure while reading or writing a persisted outline.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed outline document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inconsistent outline document: {0}")]
    Outline(#[from] OutlineError),
}

/// Command-line usage problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("invalid wrap width: {0}")]
    InvalidWidth(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}
