use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{OutlineError, OutlineResult};

mod restructure;
mod text;
mod traversal;

pub use restructure::{Indented, Merged, Outdented, Split};
pub use text::{byte_index, char_len, clamp_offset, split_at_char};
pub use traversal::Preorder;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    content: String,
    children: Vec<BlockId>,
    // None only for the root.
    parent: Option<BlockId>,
}

impl Block {
    fn new(id: BlockId, content: String, parent: Option<BlockId>) -> Self {
        Self {
            id,
            content,
            children: Vec::new(),
            parent,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn children(&self) -> &[BlockId] {
        &self.children
    }

    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The persisted shape of a block: `{id, content, children?}`.
///
/// Also serves as the builder for literal trees. An empty `children` list is
/// never written out, and a missing `id` in a hand-written document gets a
/// fresh one on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    #[serde(default)]
    pub id: BlockId,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockRecord>,
}

impl BlockRecord {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(),
            content: content.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<BlockRecord>) -> Self {
        self.children = children;
        self
    }

    pub fn with_id(mut self, id: BlockId) -> Self {
        self.id = id;
        self
    }
}

/// A tree of blocks stored as an arena keyed by id.
///
/// The root is a hidden container: its children are the top-level blocks of
/// the document and it never takes part in document order itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outline {
    root: BlockId,
    blocks: HashMap<BlockId, Block>,
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Outline {
    pub fn new() -> Self {
        let root = BlockId::new();
        let mut outline = Self {
            root,
            blocks: HashMap::from([(root, Block::new(root, String::new(), None))]),
        };
        outline.ensure_initialized();
        outline
    }

    pub fn from_record(record: BlockRecord) -> OutlineResult<Self> {
        let root = record.id;
        let mut blocks = HashMap::new();
        insert_record(&mut blocks, record, None)?;
        Ok(Self { root, blocks })
    }

    pub fn to_record(&self) -> OutlineResult<BlockRecord> {
        self.record_for(self.root)
    }

    fn record_for(&self, id: BlockId) -> OutlineResult<BlockRecord> {
        let block = self.block(id)?;
        let children = block
            .children
            .iter()
            .map(|child| self.record_for(*child))
            .collect::<OutlineResult<Vec<_>>>()?;
        Ok(BlockRecord {
            id,
            content: block.content.clone(),
            children,
        })
    }

    /// Adds an empty top-level block when the document has none, so there is
    /// always something to place the cursor in.
    pub fn ensure_initialized(&mut self) -> Option<BlockId> {
        let root = self.blocks.get(&self.root)?;
        if root.has_children() {
            return None;
        }
        let id = BlockId::new();
        self.blocks
            .insert(id, Block::new(id, String::new(), Some(self.root)));
        if let Some(root) = self.blocks.get_mut(&self.root) {
            root.children.push(id);
        }
        Some(id)
    }

    pub fn root(&self) -> BlockId {
        self.root
    }

    // Counts the root.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn block(&self, id: BlockId) -> OutlineResult<&Block> {
        self.blocks.get(&id).ok_or(OutlineError::UnknownBlock(id))
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> OutlineResult<&mut Block> {
        self.blocks.get_mut(&id).ok_or(OutlineError::UnknownBlock(id))
    }

    pub fn content(&self, id: BlockId) -> OutlineResult<&str> {
        Ok(self.block(id)?.content())
    }

    pub fn children(&self, id: BlockId) -> OutlineResult<&[BlockId]> {
        Ok(self.block(id)?.children())
    }

    pub fn parent(&self, id: BlockId) -> OutlineResult<Option<BlockId>> {
        Ok(self.block(id)?.parent)
    }

    pub fn set_content(&mut self, id: BlockId, content: impl Into<String>) -> OutlineResult<()> {
        self.block_mut(id)?.content = content.into();
        Ok(())
    }

    /// The parent of `id` and the position of `id` among its children.
    ///
    /// `Ok(None)` for the root. A parent that does not list the block is an
    /// orphaned reference and is reported as an error rather than tolerated.
    pub fn parent_and_index(&self, id: BlockId) -> OutlineResult<Option<(BlockId, usize)>> {
        let Some(parent) = self.block(id)?.parent else {
            return Ok(None);
        };
        let index = self
            .block(parent)
            .map_err(|_| OutlineError::Orphaned { block: id, parent })?
            .children
            .iter()
            .position(|child| *child == id)
            .ok_or(OutlineError::Orphaned { block: id, parent })?;
        Ok(Some((parent, index)))
    }

    pub fn depth(&self, id: BlockId) -> OutlineResult<usize> {
        Ok(self.ancestors(id)?.len())
    }

    /// Ancestors of `id`, outermost first, excluding the hidden root.
    pub fn ancestors(&self, id: BlockId) -> OutlineResult<Vec<BlockId>> {
        let mut chain = Vec::new();
        let mut current = self.block(id)?.parent;
        while let Some(parent) = current {
            if parent == self.root {
                break;
            }
            if chain.len() > self.blocks.len() {
                return Err(OutlineError::Cycle(id));
            }
            chain.push(parent);
            current = self.block(parent)?.parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Checks that the arena forms a single tree under the root: every child
    /// link is mirrored by a parent link, nothing is reachable twice and
    /// nothing is left unreachable.
    pub fn validate(&self) -> OutlineResult<()> {
        let root = self.block(self.root)?;
        if root.parent.is_some() {
            return Err(OutlineError::Cycle(self.root));
        }

        let mut visited = HashSet::with_capacity(self.blocks.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(OutlineError::Cycle(id));
            }
            let block = self.block(id)?;
            for child in block.children.iter().rev() {
                let recorded = self.block(*child)?.parent;
                if recorded != Some(id) {
                    return Err(OutlineError::ParentMismatch {
                        child: *child,
                        listed_by: id,
                        recorded,
                    });
                }
                stack.push(*child);
            }
        }

        if visited.len() == self.blocks.len() {
            return Ok(());
        }
        let mut stray: Vec<&Block> = self
            .blocks
            .values()
            .filter(|block| !visited.contains(&block.id))
            .collect();
        stray.sort_by_key(|block| block.id);
        match stray.first() {
            Some(block) => match block.parent {
                Some(parent) if self.contains(parent) => Err(OutlineError::Orphaned {
                    block: block.id,
                    parent,
                }),
                _ => Err(OutlineError::Unreachable(block.id)),
            },
            None => Ok(()),
        }
    }

    #[cfg(test)]
    pub(crate) fn blocks_mut(&mut self) -> &mut HashMap<BlockId, Block> {
        &mut self.blocks
    }
}

fn insert_record(
    blocks: &mut HashMap<BlockId, Block>,
    record: BlockRecord,
    parent: Option<BlockId>,
) -> OutlineResult<BlockId> {
    let BlockRecord {
        id,
        content,
        children,
    } = record;
    if blocks.contains_key(&id) {
        return Err(OutlineError::DuplicateId(id));
    }
    blocks.insert(id, Block::new(id, content, parent));

    let mut child_ids = Vec::with_capacity(children.len());
    for child in children {
        child_ids.push(insert_record(blocks, child, Some(id))?);
    }
    if let Some(block) = blocks.get_mut(&id) {
        block.children = child_ids;
    }
    Ok(id)
}

#[cfg(test)]
#[path = "outline_tests.rs"]
mod outline_tests;

#[cfg(test)]
#[path = "outline/traversal_tests.rs"]
mod traversal_tests;

#[cfg(test)]
#[path = "outline/restructure_tests.rs"]
mod restructure_tests;
