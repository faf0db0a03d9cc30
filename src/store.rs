use std::sync::Arc;

use tracing::{debug, error};

use crate::caret::{CaretTranslator, CursorLocus, EditingSurface, Motion};
use crate::error::{OutlineError, OutlineResult};
use crate::layout::LineLayout;
use crate::outline::{BlockId, Outline, clamp_offset};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied { changed: Vec<BlockId> },
    Unchanged,
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied { .. })
    }

    pub fn changed(&self) -> &[BlockId] {
        match self {
            CommandOutcome::Applied { changed } => changed,
            CommandOutcome::Unchanged => &[],
        }
    }
}

struct Change {
    changed: Vec<BlockId>,
    cursor: Option<CursorLocus>,
}

/// Owns the current outline snapshot and the cursor locus.
///
/// Every command builds its result on a private copy of the outline and
/// swaps it in only after the copy passes validation, so a reader holding a
/// previous snapshot never sees a half-applied edit.
#[derive(Debug)]
pub struct OutlineStore {
    outline: Arc<Outline>,
    cursor: Option<CursorLocus>,
    revision: u64,
}

impl OutlineStore {
    pub fn new(mut outline: Outline) -> Self {
        outline.ensure_initialized();
        Self {
            outline: Arc::new(outline),
            cursor: None,
            revision: 0,
        }
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn snapshot(&self) -> Arc<Outline> {
        Arc::clone(&self.outline)
    }

    pub fn cursor(&self) -> Option<CursorLocus> {
        self.cursor
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace(&mut self, outline: Outline) -> OutlineResult<()> {
        let mut outline = outline;
        outline.ensure_initialized();
        outline.validate().inspect_err(|err| {
            error!(error = %err, "refusing to load inconsistent outline");
        })?;
        self.outline = Arc::new(outline);
        self.cursor = None;
        self.revision += 1;
        Ok(())
    }

    /// Focuses a block (clamping the offset) or blurs with `None`.
    pub fn set_cursor(&mut self, cursor: Option<CursorLocus>) -> OutlineResult<CommandOutcome> {
        let cursor = match cursor {
            Some(locus) => Some(clamp_locus(&self.outline, locus)?),
            None => None,
        };
        if cursor == self.cursor {
            return Ok(CommandOutcome::Unchanged);
        }
        self.cursor = cursor;
        Ok(CommandOutcome::Applied {
            changed: Vec::new(),
        })
    }

    pub fn set_block_content(
        &mut self,
        block: BlockId,
        content: &str,
    ) -> OutlineResult<CommandOutcome> {
        if self.outline.content(block)? == content {
            return Ok(CommandOutcome::Unchanged);
        }
        let cursor = self.cursor;
        self.commit("set_block_content", |outline| {
            outline.set_content(block, content)?;
            Ok(Some(Change {
                changed: vec![block],
                cursor,
            }))
        })
    }

    /// Splits `block` into `before` and a new block holding `after`, and
    /// moves the cursor to the head of the new block.
    pub fn split(
        &mut self,
        block: BlockId,
        before: &str,
        after: &str,
    ) -> OutlineResult<CommandOutcome> {
        self.commit("split", |outline| {
            Ok(outline.split_at(block, before, after)?.map(|split| Change {
                cursor: Some(CursorLocus::new(split.new_block, 0)),
                changed: split.changed(),
            }))
        })
    }

    pub fn indent(&mut self, block: BlockId, offset: usize) -> OutlineResult<CommandOutcome> {
        self.commit("indent", |outline| {
            Ok(outline.indent(block)?.map(|indented| Change {
                cursor: Some(CursorLocus::new(block, offset)),
                changed: indented.changed(),
            }))
        })
    }

    pub fn outdent(&mut self, block: BlockId, offset: usize) -> OutlineResult<CommandOutcome> {
        self.commit("outdent", |outline| {
            Ok(outline.outdent(block)?.map(|outdented| Change {
                cursor: Some(CursorLocus::new(block, offset)),
                changed: outdented.changed(),
            }))
        })
    }

    /// Backspace at the head of a childless block folds it into the
    /// previous block; the caret lands at the old end of that block.
    pub fn merge_backward(
        &mut self,
        block: BlockId,
        offset: usize,
    ) -> OutlineResult<CommandOutcome> {
        if offset != 0 {
            debug!(block = %block, offset, "merge ignored: caret is not at block head");
            return Ok(CommandOutcome::Unchanged);
        }
        self.commit("merge_backward", |outline| {
            Ok(outline.merge_backward(block)?.map(|merged| Change {
                cursor: Some(CursorLocus::new(merged.target, merged.offset)),
                changed: merged.changed(),
            }))
        })
    }

    /// Moves the cursor according to `motion`, reading the live caret from
    /// the surface. Movements that stay inside the block are left to the
    /// surface and report `Unchanged`.
    pub fn move_cursor(
        &mut self,
        motion: Motion,
        surface: &dyn EditingSurface,
        layout: &dyn LineLayout,
    ) -> OutlineResult<CommandOutcome> {
        let Some(current) = self.cursor else {
            return Ok(CommandOutcome::Unchanged);
        };
        let Some(offset) = surface.caret_offset() else {
            debug!("move ignored: surface has no caret");
            return Ok(CommandOutcome::Unchanged);
        };
        let locus = clamp_locus(&self.outline, CursorLocus::new(current.block, offset))
            .inspect_err(|err| error!(error = %err, "cursor refers to a missing block"))?;

        let translator = CaretTranslator::new(&self.outline, layout);
        let target = translator
            .translate(locus, motion, surface.caret_geometry())
            .inspect_err(|err| error!(error = %err, ?motion, "cursor move aborted"))?;
        match target {
            Some(target) if Some(target) != self.cursor => {
                self.cursor = Some(clamp_locus(&self.outline, target)?);
                Ok(CommandOutcome::Applied {
                    changed: Vec::new(),
                })
            }
            _ => Ok(CommandOutcome::Unchanged),
        }
    }

    fn commit<F>(&mut self, command: &'static str, apply: F) -> OutlineResult<CommandOutcome>
    where
        F: FnOnce(&mut Outline) -> OutlineResult<Option<Change>>,
    {
        let mut draft = Outline::clone(&self.outline);
        let change = apply(&mut draft)
            .and_then(|change| match change {
                None => Ok(None),
                Some(change) => {
                    draft.validate()?;
                    let cursor = change
                        .cursor
                        .map(|locus| clamp_locus(&draft, locus))
                        .transpose()?;
                    Ok(Some(Change { cursor, ..change }))
                }
            })
            .inspect_err(|err| {
                error!(command, error = %err, "command aborted, outline left unchanged");
            })?;

        let Some(change) = change else {
            return Ok(CommandOutcome::Unchanged);
        };
        self.outline = Arc::new(draft);
        self.cursor = change.cursor;
        self.revision += 1;
        debug!(command, revision = self.revision, changed = change.changed.len(), "committed");
        Ok(CommandOutcome::Applied {
            changed: change.changed,
        })
    }
}

fn clamp_locus(outline: &Outline, locus: CursorLocus) -> OutlineResult<CursorLocus> {
    let content = outline
        .content(locus.block)
        .map_err(|_| OutlineError::StaleCursor(locus.block))?;
    Ok(CursorLocus::new(locus.block, clamp_offset(content, locus.offset)))
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
