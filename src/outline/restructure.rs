//! Structural edits. Each returns `Ok(None)` when the block has nowhere to go
//! (no parent, no preceding sibling, already top level) and otherwise
//! reports which blocks changed so the caller can persist them.

use tracing::debug;

use crate::error::OutlineResult;

use super::{Block, BlockId, Outline, char_len};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    pub block: BlockId,
    pub new_block: BlockId,
    /// Whose child list received the new block.
    pub parent: BlockId,
}

impl Split {
    pub fn changed(&self) -> Vec<BlockId> {
        dedup(vec![self.block, self.parent, self.new_block])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Indented {
    pub block: BlockId,
    pub parent: BlockId,
    pub new_parent: BlockId,
}

impl Indented {
    pub fn changed(&self) -> Vec<BlockId> {
        vec![self.parent, self.new_parent, self.block]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outdented {
    pub block: BlockId,
    pub parent: BlockId,
    pub grand_parent: BlockId,
    /// Former following siblings now nested under the block.
    pub adopted: Vec<BlockId>,
}

impl Outdented {
    pub fn changed(&self) -> Vec<BlockId> {
        let mut changed = vec![self.parent, self.grand_parent, self.block];
        changed.extend(self.adopted.iter().copied());
        changed
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Merged {
    pub removed: BlockId,
    pub parent: BlockId,
    pub target: BlockId,
    /// Caret position in `target`: the length of its text before the merge.
    pub offset: usize,
}

impl Merged {
    pub fn changed(&self) -> Vec<BlockId> {
        dedup(vec![self.target, self.parent, self.removed])
    }
}

fn dedup(mut ids: Vec<BlockId>) -> Vec<BlockId> {
    let mut seen = Vec::with_capacity(ids.len());
    ids.retain(|id| {
        if seen.contains(id) {
            false
        } else {
            seen.push(*id);
            true
        }
    });
    ids
}

impl Outline {
    /// Breaks a block at the caret. `before` stays in the block; `after`
    /// becomes a new block that is the first child when the block already
    /// has children, and the next sibling otherwise.
    pub fn split_at(
        &mut self,
        id: BlockId,
        before: impl Into<String>,
        after: impl Into<String>,
    ) -> OutlineResult<Option<Split>> {
        let Some((parent, index)) = self.parent_and_index(id)? else {
            debug!(block = %id, "split ignored: block has no parent");
            return Ok(None);
        };
        let nest = self.block(id)?.has_children();

        let new_block = BlockId::new();
        let (owner, position) = if nest { (id, 0) } else { (parent, index + 1) };
        self.blocks
            .insert(new_block, Block::new(new_block, after.into(), Some(owner)));
        self.block_mut(owner)?.children.insert(position, new_block);
        self.block_mut(id)?.content = before.into();

        Ok(Some(Split {
            block: id,
            new_block,
            parent: owner,
        }))
    }

    /// Moves a block to the end of its preceding sibling's children.
    pub fn indent(&mut self, id: BlockId) -> OutlineResult<Option<Indented>> {
        let Some((parent, index)) = self.parent_and_index(id)? else {
            debug!(block = %id, "indent ignored: block has no parent");
            return Ok(None);
        };
        if index == 0 {
            debug!(block = %id, "indent ignored: first child has no preceding sibling");
            return Ok(None);
        }
        let new_parent = self.children(parent)?[index - 1];
        self.block(new_parent)?;

        self.block_mut(parent)?.children.remove(index);
        self.block_mut(new_parent)?.children.push(id);
        self.block_mut(id)?.parent = Some(new_parent);

        Ok(Some(Indented {
            block: id,
            parent,
            new_parent,
        }))
    }

    /// Lifts a block to sit right after its parent. Siblings that followed
    /// it stay one level deeper by becoming its trailing children.
    pub fn outdent(&mut self, id: BlockId) -> OutlineResult<Option<Outdented>> {
        let Some((parent, index)) = self.parent_and_index(id)? else {
            debug!(block = %id, "outdent ignored: block has no parent");
            return Ok(None);
        };
        let Some((grand_parent, parent_index)) = self.parent_and_index(parent)? else {
            debug!(block = %id, "outdent ignored: block is already top level");
            return Ok(None);
        };
        self.block(grand_parent)?;

        let siblings = &mut self.block_mut(parent)?.children;
        let adopted = siblings.split_off(index + 1);
        siblings.truncate(index);
        for sibling in &adopted {
            self.block_mut(*sibling)?.parent = Some(id);
        }

        let block = self.block_mut(id)?;
        block.children.extend(adopted.iter().copied());
        block.parent = Some(grand_parent);
        self.block_mut(grand_parent)?
            .children
            .insert(parent_index + 1, id);

        Ok(Some(Outdented {
            block: id,
            parent,
            grand_parent,
            adopted,
        }))
    }

    /// Deletes a childless block by appending its text to the previous block
    /// in document order.
    pub fn merge_backward(&mut self, id: BlockId) -> OutlineResult<Option<Merged>> {
        if self.block(id)?.has_children() {
            debug!(block = %id, "merge ignored: block has children");
            return Ok(None);
        }
        let Some((parent, index)) = self.parent_and_index(id)? else {
            debug!(block = %id, "merge ignored: block has no parent");
            return Ok(None);
        };
        let Some(target) = self.prev_block(id)? else {
            debug!(block = %id, "merge ignored: no previous block");
            return Ok(None);
        };
        let offset = char_len(self.content(target)?);

        self.block_mut(parent)?.children.remove(index);
        let removed = self.blocks.remove(&id).map(|block| block.content);
        if let Some(content) = removed {
            self.block_mut(target)?.content.push_str(&content);
        }

        Ok(Some(Merged {
            removed: id,
            parent,
            target,
            offset,
        }))
    }
}
