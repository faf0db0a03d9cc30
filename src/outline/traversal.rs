//! Document order is a pre-order depth-first walk below the hidden root.
//!
//! Sibling positions are found by scanning the parent's child list, which
//! keeps every query at O(depth × fan-out). That is fine for outlines of a
//! few thousand blocks; larger documents would want a maintained sibling
//! index instead.

use crate::error::OutlineResult;

use super::{Block, BlockId, Outline};

impl Outline {
    pub fn first_child(&self, id: BlockId) -> OutlineResult<Option<BlockId>> {
        Ok(self.children(id)?.first().copied())
    }

    pub fn last_child(&self, id: BlockId) -> OutlineResult<Option<BlockId>> {
        Ok(self.children(id)?.last().copied())
    }

    /// The last block of the subtree rooted at `id`, which may be `id` itself.
    pub fn last_descendant(&self, id: BlockId) -> OutlineResult<BlockId> {
        let mut current = id;
        while let Some(child) = self.last_child(current)? {
            current = child;
        }
        Ok(current)
    }

    /// The block after `id` in document order.
    ///
    /// A block with children continues into its first child; otherwise the
    /// walk climbs until some ancestor has a following sibling.
    pub fn next_block(&self, id: BlockId) -> OutlineResult<Option<BlockId>> {
        if let Some(child) = self.first_child(id)? {
            return Ok(Some(child));
        }

        let mut current = id;
        while let Some((parent, index)) = self.parent_and_index(current)? {
            let siblings = self.children(parent)?;
            if let Some(sibling) = siblings.get(index + 1) {
                return Ok(Some(*sibling));
            }
            current = parent;
        }
        Ok(None)
    }

    /// The block before `id` in document order: the parent for a first
    /// child, otherwise the deepest last descendant of the preceding sibling.
    pub fn prev_block(&self, id: BlockId) -> OutlineResult<Option<BlockId>> {
        let Some((parent, index)) = self.parent_and_index(id)? else {
            return Ok(None);
        };
        if index == 0 {
            if parent == self.root {
                return Ok(None);
            }
            return Ok(Some(parent));
        }
        let sibling = self.children(parent)?[index - 1];
        self.last_descendant(sibling).map(Some)
    }

    pub fn first_block(&self) -> Option<BlockId> {
        self.get(self.root)?.children.first().copied()
    }

    pub fn last_block(&self) -> Option<BlockId> {
        self.first_block()?;
        self.last_descendant(self.root).ok()
    }

    pub fn preorder(&self) -> Preorder<'_> {
        let stack = self
            .get(self.root)
            .map(|root| root.children.iter().rev().map(|id| (*id, 0)).collect())
            .unwrap_or_default();
        Preorder {
            outline: self,
            stack,
        }
    }
}

pub struct Preorder<'a> {
    outline: &'a Outline,
    stack: Vec<(BlockId, usize)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, depth) = self.stack.pop()?;
            let Some(block) = self.outline.get(id) else {
                continue;
            };
            self.stack
                .extend(block.children.iter().rev().map(|child| (*child, depth + 1)));
            return Some((depth, block));
        }
    }
}
