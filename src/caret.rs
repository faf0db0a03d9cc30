//! Cursor movement across block boundaries.
//!
//! The editing surface owns the live caret and knows how the focused block
//! is laid out on screen. This module only decides where the caret goes when
//! a movement leaves the focused block: which block becomes active and at
//! which char offset, so that a tree of separately wrapped blocks reads as
//! one document.

use serde::{Deserialize, Serialize};

use crate::error::OutlineResult;
use crate::layout::{LineLayout, offset_in_line};
use crate::outline::{BlockId, Outline, char_len};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorLocus {
    pub block: BlockId,
    pub offset: usize,
}

impl CursorLocus {
    pub fn new(block: BlockId, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Where the caret sits within the rendered lines of the focused block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaretGeometry {
    pub on_first_line: bool,
    pub on_last_line: bool,
    // display width, not chars
    pub column: usize,
}

/// What the core needs from the text surface that hosts the focused block.
///
/// Caret queries return `None` when nothing is focused, in which case
/// caret-dependent commands do nothing.
pub trait EditingSurface {
    fn current_text(&self, block: BlockId) -> Option<String>;

    fn caret_offset(&self) -> Option<usize>;

    fn text_around_caret(&self) -> Option<(String, String)>;

    fn is_caret_on_first_visual_line(&self) -> bool;

    fn is_caret_on_last_visual_line(&self) -> bool;

    fn caret_column_from_line_start(&self) -> usize;

    fn caret_geometry(&self) -> CaretGeometry {
        CaretGeometry {
            on_first_line: self.is_caret_on_first_visual_line(),
            on_last_line: self.is_caret_on_last_visual_line(),
            column: self.caret_column_from_line_start(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
}

pub struct CaretTranslator<'a> {
    outline: &'a Outline,
    layout: &'a dyn LineLayout,
}

impl<'a> CaretTranslator<'a> {
    pub fn new(outline: &'a Outline, layout: &'a dyn LineLayout) -> Self {
        Self { outline, layout }
    }

    /// Resolves `motion` from `locus`. `Ok(None)` means the motion stays
    /// inside the block (the surface handles it) or there is no block to
    /// move to.
    pub fn translate(
        &self,
        locus: CursorLocus,
        motion: Motion,
        geometry: CaretGeometry,
    ) -> OutlineResult<Option<CursorLocus>> {
        match motion {
            Motion::Up => self.move_up(locus, geometry),
            Motion::Down => self.move_down(locus, geometry),
            Motion::Left => self.move_left(locus),
            Motion::Right => self.move_right(locus),
            Motion::LineStart => {
                let text = self.outline.content(locus.block)?;
                Ok(Some(CursorLocus::new(
                    locus.block,
                    line_start(text, locus.offset),
                )))
            }
            Motion::LineEnd => {
                let text = self.outline.content(locus.block)?;
                Ok(Some(CursorLocus::new(
                    locus.block,
                    line_end(text, locus.offset),
                )))
            }
        }
    }

    /// From the last visual line into the first visual line of the next
    /// block, keeping the column.
    pub fn move_down(
        &self,
        locus: CursorLocus,
        geometry: CaretGeometry,
    ) -> OutlineResult<Option<CursorLocus>> {
        if !geometry.on_last_line {
            return Ok(None);
        }
        let Some(target) = self.outline.next_block(locus.block)? else {
            return Ok(None);
        };
        let text = self.outline.content(target)?;
        let lines = self.layout.visual_lines(self.outline.depth(target)?, text);
        let offset = offset_in_line(text, &lines, 0, geometry.column);
        Ok(Some(CursorLocus::new(target, offset)))
    }

    /// From the first visual line into the last visual line of the previous
    /// block, keeping the column.
    pub fn move_up(
        &self,
        locus: CursorLocus,
        geometry: CaretGeometry,
    ) -> OutlineResult<Option<CursorLocus>> {
        if !geometry.on_first_line {
            return Ok(None);
        }
        let Some(target) = self.outline.prev_block(locus.block)? else {
            return Ok(None);
        };
        let text = self.outline.content(target)?;
        let lines = self.layout.visual_lines(self.outline.depth(target)?, text);
        let last = lines.len().saturating_sub(1);
        let offset = offset_in_line(text, &lines, last, geometry.column);
        Ok(Some(CursorLocus::new(target, offset)))
    }

    pub fn move_left(&self, locus: CursorLocus) -> OutlineResult<Option<CursorLocus>> {
        if locus.offset > 0 {
            return Ok(None);
        }
        let Some(target) = self.outline.prev_block(locus.block)? else {
            return Ok(None);
        };
        let end = char_len(self.outline.content(target)?);
        Ok(Some(CursorLocus::new(target, end)))
    }

    pub fn move_right(&self, locus: CursorLocus) -> OutlineResult<Option<CursorLocus>> {
        if locus.offset < char_len(self.outline.content(locus.block)?) {
            return Ok(None);
        }
        let Some(target) = self.outline.next_block(locus.block)? else {
            return Ok(None);
        };
        Ok(Some(CursorLocus::new(target, 0)))
    }
}

/// Start of the logical line holding `offset`: just past the nearest
/// newline before the caret.
pub fn line_start(text: &str, offset: usize) -> usize {
    text.chars()
        .take(offset)
        .enumerate()
        .filter(|(_, ch)| *ch == '\n')
        .last()
        .map(|(index, _)| index + 1)
        .unwrap_or(0)
}

/// End of the logical line holding `offset`: the nearest newline at or after
/// the caret, or the end of the text.
pub fn line_end(text: &str, offset: usize) -> usize {
    let mut len = 0;
    for (index, ch) in text.chars().enumerate() {
        if index >= offset && ch == '\n' {
            return index;
        }
        len = index + 1;
    }
    len
}

#[cfg(test)]
#[path = "caret_tests.rs"]
mod caret_tests;
