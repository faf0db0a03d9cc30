//! The text surface for the focused block in the terminal front end.
//!
//! Holds the uncommitted text and the caret of the block being edited and
//! answers the caret geometry queries from the same soft-wrap layout the
//! renderer uses. Movement inside the block happens here; movement that
//! leaves the block is handed to the store.

use crate::caret::{CursorLocus, EditingSurface};
use crate::layout::{
    LineLayout, SoftWrap, VisualLine, column_at, line_index_at, offset_in_line,
};
use crate::outline::{BlockId, Outline, byte_index, char_len, split_at_char};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditBuffer {
    block: BlockId,
    text: String,
    caret: usize,
    depth: usize,
    layout: SoftWrap,
}

impl EditBuffer {
    /// Opens the block under `locus` for editing. `None` if the block is gone.
    pub fn open(outline: &Outline, locus: CursorLocus, layout: SoftWrap) -> Option<Self> {
        let text = outline.content(locus.block).ok()?.to_string();
        let depth = outline.depth(locus.block).ok()?;
        let caret = locus.offset.min(char_len(&text));
        Some(Self {
            block: locus.block,
            text,
            caret,
            depth,
            layout,
        })
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn locus(&self) -> CursorLocus {
        CursorLocus::new(self.block, self.caret)
    }

    pub fn set_layout(&mut self, layout: SoftWrap) {
        self.layout = layout;
    }

    pub fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(char_len(&self.text));
    }

    fn lines(&self) -> Vec<VisualLine> {
        self.layout.visual_lines(self.depth, &self.text)
    }

    fn caret_line(&self) -> (usize, Vec<VisualLine>) {
        let lines = self.lines();
        (line_index_at(&lines, self.caret), lines)
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = byte_index(&self.text, self.caret);
        self.text.insert(idx, ch);
        self.caret += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Deletes the char before the caret; `false` at the head of the block.
    pub fn delete_backward(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        let start = byte_index(&self.text, self.caret - 1);
        let end = byte_index(&self.text, self.caret);
        self.text.drain(start..end);
        self.caret -= 1;
        true
    }

    /// Deletes the char after the caret; `false` at the tail of the block.
    pub fn delete_forward(&mut self) -> bool {
        if self.caret >= char_len(&self.text) {
            return false;
        }
        let start = byte_index(&self.text, self.caret);
        let end = byte_index(&self.text, self.caret + 1);
        self.text.drain(start..end);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.caret >= char_len(&self.text) {
            return false;
        }
        self.caret += 1;
        true
    }

    /// One visual line up within the block, keeping the column.
    pub fn move_up(&mut self) -> bool {
        let (index, lines) = self.caret_line();
        if index == 0 {
            return false;
        }
        let column = column_at(&self.text, lines[index], self.caret);
        self.caret = offset_in_line(&self.text, &lines, index - 1, column);
        true
    }

    /// One visual line down within the block, keeping the column.
    pub fn move_down(&mut self) -> bool {
        let (index, lines) = self.caret_line();
        if index + 1 >= lines.len() {
            return false;
        }
        let column = column_at(&self.text, lines[index], self.caret);
        self.caret = offset_in_line(&self.text, &lines, index + 1, column);
        true
    }

    /// Visual line index and display column of the caret.
    pub fn caret_position(&self) -> (usize, usize) {
        let (index, lines) = self.caret_line();
        let column = lines
            .get(index)
            .map(|line| column_at(&self.text, *line, self.caret))
            .unwrap_or(0);
        (index, column)
    }
}

impl EditingSurface for EditBuffer {
    fn current_text(&self, block: BlockId) -> Option<String> {
        (block == self.block).then(|| self.text.clone())
    }

    fn caret_offset(&self) -> Option<usize> {
        Some(self.caret)
    }

    fn text_around_caret(&self) -> Option<(String, String)> {
        let (before, after) = split_at_char(&self.text, self.caret);
        Some((before.to_string(), after.to_string()))
    }

    fn is_caret_on_first_visual_line(&self) -> bool {
        self.caret_line().0 == 0
    }

    fn is_caret_on_last_visual_line(&self) -> bool {
        let (index, lines) = self.caret_line();
        index + 1 >= lines.len()
    }

    fn caret_column_from_line_start(&self) -> usize {
        self.caret_position().1
    }
}
