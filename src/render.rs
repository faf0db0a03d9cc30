use ratatui::text::{Line, Span};

use crate::caret::CursorLocus;
use crate::layout::{LineLayout, SoftWrap, VisualLine, offset_in_line};
use crate::outline::{Block, BlockId, Outline};
use crate::surface::EditBuffer;
use crate::theme::Theme;

const BULLET: &str = "•";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

/// Where one block landed in the rendered output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockLines {
    pub block: BlockId,
    pub depth: usize,
    pub first_line: usize,
    pub text_column: usize,
    pub text: String,
    pub lines: Vec<VisualLine>,
}

impl BlockLines {
    fn covers(&self, line: usize) -> bool {
        line >= self.first_line && line < self.first_line + self.lines.len()
    }
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
    pub block_lines: Vec<BlockLines>,
}

impl RenderResult {
    /// Caret position for a click on rendered `line` at screen `column`.
    /// Clicks left of the text land on the line start; clicks past the end
    /// of the outline land in the last block.
    pub fn locus_at(&self, line: usize, column: usize) -> Option<CursorLocus> {
        let entry = self
            .block_lines
            .iter()
            .find(|entry| entry.covers(line))
            .or_else(|| self.block_lines.last())?;
        let index = line
            .saturating_sub(entry.first_line)
            .min(entry.lines.len().saturating_sub(1));
        let column = column.saturating_sub(entry.text_column);
        Some(CursorLocus::new(
            entry.block,
            offset_in_line(&entry.text, &entry.lines, index, column),
        ))
    }
}

/// Lays out every block in document order. The block held by `active` is
/// drawn from the buffer's live text and carries the cursor.
pub fn render_outline(
    outline: &Outline,
    layout: SoftWrap,
    theme: &Theme,
    active: Option<&EditBuffer>,
) -> RenderResult {
    let mut renderer = Renderer::new(layout, theme);
    for (depth, block) in outline.preorder() {
        let buffer = active.filter(|buffer| buffer.block() == block.id());
        renderer.render_block(depth, block, buffer);
    }
    renderer.finish()
}

struct Renderer<'a> {
    layout: SoftWrap,
    theme: &'a Theme,
    lines: Vec<Line<'static>>,
    cursor: Option<CursorVisualPosition>,
    block_lines: Vec<BlockLines>,
}

impl<'a> Renderer<'a> {
    fn new(layout: SoftWrap, theme: &'a Theme) -> Self {
        Self {
            layout,
            theme,
            lines: Vec::new(),
            cursor: None,
            block_lines: Vec::new(),
        }
    }

    fn render_block(&mut self, depth: usize, block: &Block, buffer: Option<&EditBuffer>) {
        let text = buffer.map_or(block.content(), |buffer| buffer.text());
        let visual_lines = self.layout.visual_lines(depth, text);
        let indent = " ".repeat(depth.saturating_mul(self.layout.indent));
        let text_column = indent.len() + self.layout.gutter;
        let first_line = self.lines.len();

        let text_style = if buffer.is_some() {
            self.theme.active_style()
        } else {
            self.theme.text_style()
        };
        let chars: Vec<char> = text.chars().collect();

        for (index, visual) in visual_lines.iter().enumerate() {
            let marker = if index == 0 {
                format!("{BULLET:<width$}", width = self.layout.gutter)
            } else {
                " ".repeat(self.layout.gutter)
            };
            let content: String = chars[visual.start..visual.end].iter().collect();
            self.lines.push(Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled(marker, self.theme.bullet_style(block.has_children())),
                Span::styled(content, text_style),
            ]));
        }

        if let Some(buffer) = buffer {
            let (line, column) = buffer.caret_position();
            self.cursor = Some(CursorVisualPosition {
                line: first_line + line,
                column: (text_column + column).min(u16::MAX as usize) as u16,
            });
        }

        self.block_lines.push(BlockLines {
            block: block.id(),
            depth,
            first_line,
            text_column,
            text: text.to_string(),
            lines: visual_lines,
        });
    }

    fn finish(self) -> RenderResult {
        let total_lines = self.lines.len();
        RenderResult {
            lines: self.lines,
            cursor: self.cursor,
            total_lines,
            block_lines: self.block_lines,
        }
    }
}
