//! Visual line layout of block text.
//!
//! A block's text breaks into visual lines at explicit newlines and, for the
//! soft-wrapping layout, wherever the next word would overflow the width
//! available at the block's depth. The renderer and the caret translator
//! share these functions so that "first line", "last line" and "column"
//! mean the same thing on screen and in the cursor logic.

use unicode_width::UnicodeWidthChar;

/// A visual line as a char range into the block text. `end` never includes
/// the newline that terminates a logical line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualLine {
    pub start: usize,
    pub end: usize,
}

impl VisualLine {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Line-wrap geometry for block text, injected into the caret translator.
pub trait LineLayout {
    /// Visual lines of `text` for a block at `depth`; never empty.
    fn visual_lines(&self, depth: usize, text: &str) -> Vec<VisualLine>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HardBreaks;

impl LineLayout for HardBreaks {
    fn visual_lines(&self, _depth: usize, text: &str) -> Vec<VisualLine> {
        let mut lines = Vec::new();
        let mut start = 0;
        for (index, ch) in text.chars().enumerate() {
            if ch == '\n' {
                lines.push(VisualLine { start, end: index });
                start = index + 1;
            }
        }
        lines.push(VisualLine {
            start,
            end: start + text.chars().skip(start).count(),
        });
        lines
    }
}

/// Word wrap at terminal column widths.
///
/// Each nesting level takes `indent` columns and every block reserves
/// `gutter` columns for its bullet, so deeper blocks wrap narrower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoftWrap {
    pub width: usize,
    pub indent: usize,
    pub gutter: usize,
}

impl SoftWrap {
    pub const INDENT: usize = 2;
    pub const GUTTER: usize = 2;

    pub fn new(width: usize) -> Self {
        Self {
            width,
            indent: Self::INDENT,
            gutter: Self::GUTTER,
        }
    }

    /// Text columns left for a block at `depth`; at least one.
    pub fn available(&self, depth: usize) -> usize {
        self.width
            .saturating_sub(depth.saturating_mul(self.indent))
            .saturating_sub(self.gutter)
            .max(1)
    }
}

impl LineLayout for SoftWrap {
    fn visual_lines(&self, depth: usize, text: &str) -> Vec<VisualLine> {
        wrap_lines(text, self.available(depth))
    }
}

pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Word-wraps `text` to `width` columns. Whitespace hangs at the end of the
/// line it follows; a word wider than the whole line is broken by chars.
pub fn wrap_lines(text: &str, width: usize) -> Vec<VisualLine> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut base = 0;
    for logical in text.split('\n') {
        let chars: Vec<char> = logical.chars().collect();
        wrap_logical_line(&chars, base, width, &mut lines);
        base += chars.len() + 1;
    }
    lines
}

fn wrap_logical_line(chars: &[char], base: usize, width: usize, lines: &mut Vec<VisualLine>) {
    let mut line_start = 0;
    let mut used = 0;
    let mut index = 0;

    while index < chars.len() {
        let is_whitespace = chars[index].is_whitespace();
        let token_start = index;
        let mut token_width = 0;
        while index < chars.len() && chars[index].is_whitespace() == is_whitespace {
            token_width += char_width(chars[index]);
            index += 1;
        }

        if is_whitespace {
            used += token_width;
            continue;
        }

        if used > 0 && used + token_width > width {
            lines.push(VisualLine {
                start: base + line_start,
                end: base + token_start,
            });
            line_start = token_start;
            used = 0;
        }

        if token_width <= width {
            used += token_width;
            continue;
        }

        for (offset, ch) in chars[token_start..index].iter().enumerate() {
            let ch_width = char_width(*ch);
            if used > 0 && used + ch_width > width {
                let split = token_start + offset;
                lines.push(VisualLine {
                    start: base + line_start,
                    end: base + split,
                });
                line_start = split;
                used = 0;
            }
            used += ch_width;
        }
    }

    lines.push(VisualLine {
        start: base + line_start,
        end: base + chars.len(),
    });
}

/// Index of the visual line holding the caret at `offset`. A caret sitting
/// exactly on a soft-wrap boundary belongs to the later line.
pub fn line_index_at(lines: &[VisualLine], offset: usize) -> usize {
    lines
        .iter()
        .rposition(|line| line.start <= offset)
        .unwrap_or(0)
}

pub fn column_at(text: &str, line: VisualLine, offset: usize) -> usize {
    let offset = offset.clamp(line.start, line.end);
    text.chars()
        .skip(line.start)
        .take(offset - line.start)
        .map(char_width)
        .sum()
}

/// The char offset on `line` closest to display `column` without passing
/// it, clamped to the line's extent.
pub fn offset_at_column(text: &str, line: VisualLine, column: usize) -> usize {
    let mut used = 0;
    let mut offset = line.start;
    for ch in text.chars().skip(line.start).take(line.len()) {
        let width = char_width(ch);
        if used + width > column {
            break;
        }
        used += width;
        offset += 1;
    }
    offset
}

/// Like [`offset_at_column`] on `lines[index]`, but a line that soft-wraps
/// into the next one stops one char short of its end: that offset already
/// belongs to the next line.
pub fn offset_in_line(text: &str, lines: &[VisualLine], index: usize, column: usize) -> usize {
    let Some(line) = lines.get(index).copied() else {
        return 0;
    };
    let offset = offset_at_column(text, line, column);
    let wraps = lines
        .get(index + 1)
        .is_some_and(|next| next.start == line.end);
    if wraps && !line.is_empty() {
        offset.min(line.end - 1)
    } else {
        offset
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod layout_tests;
