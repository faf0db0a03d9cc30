use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the outliner
#[derive(Clone, Debug)]
pub struct Theme {
    /// Background color for the outline pane
    pub background: Color,

    /// Foreground color for block text
    pub text: Color,

    /// Color for the bullet in front of a leaf block
    pub bullet: Color,

    /// Color for the bullet in front of a block with children
    pub parent_bullet: Color,

    /// Foreground color for the block being edited
    pub active_fg: Color,

    /// Background color for the block being edited
    pub active_bg: Color,

    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the current file name in the status bar
    pub filename_color: Color,

    /// Color for the breadcrumb trail in the status bar
    pub breadcrumb_color: Color,

    /// Foreground color for the JSON state pane
    pub json_fg: Color,

    /// Color for pane borders
    pub border_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            text: Color::Reset,
            bullet: Color::DarkGray,
            parent_bullet: Color::Gray,
            active_fg: Color::Reset,
            active_bg: Color::Reset,
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            filename_color: Color::LightYellow,
            breadcrumb_color: Color::Gray,
            json_fg: Color::Green,
            border_color: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style for the bullet, brighter when the block has children
    pub fn bullet_style(&self, has_children: bool) -> Style {
        let color = if has_children {
            self.parent_bullet
        } else {
            self.bullet
        };
        Style::default().fg(color)
    }

    pub fn active_style(&self) -> Style {
        Style::default()
            .fg(self.active_fg)
            .bg(self.active_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    /// Get the style for the filename in the status bar
    pub fn filename_style(&self) -> Style {
        Style::default()
            .fg(self.filename_color)
            .bg(self.status_bar_bg)
    }

    pub fn breadcrumb_style(&self) -> Style {
        Style::default()
            .fg(self.breadcrumb_color)
            .bg(self.status_bar_bg)
    }

    pub fn json_style(&self) -> Style {
        Style::default().fg(self.json_fg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border_color)
    }
}
