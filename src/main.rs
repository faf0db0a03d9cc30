use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};
use tracing::{error, info};

use outline_tui::{
    caret::{CursorLocus, EditingSurface, Motion},
    config::{self, Config, Invocation, USAGE},
    document::{self, Opened},
    logging,
    error::OutlineResult,
    layout::SoftWrap,
    render::{RenderResult, render_outline},
    store::{CommandOutcome, OutlineStore},
    surface::EditBuffer,
    theme::Theme,
};

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
const DEFAULT_WRAP_WIDTH: usize = 80;
const CRUMB_WIDTH: usize = 24;
const MOUSE_SCROLL_LINES: usize = 3;

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let config = match Config::from_env() {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("{USAGE}\n");
            return Err(err).context("invalid arguments");
        }
    };

    if let Some(path) = &config.log_path {
        logging::init(&config)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    }

    let opened = document::open(&config.document_path);
    let mut app = App::new(opened, config);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    while !app.should_quit() {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt);
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

struct App {
    store: OutlineStore,
    buffer: Option<EditBuffer>,
    config: Config,
    theme: Theme,
    layout: SoftWrap,
    scroll_top: usize,
    last_view_height: usize,
    text_area: Rect,
    last_render: Option<RenderResult>,
    show_json: bool,
    should_quit: bool,
    quit_requested: bool,
    dirty: bool,
    // Off while the file on disk is one we failed to read.
    autosave: bool,
    status_message: Option<(String, Instant)>,
}

impl App {
    fn new(opened: Opened, config: Config) -> Self {
        let layout = SoftWrap::new(config.wrap_width.unwrap_or(DEFAULT_WRAP_WIDTH));
        let mut app = Self {
            store: OutlineStore::new(opened.outline),
            buffer: None,
            config,
            theme: Theme::default(),
            layout,
            scroll_top: 0,
            last_view_height: 1,
            text_area: Rect::default(),
            last_render: None,
            show_json: false,
            should_quit: false,
            quit_requested: false,
            dirty: false,
            autosave: opened.writable,
            status_message: opened.status.map(|msg| (msg, Instant::now())),
        };
        app.focus_first_block();
        app
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }
        if self.show_json {
            self.sync_buffer();
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let main_area = vertical[0];
        let status_area = vertical[1];

        let (outline_area, json_area) = if self.show_json {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(main_area);
            (panes[0], Some(panes[1]))
        } else {
            (main_area, None)
        };

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(outline_area);
        let content_area = horizontal[0];
        let scrollbar_area = horizontal[1];

        let (wrap_width, left_padding) =
            config::wrap_configuration(content_area.width as usize, self.config.wrap_width);
        let text_area = Rect::new(
            content_area.x + left_padding as u16,
            content_area.y,
            wrap_width as u16,
            content_area.height,
        );
        self.set_layout(SoftWrap::new(wrap_width));

        let render = render_outline(
            self.store.outline(),
            self.layout,
            &self.theme,
            self.buffer.as_ref(),
        );

        let viewport_height = text_area.height as usize;
        self.last_view_height = viewport_height.max(1);
        self.adjust_scroll(&render, viewport_height);

        let paragraph = Paragraph::new(Text::from(render.lines.clone()))
            .style(self.theme.text_style())
            .block(Block::default().borders(Borders::NONE))
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, text_area);

        let mut scrollbar_state = ScrollbarState::new(render.total_lines).position(self.scroll_top);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);

        if let Some(cursor) = render.cursor {
            if cursor.line >= self.scroll_top
                && cursor.line < self.scroll_top + viewport_height
                && text_area.width > 0
            {
                let cursor_y = text_area.y + (cursor.line - self.scroll_top) as u16;
                let cursor_x = text_area.x + cursor.column.min(text_area.width - 1);
                frame.set_cursor_position(Position::new(cursor_x, cursor_y));
            }
        }

        if let Some(json_area) = json_area {
            self.render_json_pane(frame, json_area);
        }

        let status = Paragraph::new(self.status_line()).style(self.theme.status_bar_style());
        frame.render_widget(status, status_area);

        self.text_area = text_area;
        self.last_render = Some(render);
    }

    fn render_json_pane(&self, frame: &mut Frame, area: Rect) {
        let json = document::to_json(self.store.outline())
            .unwrap_or_else(|err| format!("cannot serialize outline: {err}"));
        let pane = Paragraph::new(json)
            .style(self.theme.json_style())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::LEFT)
                    .border_style(self.theme.border_style())
                    .title(" State "),
            );
        frame.render_widget(pane, area);
    }

    fn status_line(&mut self) -> Line<'static> {
        self.prune_status_message();
        let marker = if self.dirty { "*" } else { "" };
        let mut spans = vec![Span::styled(
            format!(" {}{} ", self.config.document_path.display(), marker),
            self.theme.filename_style(),
        )];

        if let Some(buffer) = &self.buffer {
            let (line, column) = buffer.caret_position();
            let mut crumb = format!("[{},{}]", line + 1, column + 1);
            let trail = self.breadcrumbs(buffer.block());
            if !trail.is_empty() {
                crumb.push(' ');
                crumb.push_str(&trail);
            }
            spans.push(Span::styled(format!(" {crumb} "), self.theme.breadcrumb_style()));
        }

        let tail = match &self.status_message {
            Some((message, _)) => message.clone(),
            None => format!(
                "Blocks: {} | F2 state | Ctrl-S save | Ctrl-Q quit",
                self.store.outline().len().saturating_sub(1)
            ),
        };
        spans.push(Span::raw(format!("| {tail}")));
        Line::from(spans)
    }

    fn breadcrumbs(&self, block: outline_tui::BlockId) -> String {
        let outline = self.store.outline();
        let Ok(ancestors) = outline.ancestors(block) else {
            return String::new();
        };
        ancestors
            .into_iter()
            .filter_map(|id| outline.content(id).ok())
            .map(crumb)
            .collect::<Vec<_>>()
            .join(" > ")
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message {
            if instant.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }

    fn adjust_scroll(&mut self, render: &RenderResult, viewport_height: usize) {
        let viewport = viewport_height.max(1);
        let max_scroll = render.total_lines.saturating_sub(viewport);
        if self.scroll_top > max_scroll {
            self.scroll_top = max_scroll;
        }
        if let Some(cursor) = &render.cursor {
            if cursor.line < self.scroll_top {
                self.scroll_top = cursor.line;
            } else if cursor.line >= self.scroll_top + viewport {
                let target = cursor.line.saturating_add(1);
                self.scroll_top = target.saturating_sub(viewport);
            }
        }
        if self.scroll_top > max_scroll {
            self.scroll_top = max_scroll;
        }
    }

    fn set_layout(&mut self, layout: SoftWrap) {
        if layout == self.layout {
            return;
        }
        self.layout = layout;
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.set_layout(layout);
        }
    }

    /// Reopens the edit buffer at the store's cursor.
    fn reopen_buffer(&mut self) {
        self.buffer = self
            .store
            .cursor()
            .and_then(|locus| EditBuffer::open(self.store.outline(), locus, self.layout));
    }

    /// Pushes the buffer's text and caret into the store.
    fn sync_buffer(&mut self) {
        let Some(buffer) = &self.buffer else {
            return;
        };
        let block = buffer.block();
        let text = buffer.text().to_string();
        let locus = buffer.locus();

        match self.store.set_block_content(block, &text) {
            Ok(outcome) if outcome.is_applied() => self.dirty = true,
            Ok(_) => {}
            Err(err) => self.set_status(format!("Edit rejected: {err}")),
        }
        if let Err(err) = self.store.set_cursor(Some(locus)) {
            self.set_status(format!("Cursor lost: {err}"));
            self.buffer = None;
        }
    }

    fn focus(&mut self, locus: Option<CursorLocus>) {
        self.sync_buffer();
        match self.store.set_cursor(locus) {
            Ok(_) => self.reopen_buffer(),
            Err(err) => self.set_status(format!("Cannot focus block: {err}")),
        }
    }

    fn focus_first_block(&mut self) {
        let first = self.store.outline().first_block();
        self.focus(first.map(|block| CursorLocus::new(block, 0)));
    }

    fn blur(&mut self) {
        self.focus(None);
    }

    /// Commits the buffer, runs a structural command and autosaves when it
    /// changed the tree.
    fn structural<F>(&mut self, command: F)
    where
        F: FnOnce(&mut OutlineStore, &EditBuffer) -> OutlineResult<CommandOutcome>,
    {
        self.sync_buffer();
        let Some(buffer) = &self.buffer else {
            return;
        };
        match command(&mut self.store, buffer) {
            Ok(outcome) if outcome.is_applied() => {
                self.dirty = true;
                self.reopen_buffer();
                self.autosave();
            }
            Ok(_) => {}
            Err(err) => self.set_status(format!("Edit rejected: {err}")),
        }
    }

    fn split_block(&mut self) {
        self.structural(|store, buffer| match buffer.text_around_caret() {
            Some((before, after)) => store.split(buffer.block(), &before, &after),
            None => Ok(CommandOutcome::Unchanged),
        });
    }

    fn indent_block(&mut self) {
        self.structural(|store, buffer| store.indent(buffer.block(), buffer.caret()));
    }

    fn outdent_block(&mut self) {
        self.structural(|store, buffer| store.outdent(buffer.block(), buffer.caret()));
    }

    fn backspace(&mut self) {
        let Some(buffer) = self.buffer.as_mut() else {
            return;
        };
        if buffer.delete_backward() {
            self.dirty = true;
            return;
        }
        self.structural(|store, buffer| store.merge_backward(buffer.block(), buffer.caret()));
    }

    fn delete(&mut self) {
        if let Some(buffer) = self.buffer.as_mut() {
            if buffer.delete_forward() {
                self.dirty = true;
            }
        }
    }

    fn insert_char(&mut self, ch: char) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.insert_char(ch);
            self.dirty = true;
        }
    }

    /// Moves inside the focused block when possible and lets the store
    /// carry the caret across block boundaries otherwise.
    fn move_caret(&mut self, motion: Motion) {
        let Some(buffer) = self.buffer.as_mut() else {
            self.focus_first_block();
            return;
        };
        let moved = match motion {
            Motion::Up => buffer.move_up(),
            Motion::Down => buffer.move_down(),
            Motion::Left => buffer.move_left(),
            Motion::Right => buffer.move_right(),
            Motion::LineStart | Motion::LineEnd => false,
        };
        if moved {
            return;
        }

        self.sync_buffer();
        let Some(buffer) = &self.buffer else {
            return;
        };
        match self.store.move_cursor(motion, buffer, &self.layout) {
            Ok(outcome) if outcome.is_applied() => self.reopen_buffer(),
            Ok(_) => {}
            Err(err) => self.set_status(format!("Cannot move: {err}")),
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code, modifiers),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        if !matches!(code, KeyCode::Char('q') | KeyCode::Char('c')) || !ctrl {
            self.quit_requested = false;
        }

        match (code, modifiers) {
            (KeyCode::Char('q') | KeyCode::Char('c'), _) if ctrl => self.quit(),
            (KeyCode::Char('s'), _) if ctrl => {
                self.sync_buffer();
                match self.save() {
                    Ok(()) => self.set_status("Saved"),
                    Err(err) => self.set_status(format!("{err:#}")),
                }
            }
            (KeyCode::Char('k'), _) if ctrl => self.clear_saved(),
            (KeyCode::Char('a'), _) if ctrl => self.move_caret(Motion::LineStart),
            (KeyCode::Char('e'), _) if ctrl => self.move_caret(Motion::LineEnd),
            (KeyCode::Char('j'), _) if ctrl => self.insert_char('\n'),
            (KeyCode::F(2), _) => self.show_json = !self.show_json,
            (KeyCode::Esc, _) => self.blur(),
            (KeyCode::Enter, m)
                if m.contains(KeyModifiers::SHIFT) || m.contains(KeyModifiers::ALT) =>
            {
                self.insert_char('\n');
            }
            (KeyCode::Enter, _) if self.buffer.is_none() => self.focus_first_block(),
            (KeyCode::Enter, _) => self.split_block(),
            (KeyCode::BackTab, _) => self.outdent_block(),
            (KeyCode::Tab, m) if m.contains(KeyModifiers::SHIFT) => self.outdent_block(),
            (KeyCode::Tab, _) => self.indent_block(),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.move_caret(Motion::Left),
            (KeyCode::Right, _) => self.move_caret(Motion::Right),
            (KeyCode::Up, _) => self.move_caret(Motion::Up),
            (KeyCode::Down, _) => self.move_caret(Motion::Down),
            (KeyCode::Home, _) => self.move_caret(Motion::LineStart),
            (KeyCode::End, _) => self.move_caret(Motion::LineEnd),
            (KeyCode::PageUp, _) => {
                self.scroll_top = self.scroll_top.saturating_sub(self.last_view_height);
            }
            (KeyCode::PageDown, _) => {
                self.scroll_top += self.last_view_height;
            }
            (KeyCode::Char(ch), m)
                if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
            {
                self.insert_char(ch);
            }
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.scroll_top = self.scroll_top.saturating_sub(MOUSE_SCROLL_LINES);
            }
            MouseEventKind::ScrollDown => {
                self.scroll_top += MOUSE_SCROLL_LINES;
            }
            MouseEventKind::Down(MouseButton::Left) => self.handle_mouse_down(event),
            _ => {}
        }
    }

    fn handle_mouse_down(&mut self, event: MouseEvent) {
        let area = self.text_area;
        if event.row < area.y || event.row >= area.y + area.height || event.column < area.x {
            return;
        }
        let line = self.scroll_top + (event.row - area.y) as usize;
        let column = (event.column - area.x) as usize;
        let locus = self
            .last_render
            .as_ref()
            .and_then(|render| render.locus_at(line, column));
        if let Some(locus) = locus {
            self.focus(Some(locus));
        }
    }

    fn on_tick(&mut self) {
        self.prune_status_message();
    }

    fn quit(&mut self) {
        self.sync_buffer();
        if !self.dirty || self.quit_requested {
            self.should_quit = true;
            return;
        }
        if !self.autosave {
            self.quit_requested = true;
            self.set_status(
                "Not saved. Ctrl-S overwrites the unreadable file; Ctrl-Q again quits without saving.",
            );
            return;
        }
        match self.save() {
            Ok(()) => self.should_quit = true,
            Err(err) => {
                error!(error = %err, "save on quit failed");
                self.quit_requested = true;
                self.set_status(format!("{err:#}. Press Ctrl-Q again to quit without saving."));
            }
        }
    }

    fn save(&mut self) -> Result<()> {
        let path = &self.config.document_path;
        document::save(path, self.store.outline())
            .with_context(|| format!("failed to write {}", path.display()))?;
        self.dirty = false;
        self.autosave = true;
        Ok(())
    }

    fn autosave(&mut self) {
        if !self.autosave {
            return;
        }
        if let Err(err) = self.save() {
            error!(error = %err, "autosave failed");
            self.set_status(format!("{err:#}"));
        }
    }

    /// Forgets the saved document and starts over from the default page.
    fn clear_saved(&mut self) {
        let path = self.config.document_path.clone();
        if let Err(err) = document::clear(&path) {
            self.set_status(format!("failed to remove {}: {err}", path.display()));
            return;
        }
        self.buffer = None;
        if let Err(err) = self.store.replace(document::default_outline()) {
            self.set_status(format!("Cannot reset outline: {err}"));
            return;
        }
        info!(path = %path.display(), "reset to the default page");
        self.dirty = false;
        self.autosave = true;
        self.scroll_top = 0;
        self.focus_first_block();
        self.set_status("Cleared saved outline");
    }
}

/// First line of a block, shortened for the breadcrumb trail.
fn crumb(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() <= CRUMB_WIDTH {
        return line.to_string();
    }
    let mut short: String = line.chars().take(CRUMB_WIDTH - 1).collect();
    short.push('…');
    short
}
