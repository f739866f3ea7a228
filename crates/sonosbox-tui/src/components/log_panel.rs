//! LogPanel component: scrollable view of the in-app message history.
//!
//! Hidden until toggled with `L`; handles its own scroll state.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    action::Action,
    app_state::{AppState, LogEntry, LogLevel},
    component::Component,
    theme::{C_ERROR, C_MUTED, C_PAUSED, C_SECONDARY},
    widgets::pane_chrome::pane_chrome,
};

pub struct LogPanel {
    pub visible: bool,
    pub scroll: usize,
    /// Track last log count to detect new entries for auto-scroll
    last_log_count: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            visible: false,
            scroll: 0,
            last_log_count: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            // Jump to bottom on open
            self.scroll = usize::MAX;
        }
    }
}

impl Component for LogPanel {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            KeyCode::End | KeyCode::Char('G') => self.scroll = usize::MAX,
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleLogs = action {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if !self.visible || area.height == 0 {
            return;
        }
        frame.render_widget(Clear, area);

        let block = pane_chrome("log", None, focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let logs = &state.logs;
        let height = inner.height as usize;
        let log_count = logs.len();

        // Follow new entries while scrolled to the bottom.
        if log_count > self.last_log_count {
            let max_scroll = log_count.saturating_sub(height);
            if self.scroll >= max_scroll.saturating_sub(1) {
                self.scroll = usize::MAX;
            }
            self.last_log_count = log_count;
        }

        if logs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no log entries yet",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let max_scroll = log_count.saturating_sub(height);
        self.scroll = self.scroll.min(max_scroll);

        let lines: Vec<Line> = logs
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(log_line)
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn log_line(entry: &LogEntry) -> Line<'_> {
    let (tag, color) = match entry.level {
        LogLevel::Info => ("INFO ", C_SECONDARY),
        LogLevel::Warn => ("WARN ", C_PAUSED),
        LogLevel::Error => ("ERROR", C_ERROR),
    };
    Line::from(vec![
        Span::styled(
            format!("  {} ", entry.at.format("%H:%M:%S")),
            Style::default().fg(C_MUTED),
        ),
        Span::styled(format!("{} ", tag), Style::default().fg(color)),
        Span::styled(entry.message.as_str(), Style::default().fg(C_SECONDARY)),
    ])
}
