//! NowPlaying component: track title, progress bar and the play/pause toggle
//! for the selected speaker.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::Action,
    app_state::{AppState, PlayLabel},
    component::Component,
    theme::{C_BADGE_ERR, C_BADGE_LIVE, C_MUTED, C_PAUSED, C_PLAYING, C_PRIMARY, C_SECONDARY},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        progress_bar::draw_progress,
        text::truncate_to_width,
    },
};

pub struct NowPlayingPane {
    /// Where the toggle label was last drawn.
    toggle_area: Rect,
}

impl NowPlayingPane {
    pub fn new() -> Self {
        Self {
            toggle_area: Rect::default(),
        }
    }
}

impl Default for NowPlayingPane {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for NowPlayingPane {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => vec![Action::TogglePlayback],
            KeyCode::Char('+') | KeyCode::Char('=') => vec![Action::AdjustVolume { increase: true }],
            KeyCode::Char('-') => vec![Action::AdjustVolume { increase: false }],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        let t = self.toggle_area;
        let hit = event.column >= t.x
            && event.column < t.x + t.width
            && event.row >= t.y
            && event.row < t.y + t.height;
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) if hit => vec![Action::TogglePlayback],
            MouseEventKind::ScrollUp => vec![Action::AdjustVolume { increase: true }],
            MouseEventKind::ScrollDown => vec![Action::AdjustVolume { increase: false }],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = if state.connected {
            Badge {
                text: "LIVE",
                color: C_BADGE_LIVE,
            }
        } else {
            Badge {
                text: "OFFLINE",
                color: C_BADGE_ERR,
            }
        };
        let block = pane_chrome("now playing", Some('3'), focused, Some(badge));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let np = &state.now_playing;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        // Title row: "[ Pause ]  Artist - Song            10.0.0.2  vol 20"
        let label = format!("[ {} ]", np.play_label.as_str());
        let label_color = match np.play_label {
            PlayLabel::Pause => C_PLAYING,
            PlayLabel::Play => C_PAUSED,
        };
        // The status may come from the first speaker when none is selected.
        let shown = if np.address.is_empty() {
            state.selected_speaker()
        } else {
            Some(np.address.as_str())
        };
        let detail = match (shown, np.volume) {
            (Some(addr), Some(vol)) => format!("{}  vol {}", addr, vol),
            (Some(addr), None) => addr.to_string(),
            (None, _) => "no speaker selected".to_string(),
        };
        let label_w = label.chars().count() as u16;
        self.toggle_area = Rect {
            x: rows[0].x,
            y: rows[0].y,
            width: label_w.min(rows[0].width),
            height: 1,
        };
        let title_w = (rows[0].width as usize).saturating_sub(label.len() + detail.len() + 4);
        let title = if np.title.is_empty() {
            "nothing playing".to_string()
        } else {
            truncate_to_width(&np.title, title_w)
        };
        let title_color = if np.title.is_empty() { C_MUTED } else { C_PRIMARY };

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(detail.len() as u16 + 1)])
            .split(rows[0]);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    label,
                    Style::default().fg(label_color).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    title,
                    Style::default().fg(title_color).add_modifier(Modifier::BOLD),
                ),
            ])),
            cols[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(detail, Style::default().fg(C_SECONDARY)))
                .alignment(Alignment::Right),
            cols[1],
        );

        if rows[1].height > 0 {
            draw_progress(frame, rows[1], np.progress_pct, np.elapsed_secs, np.duration_secs);
        }
    }
}
