//! SpeakerList component: the speaker selector.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{pane_chrome::pane_chrome, scrollable_list::ScrollableList, text::truncate_to_width},
};

pub struct SpeakerList {
    list: ScrollableList<String>,
}

impl SpeakerList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
        }
    }

    /// Options only ever grow, so a length change means new speakers.
    fn sync(&mut self, state: &AppState) {
        if self.list.len() == state.speakers.len() {
            return;
        }
        let selected = self.list.selected;
        self.list.set_items(state.speakers.clone());
        let current = state
            .selected_speaker()
            .and_then(|s| state.speakers.iter().position(|x| x == s));
        self.list.select(current.unwrap_or(selected));
    }

    fn select_current(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(address) => vec![Action::SelectSpeaker(address.clone())],
            None => vec![],
        }
    }
}

impl Default for SpeakerList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SpeakerList {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync(state);
        match key.code {
            KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => return self.select_current(),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        self.sync(state);
        let rel_row = event.row.saturating_sub(area.y + 1) as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                if self.list.handle_click(rel_row) {
                    return self.select_current();
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync(state);
        let block = pane_chrome("speakers", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  no speakers yet", Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        let width = inner.width.saturating_sub(3) as usize;
        self.list.ensure_visible(height);
        let cursor = self.list.selected;

        let items: Vec<ListItem> = self
            .list
            .visible_items(height)
            .into_iter()
            .map(|(idx, address)| {
                let active = state.selected_speaker() == Some(address.as_str());
                let (dot, name_color) = if active {
                    ("● ", C_PRIMARY)
                } else {
                    ("  ", C_SECONDARY)
                };
                let mut name_style = Style::default().fg(name_color);
                if active {
                    name_style = name_style.add_modifier(Modifier::BOLD);
                }
                let bg = if idx == cursor && focused {
                    Style::default().bg(C_SELECTION_BG)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {}", dot), Style::default().fg(C_PLAYING)),
                    Span::styled(truncate_to_width(address, width), name_style),
                ]))
                .style(bg)
            })
            .collect();

        frame.render_widget(List::new(items), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_selects_the_highlighted_speaker() {
        let mut state = AppState::new(String::new(), None);
        state.speakers = vec!["10.0.0.2".into(), "10.0.0.3".into()];
        state.selected_speaker = Some("10.0.0.2".into());

        let mut list = SpeakerList::new();
        list.handle_key(key(KeyCode::Char('j')), &state);
        assert_eq!(
            list.handle_key(key(KeyCode::Enter), &state),
            vec![Action::SelectSpeaker("10.0.0.3".into())]
        );
    }

    #[test]
    fn cursor_starts_on_the_selected_speaker() {
        let mut state = AppState::new(String::new(), None);
        state.speakers = vec!["a".into(), "b".into(), "c".into()];
        state.selected_speaker = Some("c".into());

        let mut list = SpeakerList::new();
        assert_eq!(
            list.handle_key(key(KeyCode::Enter), &state),
            vec![Action::SelectSpeaker("c".into())]
        );
    }
}
