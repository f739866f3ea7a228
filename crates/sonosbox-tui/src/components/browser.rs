//! Browser component. The main list shows directory entries or, after `o`,
//! every speaker with play/next actions for one file.
//!
//! Local state only (selection, scroll, pending marker jump). The list
//! contents come from `AppState::data_list` and are resynced whenever
//! `data_rev` changes.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use sonosbox_proto::listing::{entry_id, TOP_MARKER};
use sonosbox_proto::{BrowsePath, PlayMode, SpeakerStatus};

use crate::{
    action::Action,
    app_state::{AppState, DataList},
    component::Component,
    theme::{
        C_DIRECTORY, C_MARKER, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY, C_SELECTION_BG,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        text::truncate_to_width,
    },
};

const MARKER_COLUMN_WIDTH: u16 = 3;

#[derive(Debug, Clone)]
enum Row {
    Entry(String),
    Speaker(SpeakerStatus),
}

pub struct Browser {
    list: ScrollableList<Row>,
    list_state: ListState,
    synced_rev: u64,
    /// `'` was pressed; the next key picks a marker.
    awaiting_marker: bool,
    /// Where the rows and the marker column were last drawn, for mouse hits.
    list_area: Rect,
    marker_area: Rect,
}

impl Browser {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            list_state: ListState::default(),
            synced_rev: 0,
            awaiting_marker: false,
            list_area: Rect::default(),
            marker_area: Rect::default(),
        }
    }

    /// True while a marker jump is pending and keys must reach the browser first.
    pub fn is_awaiting_marker(&self) -> bool {
        self.awaiting_marker
    }

    fn sync(&mut self, state: &AppState) {
        if self.synced_rev == state.data_rev {
            return;
        }
        self.synced_rev = state.data_rev;
        let rows = match &state.data_list {
            DataList::Empty => Vec::new(),
            DataList::Files(listing) => listing.entries.iter().cloned().map(Row::Entry).collect(),
            DataList::Speakers { rows, .. } => rows.iter().cloned().map(Row::Speaker).collect(),
        };
        self.list.set_items(rows);
        self.awaiting_marker = false;
    }

    /// Jump to the marker labelled `key` (`○` is the top).
    fn jump(&mut self, key: char, state: &AppState) {
        let target = match state.listing() {
            Some(listing) => listing.jump_target(key),
            None if key == TOP_MARKER => Some(0),
            None => None,
        };
        if let Some(index) = target {
            self.list.select(index);
        }
    }

    /// Activate the selected row with Enter (or a click).
    fn activate(&self, state: &AppState) -> Vec<Action> {
        match self.list.selected_item() {
            Some(Row::Entry(name)) => vec![Action::OpenEntry(entry_id(name))],
            Some(Row::Speaker(_)) => self.speaker_action(PlayMode::Play, state),
            None => vec![],
        }
    }

    fn speaker_action(&self, mode: PlayMode, state: &AppState) -> Vec<Action> {
        match (self.list.selected_item(), &state.data_list) {
            (Some(Row::Speaker(row)), DataList::Speakers { target, .. }) => {
                vec![Action::PlayOrNext {
                    speaker: row.address.clone(),
                    path: target.clone(),
                    mode,
                }]
            }
            _ => vec![],
        }
    }

    /// Offer the selected file to every speaker.
    fn show_speakers(&self, state: &AppState) -> Vec<Action> {
        match self.list.selected_item() {
            Some(Row::Entry(name)) if !name.ends_with('/') => {
                let path = state.info_bar.join(name);
                vec![Action::ShowSpeakers(path.control_path().to_string())]
            }
            _ => vec![],
        }
    }

    /// Leave the speaker action list for the directory holding its file.
    fn close_speakers(state: &AppState) -> Vec<Action> {
        match &state.data_list {
            DataList::Speakers { target, .. } => {
                vec![Action::ListFiles(BrowsePath::for_listing(target).parent())]
            }
            _ => vec![],
        }
    }

    fn marker_labels(state: &AppState) -> Vec<String> {
        match state.listing() {
            Some(listing) => listing.marker_labels(),
            None => vec![TOP_MARKER.to_string()],
        }
    }
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Browser {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync(state);

        if self.awaiting_marker {
            self.awaiting_marker = false;
            if let KeyCode::Char(c) = key.code {
                self.jump(c, state);
            }
            return vec![];
        }

        let showing_speakers = matches!(state.data_list, DataList::Speakers { .. });
        match key.code {
            KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Char('\'') if !showing_speakers => self.awaiting_marker = true,

            KeyCode::Enter => return self.activate(state),
            KeyCode::Char('n') if showing_speakers => {
                return self.speaker_action(PlayMode::Next, state);
            }
            KeyCode::Char('o') if !showing_speakers => return self.show_speakers(state),
            KeyCode::Esc if showing_speakers => return Self::close_speakers(state),
            KeyCode::Backspace | KeyCode::Char('h') => {
                return if showing_speakers {
                    Self::close_speakers(state)
                } else {
                    vec![Action::NavigateUp]
                };
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        self.sync(state);
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(self.marker_area, event.column, event.row) {
                    let slot = (event.row - self.marker_area.y) as usize;
                    let labels = Self::marker_labels(state);
                    if let Some(c) = labels.get(slot).and_then(|l| l.chars().next()) {
                        self.jump(c, state);
                    }
                } else if contains(self.list_area, event.column, event.row) {
                    let row = (event.row - self.list_area.y) as usize;
                    if self.list.handle_click(row) {
                        return self.activate(state);
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if let Action::ListFiles(_) | Action::ShowSpeakers(_) = action {
            self.awaiting_marker = false;
        }
        self.sync(state);
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync(state);

        let title = if state.description.is_empty() {
            "files"
        } else {
            state.description.as_str()
        };
        let badge = self.awaiting_marker.then_some(Badge {
            text: "JUMP",
            color: C_MARKER,
        });
        let block = pane_chrome(title, Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(MARKER_COLUMN_WIDTH)])
            .split(inner);
        self.list_area = cols[0];
        self.marker_area = cols[1];

        self.draw_markers(frame, state);

        if self.list.is_empty() {
            let hint = match state.data_list {
                DataList::Empty => "  waiting for the service…",
                DataList::Files(_) => "  empty directory",
                DataList::Speakers { .. } => "  no speakers found",
            };
            frame.render_widget(
                Paragraph::new(Span::styled(hint, Style::default().fg(C_MUTED))),
                self.list_area,
            );
            return;
        }

        let content_h = self.list_area.height as usize;
        let name_w = self.list_area.width.saturating_sub(4) as usize;
        self.list.ensure_visible(content_h);
        let selected = self.list.selected;
        let listing = state.listing();

        let items: Vec<ListItem> = self
            .list
            .visible_items(content_h)
            .into_iter()
            .map(|(idx, row)| {
                let is_selected = idx == selected;
                let line = match row {
                    Row::Entry(name) => {
                        let marker = listing
                            .and_then(|l| l.marker_at(idx))
                            .map(|m| m.label())
                            .unwrap_or_default();
                        let is_dir = name.ends_with('/');
                        let color = if is_dir {
                            C_DIRECTORY
                        } else if is_selected {
                            C_PRIMARY
                        } else {
                            C_SECONDARY
                        };
                        let mut style = Style::default().fg(color);
                        if is_selected {
                            style = style.add_modifier(Modifier::BOLD);
                        }
                        Line::from(vec![
                            Span::styled(format!("{:<2}", marker), Style::default().fg(C_MARKER)),
                            Span::styled(if is_dir { "▸ " } else { "  " }, Style::default().fg(C_DIRECTORY)),
                            Span::styled(truncate_to_width(name, name_w), style),
                        ])
                    }
                    Row::Speaker(status) => {
                        let icon = if status.is_playing { "▶ " } else { "  " };
                        Line::from(vec![
                            Span::styled(format!("  {}", icon), Style::default().fg(C_PLAYING)),
                            Span::styled(
                                truncate_to_width(&status.summary(), name_w.saturating_sub(20)),
                                Style::default().fg(if is_selected { C_PRIMARY } else { C_SECONDARY }),
                            ),
                            Span::styled("  ⏎ play  n next", Style::default().fg(C_MUTED)),
                        ])
                    }
                };
                let bg = if is_selected {
                    Style::default().bg(C_SELECTION_BG)
                } else {
                    Style::default()
                };
                ListItem::new(line).style(bg)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default())
            .highlight_symbol("");
        self.list_state
            .select(Some(selected.saturating_sub(self.list.scroll_offset)));
        frame.render_stateful_widget(list, self.list_area, &mut self.list_state);
    }
}

impl Browser {
    fn draw_markers(&self, frame: &mut Frame, state: &AppState) {
        let lines: Vec<Line> = Self::marker_labels(state)
            .into_iter()
            .take(self.marker_area.height as usize)
            .map(|label| Line::from(Span::styled(format!(" {}", label), Style::default().fg(C_MARKER))))
            .collect();
        frame.render_widget(Paragraph::new(lines), self.marker_area);
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}
