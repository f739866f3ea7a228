//! Status bar: bottom line with connection state, info bar and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ACCENT, C_INFO_BAR, C_MARKER, C_MUTED, C_PLAYING, C_SECONDARY};

/// Draw the log bar: connection dot plus the last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>, connected: bool) {
    let conn_span = if connected {
        Span::styled("●", Style::default().fg(C_PLAYING))
    } else {
        Span::styled("○", Style::default().fg(C_ACCENT))
    };

    let log_span = Span::styled(last_log.unwrap_or(""), Style::default().fg(C_SECONDARY));

    let line = Line::from(vec![conn_span, Span::raw(" "), log_span]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
/// `pending_jump` shows the marker prompt while a `'` sequence is open.
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, info_bar: &str, pending_jump: bool) {
    let mut spans = vec![Span::styled(
        format!(" {} ", info_bar),
        Style::default().fg(C_INFO_BAR).add_modifier(Modifier::BOLD),
    )];

    if pending_jump {
        spans.push(Span::styled(
            " JUMP ",
            Style::default().fg(C_MARKER).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            " type a marker letter, any other key cancels",
            Style::default().fg(C_MUTED),
        ));
    } else {
        spans.push(Span::styled(
            " jk select  Enter open  h up  o speakers  'x jump  ↑↓ vol  p play/pause  s stop  </> prev/next  Tab panes  L logs  ? help  q quit",
            Style::default().fg(C_MUTED),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
