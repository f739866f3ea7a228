//! Smooth Unicode progress bar widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_PLAYING, C_SECONDARY};

/// Render a progress bar in `area`.
/// `percent` is 0.0..=100.0; the labels are track position and length in seconds.
pub fn draw_progress(frame: &mut Frame, area: Rect, percent: f64, elapsed: u32, duration: u32) {
    if area.width < 4 || area.height == 0 {
        return;
    }

    let left_label = fmt_time(elapsed);
    let right_label = fmt_time(duration);
    let label_w = (left_label.len() + right_label.len() + 2) as u16;
    let bar_w = area.width.saturating_sub(label_w).max(4) as usize;

    let bar = bar_cells(percent, bar_w);

    let line = Line::from(vec![
        Span::styled(format!("{} ", left_label), Style::default().fg(C_SECONDARY)),
        Span::styled(bar, Style::default().fg(C_PLAYING)),
        Span::styled(format!(" {}", right_label), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Fill `width` cells for `percent`, using eighth blocks for the partial cell.
fn bar_cells(percent: f64, width: usize) -> String {
    const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

    let eighths = ((percent / 100.0).clamp(0.0, 1.0) * width as f64 * 8.0) as usize;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..full_blocks {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}

pub fn fmt_time(secs: u32) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
