//! Small UI helpers: truncation, scroll offset handling and a text scrollbar.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::{SB_ARROW, SB_THUMB, SB_TRACK};

pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(n - right).collect();
    format!("{head}...{tail}")
}

/// Up/Down/PageUp/PageDown/Home/End. Clamp afterwards with `scroll_clamp`.
pub fn scroll_handle_key(offset: &mut usize, key: KeyEvent, page: usize) {
    let page = page.max(1);
    match key.code {
        KeyCode::Up => *offset = offset.saturating_sub(1),
        KeyCode::Down => *offset = offset.saturating_add(1),
        KeyCode::PageUp => *offset = offset.saturating_sub(page),
        KeyCode::PageDown => *offset = offset.saturating_add(page),
        KeyCode::Home => *offset = 0,
        KeyCode::End => *offset = usize::MAX,
        _ => {}
    }
}

/// Wheel scrolling while the pointer is inside `area`.
pub fn scroll_handle_mouse(offset: &mut usize, mouse: MouseEvent, area: Rect) {
    let inside = mouse.column >= area.x
        && mouse.column < area.x + area.width
        && mouse.row >= area.y
        && mouse.row < area.y + area.height;
    if !inside {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => *offset = offset.saturating_sub(1),
        MouseEventKind::ScrollDown => *offset = offset.saturating_add(1),
        _ => {}
    }
}

pub fn scroll_clamp(offset: &mut usize, total: usize, view: usize) {
    *offset = (*offset).min(total.saturating_sub(view));
}

/// One-column scrollbar: arrows at both ends, thumb sized to the viewport.
pub fn draw_scrollbar(f: &mut ratatui::Frame<'_>, area: Rect, total: usize, view: usize, offset: usize) {
    if area.height < 3 {
        return;
    }
    let track = (area.height - 2) as usize;
    let total = total.max(1);
    let view = view.clamp(1, total);
    let max_off = total.saturating_sub(view);
    let offset = offset.min(max_off);

    let thumb_len = (track * view).div_ceil(total).max(1).min(track);
    let thumb_top = if max_off == 0 {
        0
    } else {
        ((track - thumb_len) * offset + max_off / 2) / max_off
    };

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
    for i in 0..track {
        if i >= thumb_top && i < thumb_top + thumb_len {
            lines.push(Line::from(Span::styled("█", Style::default().fg(SB_THUMB))));
        } else {
            lines.push(Line::from(Span::styled("│", Style::default().fg(SB_TRACK))));
        }
    }
    lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
    f.render_widget(Paragraph::new(lines), area);
}
