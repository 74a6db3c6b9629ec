//! Detection feed table, newest on top, with a scrollbar.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::ui::panels::Panels;
use crate::ui::theme::{ACCENT, DIM, SECONDARY};
use crate::ui::util::{draw_scrollbar, truncate_middle};

const COLS: [Constraint; 4] = [
    Constraint::Length(8),  // time
    Constraint::Length(6),  // protocol
    Constraint::Min(12),    // mac + name
    Constraint::Length(7),  // rssi
];
// mac on one line, name under it
const ROW_HEIGHT: u16 = 2;

/// Rows that fit under the header for a feed drawn in `area` (borders included).
pub fn feed_page_rows(area: Rect) -> usize {
    (area.height.saturating_sub(3) / ROW_HEIGHT).max(1) as usize
}

/// Content area the wheel scrolls over.
pub fn feed_content_area(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(3),
        height: area.height.saturating_sub(2),
    }
}

pub fn draw_feed(f: &mut ratatui::Frame<'_>, area: Rect, p: &Panels, scroll_offset: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Detection Feed ({} shown)", p.feed.len()));
    f.render_widget(block, area);

    let content = feed_content_area(area);
    if content.height < 2 || content.width < 3 {
        return;
    }

    let total = p.feed.len();
    let view = feed_page_rows(area);
    let offset = scroll_offset.min(total.saturating_sub(view));
    let name_width = content.width.saturating_sub(8 + 6 + 7 + 3) as usize;

    let rows = p.feed.iter().skip(offset).take(view).map(|e| {
        let style = if e.critical {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let who = Text::from(vec![
            Line::from(truncate_middle(&e.mac, name_width)),
            Line::from(Span::styled(
                truncate_middle(e.display_name(), name_width),
                Style::default().fg(DIM),
            )),
        ]);
        Row::new(vec![
            Cell::from(e.clock_label()).style(Style::default().fg(Color::Gray)),
            Cell::from(e.protocol.clone()),
            Cell::from(who),
            Cell::from(e.rssi_label()),
        ])
        .height(ROW_HEIGHT)
        .style(style)
    });

    let header = Row::new(vec!["TIME", "PROTO", "DEVICE", "RSSI"]).style(
        Style::default()
            .fg(SECONDARY)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(rows, COLS.to_vec())
        .header(header)
        .column_spacing(1);
    f.render_widget(table, content);

    let scroll_area = Rect {
        x: area.x + area.width.saturating_sub(2),
        y: area.y + 1,
        width: 1,
        height: area.height.saturating_sub(2),
    };
    draw_scrollbar(f, scroll_area, total, view, offset);
}
