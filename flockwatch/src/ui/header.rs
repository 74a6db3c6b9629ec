//! Top header: link state, uptime, detection count and GPS status.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::render::LinkState;
use crate::ui::panels::Panels;
use crate::ui::theme::{gps_color, link_color, DIM, SECONDARY};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, p: &Panels) {
    let link = match p.link {
        LinkState::Connecting => "CONNECTING",
        LinkState::Live => "LIVE",
        LinkState::Lost => "LINK LOST",
    };
    let count = p
        .detection_count
        .map(|c| c.to_string())
        .unwrap_or_else(|| "--".into());
    let sep = Span::styled(" | ", Style::default().fg(DIM));
    let line = Line::from(vec![
        Span::styled(
            "flockwatch ",
            Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            link,
            Style::default()
                .fg(link_color(p.link))
                .add_modifier(Modifier::BOLD),
        ),
        sep.clone(),
        Span::raw(format!("uptime {}", p.uptime)),
        sep.clone(),
        Span::raw(format!("detections {count}")),
        sep,
        Span::raw("GPS "),
        Span::styled(p.gps.text.clone(), Style::default().fg(gps_color(p.gps.tone))),
        Span::styled("  (press 'q' to quit)", Style::default().fg(DIM)),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}
