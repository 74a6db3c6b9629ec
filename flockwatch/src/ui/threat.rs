//! Threat gauge with tier label.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Gauge},
};

use crate::ui::panels::Panels;
use crate::ui::theme::tier_color;

pub fn draw_threat(f: &mut ratatui::Frame<'_>, area: Rect, p: &Panels) {
    let color = tier_color(p.threat.tier);
    // the level itself is unclamped; only the bar fill is bounded
    let ratio = (p.threat.level / 100.0).clamp(0.0, 1.0);
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    let label = Span::styled(
        format!("{}  {:.0}%", p.threat.tier.label(), p.threat.level),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    );
    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Threat Level"))
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(label);
    f.render_widget(g, area);
}
