//! Radar scope: range rings and live blips.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders,
    },
};

use crate::radar::MAX_RADIUS_PCT;
use crate::ui::panels::Panels;
use crate::ui::theme::{blip_color, SCOPE};

pub fn draw_radar(f: &mut ratatui::Frame<'_>, area: Rect, p: &Panels) {
    let title = format!("Radar ({} live, bearing synthetic)", p.blips.len());
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds([-50.0, 50.0])
        .y_bounds([-50.0, 50.0])
        .paint(|ctx| {
            for r in [MAX_RADIUS_PCT / 3.0, MAX_RADIUS_PCT * 2.0 / 3.0, MAX_RADIUS_PCT] {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: r,
                    color: SCOPE,
                });
            }
            ctx.draw(&CanvasLine::new(-MAX_RADIUS_PCT, 0.0, MAX_RADIUS_PCT, 0.0, SCOPE));
            ctx.draw(&CanvasLine::new(0.0, -MAX_RADIUS_PCT, 0.0, MAX_RADIUS_PCT, SCOPE));
            ctx.layer();
            for blip in p.blips.values() {
                let (dx, dy) = blip.offset();
                // canvas y grows upward, blip offsets are in screen orientation
                ctx.print(
                    dx,
                    -dy,
                    Span::styled(
                        "●",
                        Style::default()
                            .fg(blip_color(blip.class))
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    f.render_widget(canvas, area);
}
