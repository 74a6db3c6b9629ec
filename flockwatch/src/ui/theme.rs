//! Shared UI theme constants.

use ratatui::style::Color;

use crate::radar::BlipClass;
use crate::render::{GpsTone, LinkState};
use crate::threat::ThreatTier;

// Scrollbar colors
pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(170, 170, 180);
pub const SB_THUMB: Color = Color::Rgb(170, 170, 180);

pub const PRIMARY: Color = Color::Rgb(0, 255, 157);
pub const SECONDARY: Color = Color::Rgb(0, 184, 255);
pub const WARNING: Color = Color::Rgb(255, 204, 0);
pub const ACCENT: Color = Color::Rgb(255, 0, 85);
pub const DIM: Color = Color::DarkGray;
pub const SCOPE: Color = Color::Rgb(0, 110, 70);

pub fn tier_color(tier: ThreatTier) -> Color {
    match tier {
        ThreatTier::Critical => ACCENT,
        ThreatTier::Elevated => WARNING,
        ThreatTier::Low => PRIMARY,
        ThreatTier::Scanning => SECONDARY,
    }
}

pub fn blip_color(class: BlipClass) -> Color {
    match class {
        BlipClass::Critical => ACCENT,
        BlipClass::Neutral => WARNING,
        BlipClass::Safe => PRIMARY,
    }
}

pub fn gps_color(tone: GpsTone) -> Color {
    match tone {
        GpsTone::Waiting => DIM,
        GpsTone::Fix => PRIMARY,
    }
}

pub fn link_color(link: LinkState) -> Color {
    match link {
        LinkState::Connecting => WARNING,
        LinkState::Live => PRIMARY,
        LinkState::Lost => ACCENT,
    }
}
