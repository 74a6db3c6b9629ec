//! What the dashboard needs from a presentation surface.

use crate::feed::FeedEntry;
use crate::radar::{BlipId, RadarBlip};
use crate::threat::ThreatDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Connecting,
    Live,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpsTone {
    #[default]
    Waiting,
    Fix,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpsReadout {
    pub text: String,
    pub tone: GpsTone,
}

impl Default for GpsReadout {
    fn default() -> Self {
        Self {
            text: "Waiting...".into(),
            tone: GpsTone::Waiting,
        }
    }
}

pub trait Renderer {
    fn set_link_state(&mut self, state: LinkState);
    /// `evicted` is the tail entry pushed out by this insertion, if any.
    fn show_feed_entry(&mut self, entry: &FeedEntry, evicted: Option<&FeedEntry>);
    fn show_blip(&mut self, id: BlipId, blip: &RadarBlip);
    fn remove_blip(&mut self, id: BlipId);
    fn set_threat_display(&mut self, display: ThreatDisplay);
    fn set_uptime(&mut self, uptime: &str);
    fn set_detection_count(&mut self, count: u64);
    fn set_gps_readout(&mut self, gps: &GpsReadout);
}
