//! Display model for the terminal: the dashboard pushes into it through
//! `Renderer`, the draw functions read from it.

use std::collections::{BTreeMap, VecDeque};

use crate::feed::{FeedEntry, FEED_CAPACITY};
use crate::radar::{BlipId, RadarBlip};
use crate::render::{GpsReadout, LinkState, Renderer};
use crate::threat::{ThreatDisplay, ThreatTier};

#[derive(Debug)]
pub struct Panels {
    pub link: LinkState,
    /// Newest first, mirrors the dashboard's feed.
    pub feed: VecDeque<FeedEntry>,
    pub blips: BTreeMap<BlipId, RadarBlip>,
    pub threat: ThreatDisplay,
    pub uptime: String,
    pub detection_count: Option<u64>,
    pub gps: GpsReadout,
}

impl Panels {
    pub fn new() -> Self {
        Self {
            link: LinkState::Connecting,
            feed: VecDeque::with_capacity(FEED_CAPACITY + 1),
            blips: BTreeMap::new(),
            threat: ThreatDisplay {
                level: 0.0,
                tier: ThreatTier::Scanning,
            },
            uptime: "00:00:00".into(),
            detection_count: None,
            gps: GpsReadout::default(),
        }
    }
}

impl Default for Panels {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for Panels {
    fn set_link_state(&mut self, state: LinkState) {
        self.link = state;
    }

    fn show_feed_entry(&mut self, entry: &FeedEntry, evicted: Option<&FeedEntry>) {
        self.feed.push_front(entry.clone());
        if evicted.is_some() {
            self.feed.pop_back();
        }
    }

    fn show_blip(&mut self, id: BlipId, blip: &RadarBlip) {
        self.blips.insert(id, *blip);
    }

    fn remove_blip(&mut self, id: BlipId) {
        self.blips.remove(&id);
    }

    fn set_threat_display(&mut self, display: ThreatDisplay) {
        self.threat = display;
    }

    fn set_uptime(&mut self, uptime: &str) {
        uptime.clone_into(&mut self.uptime);
    }

    fn set_detection_count(&mut self, count: u64) {
        self.detection_count = Some(count);
    }

    fn set_gps_readout(&mut self, gps: &GpsReadout) {
        self.gps = gps.clone();
    }
}
