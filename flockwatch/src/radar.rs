//! Radar blips: one short-lived marker per detection.
//!
//! RSSI says how close a transmitter probably is, never where. The bearing is a
//! uniformly random angle chosen purely so concurrent blips spread out on the
//! scope; it must not be read as a direction finding.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;

use crate::types::DetectionEvent;

pub const BLIP_LIFETIME: Duration = Duration::from_millis(3000);
pub const RSSI_NEAR: i32 = -30;
pub const RSSI_FAR: i32 = -100;
/// Outermost blip radius, in percent of the scope radius.
pub const MAX_RADIUS_PCT: f64 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlipId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlipClass {
    Critical,
    Neutral,
    Safe,
}

impl BlipClass {
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Critical
        } else if score < 50.0 {
            Self::Safe
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarBlip {
    /// Synthetic, [0, 360).
    pub bearing_deg: f64,
    /// [0, 45] percent of the scope radius; 0 is the centre.
    pub radius_pct: f64,
    pub class: BlipClass,
}

impl RadarBlip {
    /// Offset from the scope centre in percent, screen orientation (y grows downward).
    pub fn offset(&self) -> (f64, f64) {
        let rad = self.bearing_deg.to_radians();
        (self.radius_pct * rad.cos(), self.radius_pct * rad.sin())
    }
}

/// Linear map of clamped RSSI onto [0, 45]: -30 dBm sits on the centre, -100 dBm on the rim.
pub fn radius_for_rssi(rssi: i32) -> f64 {
    let clamped = rssi.clamp(RSSI_FAR, RSSI_NEAR) as f64;
    ((clamped - RSSI_NEAR as f64) / (RSSI_FAR - RSSI_NEAR) as f64) * MAX_RADIUS_PCT
}

/// Live blips keyed by an internal slot id. No cap on how many may be live at once.
#[derive(Debug)]
pub struct RadarSimulator<R> {
    rng: R,
    live: BTreeMap<BlipId, RadarBlip>,
    next_id: u64,
}

impl<R: Rng> RadarSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            live: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn spawn(&mut self, ev: &DetectionEvent) -> (BlipId, RadarBlip) {
        let blip = RadarBlip {
            bearing_deg: self.rng.gen_range(0.0..360.0),
            // no reading plots on the centre
            radius_pct: ev.rssi.map_or(0.0, radius_for_rssi),
            class: BlipClass::for_score(ev.threat_score),
        };
        let id = BlipId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, blip);
        (id, blip)
    }

    pub fn expire(&mut self, id: BlipId) -> Option<RadarBlip> {
        self.live.remove(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
