//! Types that mirror the scanner server's event payloads.

use serde::Deserialize;
use serde_json::Value;

/// One wireless detection pushed by the scanner (`new_detection`).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DetectionEvent {
    pub protocol: String,
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    // dBm, typically -100..-30; null when the radio reported no level
    #[serde(default)]
    pub rssi: Option<i32>,
    // pre-computed upstream, nominally 0..=100 but not validated
    pub threat_score: f64,
}

/// Server-authoritative counters (`status_update`). Replaces prior values wholesale.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub detection_count: u64,
    pub gps_status: String,
    // unix seconds, fractional as the server emits time.time()
    #[serde(default)]
    pub start_time: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GpsFix {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub status: Option<String>,
}

/// The four subscriptions the dashboard listens to. Anything else on the
/// channel is dropped by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Connect,
    StatusUpdate(StatusSnapshot),
    GpsUpdate(GpsFix),
    NewDetection(DetectionEvent),
}

impl ChannelEvent {
    pub const CONNECT: &'static str = "connect";
    pub const STATUS_UPDATE: &'static str = "status_update";
    pub const GPS_UPDATE: &'static str = "gps_update";
    pub const NEW_DETECTION: &'static str = "new_detection";

    /// Map a named channel event onto a subscription. `Ok(None)` for names we
    /// don't subscribe to.
    pub fn from_named(name: &str, data: Value) -> Result<Option<Self>, serde_json::Error> {
        let ev = match name {
            Self::CONNECT => Self::Connect,
            Self::STATUS_UPDATE => Self::StatusUpdate(serde_json::from_value(data)?),
            Self::GPS_UPDATE => Self::GpsUpdate(serde_json::from_value(data)?),
            Self::NEW_DETECTION => Self::NewDetection(serde_json::from_value(data)?),
            _ => return Ok(None),
        };
        Ok(Some(ev))
    }

}
