//! Demo mode: a local stand-in for the scanner that pushes plausible events
//! into the same channel the websocket reader feeds.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::types::{ChannelEvent, DetectionEvent, GpsFix, StatusSnapshot};

// Vendor prefixes and advertised names seen on the real hardware.
const MAC_PREFIXES: &[&str] = &["58:8e:81", "cc:cc:cc", "ec:1b:bd", "70:c9:4e", "3c:91:80", "d8:f3:bc"];
const NAMES: &[&str] = &["FS Ext Battery", "Penguin", "Flock", "Pigvision"];
const HOME: (f64, f64) = (33.7490, -84.3880);

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub seed: u64,
    /// Detections arrive at a random gap in [min_gap, max_gap].
    pub min_gap: Duration,
    pub max_gap: Duration,
    /// Send a GPS fix every this many detections.
    pub gps_every: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            min_gap: Duration::from_millis(250),
            max_gap: Duration::from_millis(2500),
            gps_every: 4,
        }
    }
}

/// Everything the demo source emits, minus the pacing; split out for tests.
pub struct DemoScanner {
    rng: StdRng,
    count: u64,
    start_time: f64,
    gps_every: u32,
}

impl DemoScanner {
    pub fn new(seed: u64, gps_every: u32) -> Self {
        let start_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        Self {
            rng: StdRng::seed_from_u64(seed),
            count: 0,
            start_time,
            gps_every: gps_every.max(1),
        }
    }

    /// What a freshly connected client receives.
    pub fn greeting(&self) -> Vec<ChannelEvent> {
        vec![
            ChannelEvent::Connect,
            ChannelEvent::StatusUpdate(self.status("Waiting...")),
        ]
    }

    /// One scan result: the detection, the refreshed counters, sometimes a fix.
    pub fn next_batch(&mut self) -> Vec<ChannelEvent> {
        let detection = self.detection();
        self.count += 1;
        let mut out = vec![
            ChannelEvent::NewDetection(detection),
            ChannelEvent::StatusUpdate(self.status("Fix")),
        ];
        if self.count % u64::from(self.gps_every) == 0 {
            out.push(ChannelEvent::GpsUpdate(self.fix()));
        }
        out
    }

    fn status(&self, gps: &str) -> StatusSnapshot {
        StatusSnapshot {
            detection_count: self.count,
            gps_status: gps.into(),
            start_time: Some(self.start_time),
        }
    }

    fn detection(&mut self) -> DetectionEvent {
        let rng = &mut self.rng;
        let prefix = MAC_PREFIXES.choose(rng).copied().unwrap_or("00:00:00");
        let mac = format!(
            "{prefix}:{:02x}:{:02x}:{:02x}",
            rng.gen::<u8>(),
            rng.gen::<u8>(),
            rng.gen::<u8>()
        );
        let name = if rng.gen_bool(0.6) {
            NAMES.choose(rng).map(|n| n.to_string())
        } else {
            None
        };
        // a few readings land outside the scope range, as real radios do
        let rssi = rng.gen_range(-105..=-25);
        let threat_score = match rng.gen_range(0..10) {
            0 => rng.gen_range(90.0..=100.0),
            1..=3 => rng.gen_range(50.0..90.0),
            _ => rng.gen_range(10.0..50.0),
        };
        DetectionEvent {
            protocol: if rng.gen_bool(0.5) { "BLE" } else { "WiFi" }.into(),
            mac,
            name,
            rssi: Some(rssi),
            threat_score: (threat_score * 10.0_f64).round() / 10.0,
        }
    }

    fn fix(&mut self) -> GpsFix {
        GpsFix {
            lat: HOME.0 + self.rng.gen_range(-0.01..0.01),
            lon: HOME.1 + self.rng.gen_range(-0.01..0.01),
            status: Some("Fix".into()),
        }
    }

    pub fn gap(&mut self, cfg: &DemoConfig) -> Duration {
        if cfg.max_gap <= cfg.min_gap {
            return cfg.min_gap;
        }
        self.rng.gen_range(cfg.min_gap..=cfg.max_gap)
    }
}

/// Feed synthetic events until the receiver goes away.
pub fn spawn_demo_feed(cfg: DemoConfig, tx: mpsc::Sender<ChannelEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut scanner = DemoScanner::new(cfg.seed, cfg.gps_every);
        for ev in scanner.greeting() {
            if tx.send(ev).await.is_err() {
                return;
            }
        }
        loop {
            sleep(scanner.gap(&cfg)).await;
            for ev in scanner.next_batch() {
                if tx.send(ev).await.is_err() {
                    return;
                }
            }
        }
    })
}
