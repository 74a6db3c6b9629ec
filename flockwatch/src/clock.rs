//! Uptime clock: elapsed time since the connection epoch, re-derived on every tick.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};

pub const UPTIME_TICK: Duration = Duration::from_millis(1000);

/// A single observation of "now", monotonic for timers and wall-clock for display.
#[derive(Debug, Clone, Copy)]
pub struct Moment {
    pub mono: Instant,
    pub wall: DateTime<Local>,
}

impl Moment {
    pub fn now() -> Self {
        Self {
            mono: Instant::now(),
            wall: Local::now(),
        }
    }

    /// The same moment shifted forward; handy for driving timers deterministically.
    pub fn after(&self, d: Duration) -> Self {
        let wall = chrono::Duration::from_std(d)
            .ok()
            .and_then(|cd| self.wall.checked_add_signed(cd))
            .unwrap_or(self.wall);
        Self {
            mono: self.mono + d,
            wall,
        }
    }
}

/// When the session started, as far as the dashboard knows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionEpoch {
    start: DateTime<Utc>,
}

impl ConnectionEpoch {
    pub fn new(at: &Moment) -> Self {
        Self {
            start: at.wall.with_timezone(&Utc),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Overwrite with a server-supplied unix timestamp. Returns false (and keeps
    /// the old epoch) when the value can't be a timestamp.
    pub fn reset_to_unix(&mut self, secs: f64) -> bool {
        if !secs.is_finite() {
            return false;
        }
        let millis = (secs * 1000.0).floor();
        if millis.abs() >= i64::MAX as f64 {
            return false;
        }
        match DateTime::from_timestamp_millis(millis as i64) {
            Some(start) => {
                self.start = start;
                true
            }
            None => false,
        }
    }

    /// Saturates at zero if the epoch lies in the future (clock skew).
    pub fn elapsed(&self, at: &Moment) -> Duration {
        at.wall
            .with_timezone(&Utc)
            .signed_duration_since(self.start)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// `HH:MM:SS`; hours keep growing past 24 instead of rolling into days.
pub fn format_uptime(d: Duration) -> String {
    let total = d.as_secs();
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
