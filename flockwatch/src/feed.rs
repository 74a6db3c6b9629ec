//! Bounded newest-first log of detections as they arrived on the channel.

use std::collections::VecDeque;

use chrono::NaiveTime;

use crate::types::DetectionEvent;

pub const FEED_CAPACITY: usize = 50;
pub const CRITICAL_SCORE: f64 = 90.0;
pub const UNKNOWN_NAME: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    /// Local arrival time; detections carry no timestamp of their own.
    pub seen_at: NaiveTime,
    pub protocol: String,
    pub mac: String,
    pub name: Option<String>,
    pub rssi: Option<i32>,
    pub threat_score: f64,
    pub critical: bool,
}

impl FeedEntry {
    pub fn new(ev: &DetectionEvent, seen_at: NaiveTime) -> Self {
        Self {
            seen_at,
            protocol: ev.protocol.clone(),
            mac: ev.mac.clone(),
            name: ev.name.clone(),
            rssi: ev.rssi,
            threat_score: ev.threat_score,
            critical: ev.threat_score >= CRITICAL_SCORE,
        }
    }

    pub fn clock_label(&self) -> String {
        self.seen_at.format("%H:%M:%S").to_string()
    }

    /// `-61dB`, or `--dB` when no level was reported.
    pub fn rssi_label(&self) -> String {
        match self.rssi {
            Some(r) => format!("{r}dB"),
            None => "--dB".into(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ => UNKNOWN_NAME,
        }
    }
}

#[derive(Debug)]
pub struct Feed {
    entries: VecDeque<FeedEntry>,
    cap: usize,
}

impl Feed {
    pub fn new() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap + 1),
            cap: cap.max(1),
        }
    }

    /// Insert at the head; evicts at most one entry from the tail.
    pub fn push(&mut self, ev: &DetectionEvent, seen_at: NaiveTime) -> (FeedEntry, Option<FeedEntry>) {
        let entry = FeedEntry::new(ev, seen_at);
        self.entries.push_front(entry.clone());
        let evicted = if self.entries.len() > self.cap {
            self.entries.pop_back()
        } else {
            None
        };
        (entry, evicted)
    }

    /// Newest first.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn head(&self) -> Option<&FeedEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}
