//! Dashboard controller: fans channel events out to the feed, radar and threat
//! gauge, and owns the few bits of cross-cutting state (epoch, counters, timers).
//!
//! Everything here is driven by one owner; there is no interior mutability.

use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use crate::clock::{format_uptime, ConnectionEpoch, Moment};
use crate::feed::Feed;
use crate::radar::{BlipId, RadarSimulator, BLIP_LIFETIME};
use crate::render::{GpsReadout, GpsTone, LinkState, Renderer};
use crate::threat::{ThreatAggregator, ThreatDisplay};
use crate::timer::TimerQueue;
use crate::types::{ChannelEvent, DetectionEvent, GpsFix, StatusSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashTimer {
    BlipExpiry(BlipId),
    ThreatDecay,
}

pub struct Dashboard<R> {
    epoch: ConnectionEpoch,
    feed: Feed,
    radar: RadarSimulator<R>,
    threat: ThreatAggregator,
    timers: TimerQueue<DashTimer>,
    detection_count: Option<u64>,
    gps: GpsReadout,
}

impl<R: Rng> Dashboard<R> {
    pub fn new(rng: R, at: &Moment) -> Self {
        Self {
            epoch: ConnectionEpoch::new(at),
            feed: Feed::new(),
            radar: RadarSimulator::new(rng),
            threat: ThreatAggregator::new(),
            timers: TimerQueue::new(),
            detection_count: None,
            gps: GpsReadout::default(),
        }
    }

    /// Push the initial state so a fresh surface matches the controller.
    pub fn prime<V: Renderer>(&self, at: &Moment, view: &mut V) {
        view.set_link_state(LinkState::Connecting);
        view.set_threat_display(self.threat.display());
        view.set_gps_readout(&self.gps);
        self.tick_uptime(at, view);
    }

    /// Timers already due at `at` fire first, so an overdue decay is never
    /// folded into by a later detection.
    pub fn apply<V: Renderer>(&mut self, event: ChannelEvent, at: &Moment, view: &mut V) {
        self.fire_due(at.mono, view);
        match event {
            ChannelEvent::Connect => self.on_connect(view),
            ChannelEvent::StatusUpdate(s) => self.on_status_update(s, view),
            ChannelEvent::GpsUpdate(fix) => self.on_gps_update(&fix, view),
            ChannelEvent::NewDetection(d) => self.on_new_detection(&d, at, view),
        }
    }

    pub fn on_connect<V: Renderer>(&mut self, view: &mut V) {
        info!("connected to scanner");
        view.set_link_state(LinkState::Live);
    }

    pub fn on_status_update<V: Renderer>(&mut self, s: StatusSnapshot, view: &mut V) {
        self.detection_count = Some(s.detection_count);
        view.set_detection_count(s.detection_count);

        // text only: the tone stays whatever the last fix left it at
        self.gps.text = s.gps_status;
        view.set_gps_readout(&self.gps);

        // zero means the server has no start time yet
        if let Some(start) = s.start_time.filter(|t| *t != 0.0) {
            if !self.epoch.reset_to_unix(start) {
                debug!(start, "ignoring unusable start_time");
            }
        }
    }

    pub fn on_gps_update<V: Renderer>(&mut self, fix: &GpsFix, view: &mut V) {
        self.gps = GpsReadout {
            text: format!("FIX [{:.4}, {:.4}]", fix.lat, fix.lon),
            tone: GpsTone::Fix,
        };
        view.set_gps_readout(&self.gps);
    }

    pub fn on_new_detection<V: Renderer>(&mut self, d: &DetectionEvent, at: &Moment, view: &mut V) {
        debug!(mac = %d.mac, rssi = ?d.rssi, score = d.threat_score, "detection");

        let (entry, evicted) = self.feed.push(d, at.wall.time());
        view.show_feed_entry(&entry, evicted.as_ref());

        let (id, blip) = self.radar.spawn(d);
        self.timers
            .schedule_after(at.mono, BLIP_LIFETIME, DashTimer::BlipExpiry(id));
        view.show_blip(id, &blip);

        let display = self.threat.record(d.threat_score, at.mono, &mut self.timers);
        view.set_threat_display(display);
    }

    /// Recompute uptime from the epoch; a new `start_time` shows up on the next call.
    pub fn tick_uptime<V: Renderer>(&self, at: &Moment, view: &mut V) {
        view.set_uptime(&format_uptime(self.epoch.elapsed(at)));
    }

    /// Run every timer due at `now`. Returns how many fired.
    pub fn fire_due<V: Renderer>(&mut self, now: Instant, view: &mut V) -> usize {
        let mut fired = 0;
        while let Some((handle, timer)) = self.timers.pop_due(now) {
            fired += 1;
            match timer {
                DashTimer::BlipExpiry(id) => {
                    if self.radar.expire(id).is_some() {
                        view.remove_blip(id);
                    }
                }
                DashTimer::ThreatDecay => {
                    if let Some(display) = self.threat.decay(handle) {
                        debug!("threat level decayed");
                        view.set_threat_display(display);
                    }
                }
            }
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn link_lost<V: Renderer>(&mut self, view: &mut V) {
        info!("scanner channel closed");
        view.set_link_state(LinkState::Lost);
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn radar(&self) -> &RadarSimulator<R> {
        &self.radar
    }

    pub fn threat(&self) -> ThreatDisplay {
        self.threat.display()
    }

    pub fn decay_deadline(&self) -> Option<Instant> {
        self.threat.decay_deadline()
    }

    pub fn pending_decays(&self) -> usize {
        self.timers
            .iter()
            .filter(|t| matches!(t, DashTimer::ThreatDecay))
            .count()
    }

    pub fn detection_count(&self) -> Option<u64> {
        self.detection_count
    }

    pub fn gps(&self) -> &GpsReadout {
        &self.gps
    }
}
