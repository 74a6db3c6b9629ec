//! End-to-end behaviour of the dashboard controller against a recording surface.
use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{Local, TimeZone};
use flockwatch::clock::Moment;
use flockwatch::dashboard::Dashboard;
use flockwatch::feed::{FeedEntry, FEED_CAPACITY};
use flockwatch::radar::{BlipClass, BlipId, RadarBlip};
use flockwatch::render::{GpsReadout, GpsTone, LinkState, Renderer};
use flockwatch::threat::{ThreatDisplay, ThreatTier};
use flockwatch::types::{ChannelEvent, DetectionEvent, GpsFix, StatusSnapshot};
use flockwatch::ui::panels::Panels;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Default)]
struct Recorder {
    link: Option<LinkState>,
    feed: Vec<FeedEntry>,
    blips: BTreeMap<BlipId, RadarBlip>,
    blips_shown: usize,
    threat: Vec<ThreatDisplay>,
    uptime: Vec<String>,
    count: Option<u64>,
    gps: Option<GpsReadout>,
}

impl Recorder {
    fn labels(&self) -> Vec<&'static str> {
        self.threat.iter().map(|t| t.tier.label()).collect()
    }

    fn last_threat(&self) -> ThreatDisplay {
        *self.threat.last().expect("threat display set")
    }
}

impl Renderer for Recorder {
    fn set_link_state(&mut self, state: LinkState) {
        self.link = Some(state);
    }
    fn show_feed_entry(&mut self, entry: &FeedEntry, evicted: Option<&FeedEntry>) {
        self.feed.insert(0, entry.clone());
        if let Some(old) = evicted {
            assert_eq!(self.feed.pop().as_ref(), Some(old));
        }
    }
    fn show_blip(&mut self, id: BlipId, blip: &RadarBlip) {
        self.blips_shown += 1;
        self.blips.insert(id, *blip);
    }
    fn remove_blip(&mut self, id: BlipId) {
        assert!(self.blips.remove(&id).is_some(), "removed unknown blip");
    }
    fn set_threat_display(&mut self, display: ThreatDisplay) {
        self.threat.push(display);
    }
    fn set_uptime(&mut self, uptime: &str) {
        self.uptime.push(uptime.to_string());
    }
    fn set_detection_count(&mut self, count: u64) {
        self.count = Some(count);
    }
    fn set_gps_readout(&mut self, gps: &GpsReadout) {
        self.gps = Some(gps.clone());
    }
}

fn t0() -> Moment {
    Moment {
        mono: std::time::Instant::now(),
        wall: Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

fn dash(at: &Moment) -> Dashboard<StdRng> {
    Dashboard::new(StdRng::seed_from_u64(42), at)
}

fn det(mac: &str, rssi: i32, score: f64) -> DetectionEvent {
    DetectionEvent {
        protocol: "BLE".into(),
        mac: mac.into(),
        name: None,
        rssi: Some(rssi),
        threat_score: score,
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn feed_keeps_the_fifty_most_recent_newest_first() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    for i in 0..120u64 {
        let at = start.after(ms(i * 10));
        d.apply(
            ChannelEvent::NewDetection(det(&format!("mac-{i}"), -60, 10.0)),
            &at,
            &mut r,
        );
        assert_eq!(d.feed().head().map(|e| e.mac.clone()), Some(format!("mac-{i}")));
    }
    assert_eq!(d.feed().len(), FEED_CAPACITY);
    let macs: Vec<String> = d.feed().entries().map(|e| e.mac.clone()).collect();
    let expected: Vec<String> = (70..120).rev().map(|i| format!("mac-{i}")).collect();
    assert_eq!(macs, expected);
    // the surface saw exactly the same list
    assert_eq!(r.feed.iter().map(|e| e.mac.clone()).collect::<Vec<_>>(), expected);
}

#[test]
fn feed_entry_uses_arrival_clock_and_placeholder_name() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.apply(
        ChannelEvent::NewDetection(det("aa", -200, 91.0)),
        &start.after(ms(3_723_000)),
        &mut r,
    );
    let e = d.feed().head().unwrap();
    assert_eq!(e.clock_label(), "13:02:03");
    assert_eq!(e.display_name(), "UNKNOWN");
    // raw value kept for display, clamping is radar-only
    assert_eq!(e.rssi, Some(-200));
    assert!(e.critical);
}

#[test]
fn threat_level_is_running_max_within_decay_window() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    let scores = [20.0, 70.0, 35.0, 92.0, 10.0];
    let mut max = 0.0_f64;
    for (i, s) in scores.iter().enumerate() {
        let at = start.after(ms(i as u64 * 4_000));
        d.fire_due(at.mono, &mut r);
        d.apply(ChannelEvent::NewDetection(det("x", -50, *s)), &at, &mut r);
        max = max.max(*s);
        assert_eq!(r.last_threat().level, max);
        assert_eq!(d.pending_decays(), 1);
    }
    assert_eq!(r.labels(), ["LOW", "ELEVATED", "ELEVATED", "CRITICAL", "CRITICAL"]);
}

#[test]
fn steady_stream_postpones_decay() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.apply(ChannelEvent::NewDetection(det("a", -50, 80.0)), &start, &mut r);
    let later = start.after(ms(4_000));
    d.apply(ChannelEvent::NewDetection(det("b", -50, 5.0)), &later, &mut r);

    // the first deadline was replaced, not stacked
    d.fire_due(start.after(ms(5_000)).mono, &mut r);
    assert_eq!(r.last_threat().tier, ThreatTier::Elevated);
    assert_eq!(d.decay_deadline(), Some(later.mono + ms(5_000)));

    d.fire_due(start.after(ms(9_000)).mono, &mut r);
    let last = r.last_threat();
    assert_eq!(last.level, 0.0);
    assert_eq!(last.tier, ThreatTier::Scanning);
    assert_eq!(d.pending_decays(), 0);
}

#[test]
fn critical_silence_then_low() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.apply(ChannelEvent::NewDetection(det("a", -40, 95.0)), &start, &mut r);
    let quiet = start.after(ms(6_000));
    d.fire_due(quiet.mono, &mut r);
    d.apply(ChannelEvent::NewDetection(det("b", -40, 40.0)), &quiet, &mut r);
    assert_eq!(r.labels(), ["CRITICAL", "SCANNING", "LOW"]);
    assert_eq!(r.last_threat().level, 40.0);
}

#[test]
fn overdue_decay_lands_before_a_late_detection() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.apply(ChannelEvent::NewDetection(det("a", -40, 95.0)), &start, &mut r);
    // the loop never got round to firing the decay
    d.apply(
        ChannelEvent::NewDetection(det("b", -40, 40.0)),
        &start.after(ms(6_000)),
        &mut r,
    );
    assert_eq!(r.labels(), ["CRITICAL", "SCANNING", "LOW"]);
    assert_eq!(d.threat().level, 40.0);
    assert_eq!(d.pending_decays(), 1);
    assert_eq!(d.radar().live_count(), 1);
}

#[test]
fn detection_without_rssi_is_shown_and_counted() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    let ev = DetectionEvent {
        rssi: None,
        ..det("aa", 0, 93.0)
    };
    d.apply(ChannelEvent::NewDetection(ev), &start, &mut r);
    assert_eq!(d.feed().head().map(|e| e.rssi_label()), Some("--dB".to_string()));
    assert_eq!(r.blips.values().next().map(|b| b.radius_pct), Some(0.0));
    assert_eq!(r.last_threat().tier, ThreatTier::Critical);
}

#[test]
fn blips_expire_after_three_seconds_regardless_of_later_detections() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.apply(ChannelEvent::NewDetection(det("a", -30, 95.0)), &start, &mut r);
    d.apply(
        ChannelEvent::NewDetection(det("b", -100, 10.0)),
        &start.after(ms(1_000)),
        &mut r,
    );
    d.apply(
        ChannelEvent::NewDetection(det("c", -65, 60.0)),
        &start.after(ms(1_000)),
        &mut r,
    );
    assert_eq!(d.radar().live_count(), 3);

    let mut radii: Vec<f64> = r.blips.values().map(|b| b.radius_pct).collect();
    radii.sort_by(f64::total_cmp);
    assert_eq!(radii[0], 0.0);
    assert!((radii[1] - 22.5).abs() < 1e-9);
    assert_eq!(radii[2], 45.0);
    let classes: Vec<BlipClass> = r.blips.values().map(|b| b.class).collect();
    assert_eq!(classes, [BlipClass::Critical, BlipClass::Safe, BlipClass::Neutral]);

    d.fire_due(start.after(ms(2_999)).mono, &mut r);
    assert_eq!(d.radar().live_count(), 3);
    d.fire_due(start.after(ms(3_000)).mono, &mut r);
    assert_eq!(d.radar().live_count(), 2);
    assert_eq!(r.blips.len(), 2);
    d.fire_due(start.after(ms(4_000)).mono, &mut r);
    assert_eq!(d.radar().live_count(), 0);
    assert!(r.blips.is_empty());
    assert_eq!(r.blips_shown, 3);
}

#[test]
fn out_of_range_rssi_clamps_on_the_scope() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.apply(ChannelEvent::NewDetection(det("a", -10, 10.0)), &start, &mut r);
    assert_eq!(r.blips.values().next().unwrap().radius_pct, 0.0);
}

#[test]
fn same_seed_places_blips_identically() {
    let start = t0();
    let mut a = dash(&start);
    let mut b = dash(&start);
    let (mut ra, mut rb) = (Recorder::default(), Recorder::default());
    for i in 0..5 {
        let ev = ChannelEvent::NewDetection(det("m", -40 - i * 10, 50.0));
        a.apply(ev.clone(), &start, &mut ra);
        b.apply(ev, &start, &mut rb);
    }
    assert_eq!(ra.blips, rb.blips);
}

#[test]
fn status_snapshot_is_a_pure_overwrite() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    let snap = StatusSnapshot {
        detection_count: 7,
        gps_status: "No Fix".into(),
        start_time: None,
    };
    d.apply(ChannelEvent::StatusUpdate(snap.clone()), &start, &mut r);
    d.apply(ChannelEvent::StatusUpdate(snap), &start, &mut r);
    assert_eq!(d.detection_count(), Some(7));
    assert_eq!(r.count, Some(7));
    assert_eq!(d.gps().text, "No Fix");
    assert_eq!(r.gps.as_ref().map(|g| g.text.as_str()), Some("No Fix"));
}

#[test]
fn gps_fix_sets_text_and_tone_and_status_keeps_tone() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.apply(
        ChannelEvent::GpsUpdate(GpsFix {
            lat: 33.748_96,
            lon: -84.388_04,
            status: Some("Fix".into()),
        }),
        &start,
        &mut r,
    );
    assert_eq!(
        r.gps,
        Some(GpsReadout {
            text: "FIX [33.7490, -84.3880]".into(),
            tone: GpsTone::Fix,
        })
    );
    d.apply(
        ChannelEvent::StatusUpdate(StatusSnapshot {
            detection_count: 1,
            gps_status: "Fix".into(),
            start_time: None,
        }),
        &start,
        &mut r,
    );
    assert_eq!(d.gps().text, "Fix");
    assert_eq!(d.gps().tone, GpsTone::Fix);
}

#[test]
fn uptime_follows_the_epoch_on_the_next_tick() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.tick_uptime(&start.after(ms(65_000)), &mut r);
    assert_eq!(r.uptime.last().unwrap(), "00:01:05");

    let server_start = start.wall.timestamp() as f64 - 90_000.0;
    d.apply(
        ChannelEvent::StatusUpdate(StatusSnapshot {
            detection_count: 0,
            gps_status: "Waiting...".into(),
            start_time: Some(server_start),
        }),
        &start,
        &mut r,
    );
    d.tick_uptime(&start.after(ms(1_000)), &mut r);
    assert_eq!(r.uptime.last().unwrap(), "25:00:01");
}

#[test]
fn zero_start_time_keeps_the_local_epoch() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.apply(
        ChannelEvent::StatusUpdate(StatusSnapshot {
            detection_count: 0,
            gps_status: "Waiting...".into(),
            start_time: Some(0.0),
        }),
        &start,
        &mut r,
    );
    d.tick_uptime(&start.after(ms(5_000)), &mut r);
    assert_eq!(r.uptime.last().unwrap(), "00:00:05");
}

#[test]
fn connect_and_loss_only_touch_link_state() {
    let start = t0();
    let mut d = dash(&start);
    let mut r = Recorder::default();
    d.prime(&start, &mut r);
    assert_eq!(r.link, Some(LinkState::Connecting));
    assert_eq!(r.labels(), ["SCANNING"]);
    assert_eq!(r.uptime, ["00:00:00"]);

    d.apply(ChannelEvent::Connect, &start, &mut r);
    assert_eq!(r.link, Some(LinkState::Live));
    d.link_lost(&mut r);
    assert_eq!(r.link, Some(LinkState::Lost));
    assert!(d.feed().is_empty());
    assert_eq!(r.labels(), ["SCANNING"]);
}

#[test]
fn terminal_panels_mirror_the_dashboard() {
    let start = t0();
    let mut d = dash(&start);
    let mut p = Panels::new();
    for i in 0..60u64 {
        d.apply(
            ChannelEvent::NewDetection(det(&format!("m{i}"), -50, 95.0)),
            &start.after(ms(i)),
            &mut p,
        );
    }
    assert_eq!(p.feed.len(), FEED_CAPACITY);
    assert_eq!(p.feed.front().map(|e| e.mac.as_str()), Some("m59"));
    assert_eq!(p.blips.len(), 60);
    assert_eq!(p.threat.tier, ThreatTier::Critical);

    d.fire_due(start.after(ms(10_000)).mono, &mut p);
    assert!(p.blips.is_empty());
    assert_eq!(p.threat.tier, ThreatTier::Scanning);
    assert_eq!(p.feed.len(), FEED_CAPACITY);
}
