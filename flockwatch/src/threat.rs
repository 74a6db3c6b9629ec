//! Threat gauge: running maximum of detection scores that drops back to idle
//! after a quiet period.

use std::time::{Duration, Instant};

use crate::dashboard::DashTimer;
use crate::timer::{TimerHandle, TimerQueue};

/// Quiet period after the last detection before the gauge resets.
pub const DECAY_AFTER: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatTier {
    Scanning,
    Low,
    Elevated,
    Critical,
}

impl ThreatTier {
    /// `Scanning` is the idle state: nothing recorded since start or last decay.
    pub fn classify(level: f64, decay_pending: bool) -> Self {
        if level >= 90.0 {
            Self::Critical
        } else if level >= 50.0 {
            Self::Elevated
        } else if !decay_pending && level == 0.0 {
            Self::Scanning
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Scanning => "SCANNING",
            Self::Low => "LOW",
            Self::Elevated => "ELEVATED",
            Self::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatDisplay {
    /// Gauge fill in percent. Not clamped; upstream owns the 0..=100 contract.
    pub level: f64,
    pub tier: ThreatTier,
}

#[derive(Debug, Default)]
pub struct ThreatAggregator {
    current_max: f64,
    decay: Option<TimerHandle>,
}

impl ThreatAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a score into the running max and push the decay deadline out.
    /// Every detection re-arms the decay, whether or not it raised the max.
    pub fn record(
        &mut self,
        score: f64,
        now: Instant,
        timers: &mut TimerQueue<DashTimer>,
    ) -> ThreatDisplay {
        // f64::max drops NaN, so a NaN score leaves the max untouched
        self.current_max = self.current_max.max(score);
        if let Some(prev) = self.decay.take() {
            timers.cancel(prev);
        }
        self.decay = Some(timers.schedule_after(now, DECAY_AFTER, DashTimer::ThreatDecay));
        self.display()
    }

    /// Called when a decay timer fires. Handles other than the armed one are stale.
    pub fn decay(&mut self, fired: TimerHandle) -> Option<ThreatDisplay> {
        if self.decay != Some(fired) {
            return None;
        }
        self.decay = None;
        self.current_max = 0.0;
        Some(self.display())
    }

    pub fn display(&self) -> ThreatDisplay {
        ThreatDisplay {
            level: self.current_max,
            tier: ThreatTier::classify(self.current_max, self.decay.is_some()),
        }
    }

    pub fn current_max(&self) -> f64 {
        self.current_max
    }

    pub fn decay_deadline(&self) -> Option<Instant> {
        self.decay.map(|h| h.deadline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_favour_the_upper_tier() {
        assert_eq!(ThreatTier::classify(90.0, true), ThreatTier::Critical);
        assert_eq!(ThreatTier::classify(89.9, true), ThreatTier::Elevated);
        assert_eq!(ThreatTier::classify(50.0, true), ThreatTier::Elevated);
        assert_eq!(ThreatTier::classify(49.9, true), ThreatTier::Low);
        assert_eq!(ThreatTier::classify(0.0, true), ThreatTier::Low);
        assert_eq!(ThreatTier::classify(0.0, false), ThreatTier::Scanning);
    }

    #[test]
    fn running_max_and_single_outstanding_decay() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        let mut agg = ThreatAggregator::new();
        assert_eq!(agg.display().tier, ThreatTier::Scanning);

        assert_eq!(agg.record(60.0, t0, &mut timers).level, 60.0);
        let d = agg.record(20.0, t0 + Duration::from_millis(1000), &mut timers);
        assert_eq!(d.level, 60.0);
        assert_eq!(d.tier, ThreatTier::Elevated);
        assert_eq!(timers.len(), 1);
        assert_eq!(
            agg.decay_deadline(),
            Some(t0 + Duration::from_millis(6000))
        );
    }

    #[test]
    fn decay_resets_and_ignores_stale_handles() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        let mut agg = ThreatAggregator::new();
        agg.record(95.0, t0, &mut timers);

        let stale = timers.schedule(t0, DashTimer::ThreatDecay);
        assert!(agg.decay(stale).is_none());
        assert_eq!(agg.current_max(), 95.0);

        let (h, _) = timers.pop_due(t0 + DECAY_AFTER).unwrap();
        // the stray handle was scheduled first at t0
        assert_eq!(h, stale);
        let (h, _) = timers.pop_due(t0 + DECAY_AFTER).unwrap();
        let d = agg.decay(h).unwrap();
        assert_eq!(d.level, 0.0);
        assert_eq!(d.tier, ThreatTier::Scanning);
        assert!(agg.decay_deadline().is_none());
    }

    #[test]
    fn out_of_range_scores_pass_through() {
        let mut timers = TimerQueue::new();
        let mut agg = ThreatAggregator::new();
        let d = agg.record(140.0, Instant::now(), &mut timers);
        assert_eq!(d.level, 140.0);
        assert_eq!(d.tier, ThreatTier::Critical);
    }
}
