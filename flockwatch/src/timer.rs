//! Deadline-ordered timer queue with explicit cancel handles.
//!
//! Nothing here sleeps: the owner asks for `next_deadline()`, waits however it
//! likes, then drains with `pop_due(now)`.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    seq: u64,
    deadline: Instant,
}

impl TimerHandle {
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    // (deadline, seq) keeps equal deadlines in scheduling order
    pending: BTreeMap<(Instant, u64), T>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, deadline: Instant, payload: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert((deadline, seq), payload);
        TimerHandle { seq, deadline }
    }

    pub fn schedule_after(&mut self, now: Instant, delay: Duration, payload: T) -> TimerHandle {
        self.schedule(now + delay, payload)
    }

    /// Returns the payload if the timer had not fired or been cancelled yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        self.pending.remove(&(handle.deadline, handle.seq))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.keys().next().map(|(d, _)| *d)
    }

    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerHandle, T)> {
        let (&(deadline, seq), _) = self.pending.first_key_value()?;
        if deadline > now {
            return None;
        }
        let payload = self.pending.remove(&(deadline, seq))?;
        Some((TimerHandle { seq, deadline }, payload))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.pending.values()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
