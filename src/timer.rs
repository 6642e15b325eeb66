//! Named one-shot deadlines.
//!
//! Each timer is identified by its [`TimerKind`]; arming an already-pending
//! kind is a no-op, so at most one deadline per kind exists. Expiry is
//! detected by polling with a monotonic instant and surfaces as an event on
//! the session dispatcher.

use embassy_time::Instant;
use heapless::FnvIndexMap;

use crate::types::TimerKind;

const TIMER_SLOTS: usize = 8;

pub(crate) struct TimerSet {
    deadlines: FnvIndexMap<TimerKind, Instant, TIMER_SLOTS>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self {
            deadlines: FnvIndexMap::new(),
        }
    }

    /// Arm `kind` to fire at `deadline`. Returns `false` (and leaves the
    /// existing deadline untouched) when the kind is already pending.
    pub fn arm(&mut self, kind: TimerKind, deadline: Instant) -> bool {
        if self.deadlines.contains_key(&kind) {
            return false;
        }
        // The map has a slot for every kind, so insertion cannot fail.
        self.deadlines.insert(kind, deadline).ok();
        true
    }

    /// Cancel `kind`. Returns whether it was pending.
    pub fn disarm(&mut self, kind: TimerKind) -> bool {
        self.deadlines.remove(&kind).is_some()
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.deadlines.contains_key(&kind)
    }

    /// Remove and return the expired timer with the earliest deadline, if
    /// any. Repeated calls drain all expiries due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<TimerKind> {
        let due = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .min_by_key(|(_, deadline)| **deadline)
            .map(|(kind, _)| *kind)?;
        self.deadlines.remove(&due);
        Some(due)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_time::Duration;

    #[test]
    fn arm_is_noop_when_pending() {
        let mut timers = TimerSet::new();
        let t0 = Instant::from_millis(0);
        assert!(timers.arm(TimerKind::Listening, t0 + Duration::from_millis(100)));
        assert!(!timers.arm(TimerKind::Listening, t0 + Duration::from_millis(500)));

        // The original deadline stands.
        assert_eq!(
            timers.take_due(t0 + Duration::from_millis(100)),
            Some(TimerKind::Listening)
        );
    }

    #[test]
    fn disarm_prevents_expiry() {
        let mut timers = TimerSet::new();
        let t0 = Instant::from_millis(0);
        timers.arm(TimerKind::NbIotInactivity, t0 + Duration::from_millis(10));
        assert!(timers.disarm(TimerKind::NbIotInactivity));
        assert_eq!(timers.take_due(t0 + Duration::from_secs(60)), None);
        assert!(!timers.disarm(TimerKind::NbIotInactivity));
    }

    #[test]
    fn due_timers_drain_earliest_first() {
        let mut timers = TimerSet::new();
        let t0 = Instant::from_millis(0);
        timers.arm(TimerKind::NbIotInactivity, t0 + Duration::from_millis(200));
        timers.arm(TimerKind::Listening, t0 + Duration::from_millis(100));
        timers.arm(TimerKind::GatewayRebind, t0 + Duration::from_secs(2));

        let now = t0 + Duration::from_millis(300);
        assert_eq!(timers.take_due(now), Some(TimerKind::Listening));
        assert_eq!(timers.take_due(now), Some(TimerKind::NbIotInactivity));
        assert_eq!(timers.take_due(now), None);
        assert!(timers.is_armed(TimerKind::GatewayRebind));
    }
}
