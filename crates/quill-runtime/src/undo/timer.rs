#![forbid(unsafe_code)]

//! Debounce deadline for in-progress batches.
//!
//! The runtime is single-threaded and owns no background thread, so the
//! batch timeout is modelled as a deadline rather than a scheduled callback.
//! Arming replaces any earlier deadline; the owning manager delivers an
//! expired deadline from `tick()` or at the start of its next mutating
//! operation, which is observably the same as a callback that fired on time.

use std::time::Duration;

use tracing::trace;

/// A single cancellable deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchTimer {
    deadline: Option<Duration>,
}

impl BatchTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) to expire `timeout` after `now`.
    pub fn arm(&mut self, now: Duration, timeout: Duration) {
        let deadline = now.saturating_add(timeout);
        trace!(?deadline, rearmed = self.deadline.is_some(), "batch timer armed");
        self.deadline = Some(deadline);
    }

    /// Disarm. A no-op when nothing is pending.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            trace!("batch timer cancelled");
        }
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if armed.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whether an armed deadline has been reached at `now`.
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn unarmed_timer_is_never_due() {
        let timer = BatchTimer::new();
        assert!(!timer.is_armed());
        assert!(!timer.is_due(Duration::MAX));
    }

    #[test]
    fn due_at_and_after_deadline() {
        let mut timer = BatchTimer::new();
        timer.arm(ms(100), ms(700));
        assert_eq!(timer.deadline(), Some(ms(800)));
        assert!(!timer.is_due(ms(799)));
        assert!(timer.is_due(ms(800)));
        assert!(timer.is_due(ms(5000)));
    }

    #[test]
    fn rearm_replaces_previous_deadline() {
        let mut timer = BatchTimer::new();
        timer.arm(ms(0), ms(700));
        timer.arm(ms(500), ms(700));
        assert!(!timer.is_due(ms(900)));
        assert!(timer.is_due(ms(1200)));
    }

    #[test]
    fn cancel_disarms() {
        let mut timer = BatchTimer::new();
        timer.arm(ms(0), ms(10));
        timer.cancel();
        assert!(!timer.is_armed());
        assert!(!timer.is_due(ms(100)));
        timer.cancel();
    }
}
