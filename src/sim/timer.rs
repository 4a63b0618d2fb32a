//! Simulated-time periodic schedules
//!
//! Stands in for `setInterval`: the host advances simulated milliseconds and
//! the round fires whatever is due. Cancelling is just dropping the `Interval`.

use serde::{Deserialize, Serialize};

/// Simulated milliseconds since the round controller was created
pub type Millis = u64;

/// A repeating schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    period_ms: u32,
    next_due: Millis,
}

impl Interval {
    /// First firing one full period after `now`
    pub fn new(now: Millis, period_ms: u32) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due: now + period_ms as Millis,
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn next_due(&self) -> Millis {
        self.next_due
    }

    /// Due time if it falls at or before `until`
    pub fn due_by(&self, until: Millis) -> Option<Millis> {
        (self.next_due <= until).then_some(self.next_due)
    }

    /// Consume one firing and schedule the next
    pub fn fire(&mut self) -> Millis {
        let fired_at = self.next_due;
        self.next_due += self.period_ms as Millis;
        fired_at
    }
}

/// Stop a schedule; stopping a stopped schedule is a no-op
pub fn cancel(slot: &mut Option<Interval>) -> bool {
    slot.take().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_fires_each_period() {
        let mut interval = Interval::new(100, 250);
        assert_eq!(interval.due_by(349), None);
        assert_eq!(interval.due_by(350), Some(350));
        assert_eq!(interval.fire(), 350);
        assert_eq!(interval.next_due(), 600);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let interval = Interval::new(0, 0);
        assert_eq!(interval.period_ms(), 1);
        assert_eq!(interval.next_due(), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut slot = Some(Interval::new(0, 1000));
        assert!(cancel(&mut slot));
        assert!(!cancel(&mut slot));
        assert!(slot.is_none());
    }
}
