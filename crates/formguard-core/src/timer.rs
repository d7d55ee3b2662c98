//! Debounce timers on a virtual clock.
//!
//! The host owns real time. It reports elapsed time through
//! [`TimerQueue::advance`], which hands back the fields whose delayed
//! validation is now due.

use crate::field::FieldId;
use std::time::Duration;

/// From this interval on, a keystroke clears the field's message right away
/// instead of leaving a stale one up until the delayed validation runs.
pub const CLEAR_EARLY_THRESHOLD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy)]
struct Timer {
    field: FieldId,
    due: Duration,
    seq: u64,
}

/// Pending delayed validations, at most one per field.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    seq: u64,
    pending: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `field` to validate after `wait`, replacing any pending timer.
    ///
    /// Returns `true` if a pending timer was cancelled.
    pub fn schedule(&mut self, field: FieldId, wait: Duration) -> bool {
        let cancelled = self.cancel(field);
        self.seq += 1;
        self.pending.push(Timer {
            field,
            due: self.now + wait,
            seq: self.seq,
        });
        cancelled
    }

    /// Drop the pending timer for `field`, if any.
    pub fn cancel(&mut self, field: FieldId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.field != field);
        before != self.pending.len()
    }

    pub fn is_pending(&self, field: FieldId) -> bool {
        self.pending.iter().any(|timer| timer.field == field)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward and take every timer that came due, in firing order.
    pub fn advance(&mut self, by: Duration) -> Vec<FieldId> {
        self.now += by;
        let now = self.now;
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            self.pending.drain(..).partition(|timer| timer.due <= now);
        self.pending = pending;
        due.sort_by_key(|timer| (timer.due, timer.seq));
        due.into_iter().map(|timer| timer.field).collect()
    }
}
