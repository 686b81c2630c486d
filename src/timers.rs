//! Deadline queue for deferred selector work.
//!
//! Deadlines fire in order; entries with the same deadline fire in the order
//! they were scheduled.

use std::collections::BTreeMap;

use tokio::time::Instant;

/// Work deferred until a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Resync the widget and leave the transition state.
    TransitionEnd,
    /// Start hiding the notice with this id.
    NoticeHide(u64),
    /// Drop the notice with this id.
    NoticeRemove(u64),
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: BTreeMap<(Instant, u64), TimerKind>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Instant, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((at, seq), kind);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.keys().next().map(|(at, _)| *at)
    }

    /// Remove and return the earliest entry due at `now`, with its deadline.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, TimerKind)> {
        let (&(at, _), _) = self.entries.first_key_value()?;
        if at > now {
            return None;
        }
        self.entries.pop_first().map(|((at, _), kind)| (at, kind))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
