//! Cancelable one-shot timers
//!
//! The host advances the queue with wall-clock milliseconds once per frame;
//! every timer whose due time has passed is handed back in due order.
//! Cancelling a timer removes it outright, so a cancelled timer can never fire.

use std::fmt;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct PendingTimer<E> {
    id: TimerId,
    due_ms: f64,
    event: E,
}

/// Schedule-once-after-delay timer service
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    pending: Vec<PendingTimer<E>>,
    now_ms: f64,
    next_id: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            now_ms: 0.0,
            next_id: 1,
        }
    }

    /// Current time as last seen by [`TimerQueue::advance_to`]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Schedule `event` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: f64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            due_ms: self.now_ms + delay_ms.max(0.0),
            event,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancel every outstanding timer, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward. Time never runs backwards.
    pub fn advance_to(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    /// Remove and return the earliest timer that is due, if any.
    ///
    /// Ties on due time fire in scheduling order. Callers loop on this so
    /// timers scheduled by a handler with zero delay still fire this frame.
    pub fn pop_due(&mut self) -> Option<(TimerId, E)> {
        let now = self.now_ms;
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.id.cmp(&b.id))
            })
            .map(|(i, _)| i)?;
        let timer = self.pending.swap_remove(idx);
        Some((timer.id, timer.event))
    }
}
