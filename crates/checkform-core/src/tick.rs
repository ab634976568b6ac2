//! Coalesce-to-next-tick scheduling.
//!
//! A [`TickQueue`] holds at most one pending payload. Scheduling a new payload
//! cancels the one already waiting, so bursts of rapid updates collapse into a
//! single unit of work: latest write wins, earlier pending work is discarded,
//! never queued. The host event loop drains the queue with
//! [`TickQueue::take_due`] once the current handler has returned.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::targets;

/// A unique identifier for a scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(u64);

impl TickId {
    /// Get the raw u64 value of this tick ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TICK_ID: AtomicU64 = AtomicU64::new(1);

fn next_tick_id() -> TickId {
    TickId(NEXT_TICK_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug)]
struct PendingTick<T> {
    id: TickId,
    payload: T,
}

/// A single-slot deferred work queue.
#[derive(Debug)]
pub struct TickQueue<T> {
    pending: Option<PendingTick<T>>,
    superseded: u64,
}

impl<T> TickQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: None,
            superseded: 0,
        }
    }

    /// Schedule `payload` for the next tick, cancelling any pending payload.
    ///
    /// Returns the handle of the newly scheduled tick.
    pub fn schedule(&mut self, payload: T) -> TickId {
        let id = next_tick_id();
        if let Some(previous) = self.pending.replace(PendingTick { id, payload }) {
            self.superseded += 1;
            tracing::trace!(
                target: targets::TICK,
                superseded = previous.id.as_u64(),
                by = id.as_u64(),
                "pending tick superseded"
            );
        }
        id
    }

    /// Cancel the pending tick if its handle is `id`.
    ///
    /// Returns `true` if the tick was pending and has been cleared.
    pub fn cancel(&mut self, id: TickId) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.id == id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Clear whatever is pending.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// The handle of the pending tick, if any.
    pub fn pending_id(&self) -> Option<TickId> {
        self.pending.as_ref().map(|p| p.id)
    }

    /// Check whether a tick is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending payload, leaving the queue empty.
    pub fn take_due(&mut self) -> Option<T> {
        self.pending.take().map(|p| {
            tracing::trace!(target: targets::TICK, id = p.id.as_u64(), "tick due");
            p.payload
        })
    }

    /// Number of ticks discarded because a newer one replaced them.
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }
}

impl<T> Default for TickQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_write_wins() {
        let mut queue = TickQueue::new();
        queue.schedule("a");
        queue.schedule("b");
        queue.schedule("c");

        assert_eq!(queue.superseded_count(), 2);
        assert_eq!(queue.take_due(), Some("c"));
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_cancel_only_matching_handle() {
        let mut queue = TickQueue::new();
        let first = queue.schedule(1);
        let second = queue.schedule(2);

        assert!(!queue.cancel(first));
        assert_eq!(queue.pending_id(), Some(second));
        assert!(queue.cancel(second));
        assert_eq!(queue.take_due(), None);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut queue = TickQueue::new();
        let a = queue.schedule(());
        let b = queue.schedule(());
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }
}
