//! Deferred reactivation of snoozed queues.
//!
//! The snooze board is a total-ordered set of `(wake_time, class_key)`
//! entries. One lock guards both the board and the wake signalling state,
//! since promotion and (re)scheduling must be atomic with respect to each
//! other. A single dedicated waker thread sleeps until the earliest
//! outstanding wake; inserting an earlier entry signals the condvar, which
//! is the cancel-and-reschedule of a one-shot timer without ever owning more
//! than one pending callback.

use std::collections::BTreeSet;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::util::clock::now_ms;

/// Board entry; the derived ordering is ascending wake time, tie-broken by
/// class key so distinct queues sharing a wake time stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SnoozeEntry {
    wake_time_ms: u64,
    class_key: String,
}

struct WakeBoard {
    entries: BTreeSet<SnoozeEntry>,
    shutdown: bool,
}

/// Outcome of one waker-thread wait.
#[derive(Debug)]
pub enum WakeOutcome {
    /// Class keys whose wake time has arrived, in wake order.
    Due(Vec<String>),
    /// Shutdown was signaled; the waker thread should exit.
    Shutdown,
}

/// Sorted snooze board plus the signalling state for the single waker.
pub struct WakeScheduler {
    board: Mutex<WakeBoard>,
    condvar: Condvar,
}

impl WakeScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Mutex::new(WakeBoard {
                entries: BTreeSet::new(),
                shutdown: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Record a queue's pending wake. If the new entry becomes the earliest
    /// outstanding wake, the waker is signalled to re-arm its sleep.
    pub fn schedule(&self, class_key: &str, wake_time_ms: u64) {
        let mut board = self.board.lock();
        let entry = SnoozeEntry {
            wake_time_ms,
            class_key: class_key.to_string(),
        };
        let new_earliest = board
            .entries
            .first()
            .is_none_or(|first| entry < *first);
        board.entries.insert(entry);
        if new_earliest {
            debug!(class_key, wake_time_ms, "snooze board has new earliest wake");
            self.condvar.notify_one();
        }
    }

    /// Number of snoozed queues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.board.lock().entries.len()
    }

    /// Whether no queue is snoozed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.board.lock().entries.is_empty()
    }

    /// Signal the waker thread to exit.
    pub fn shutdown(&self) {
        let mut board = self.board.lock();
        board.shutdown = true;
        drop(board);
        self.condvar.notify_all();
    }

    /// Block until at least one wake is due or shutdown is signaled.
    ///
    /// With an empty board the wait is bounded by `idle_wait` and re-loops,
    /// so a shutdown signal is never missed. Due entries are removed from
    /// the board before this returns; the caller re-admits them without
    /// holding the board lock.
    pub fn wait_due(&self, idle_wait: Duration) -> WakeOutcome {
        let mut board = self.board.lock();
        loop {
            if board.shutdown {
                return WakeOutcome::Shutdown;
            }
            let now = now_ms();
            let mut due = Vec::new();
            while let Some(first) = board.entries.first() {
                if first.wake_time_ms > now {
                    break;
                }
                if let Some(entry) = board.entries.pop_first() {
                    due.push(entry.class_key);
                }
            }
            if !due.is_empty() {
                debug!(count = due.len(), "waking snoozed queues");
                return WakeOutcome::Due(due);
            }
            let wait = board
                .entries
                .first()
                .map_or(idle_wait, |first| {
                    Duration::from_millis(first.wake_time_ms.saturating_sub(now))
                });
            self.condvar.wait_for(&mut board, wait);
        }
    }
}

impl Default for WakeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_entries_pop_in_wake_order() {
        let scheduler = WakeScheduler::new();
        let now = now_ms();
        scheduler.schedule("late", now + 60_000);
        scheduler.schedule("b", now.saturating_sub(10));
        scheduler.schedule("a", now.saturating_sub(10));
        assert_eq!(scheduler.len(), 3);

        match scheduler.wait_due(Duration::from_millis(10)) {
            WakeOutcome::Due(keys) => assert_eq!(keys, vec!["a", "b"]),
            WakeOutcome::Shutdown => panic!("unexpected shutdown"),
        }
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_shutdown_unblocks_wait() {
        let scheduler = std::sync::Arc::new(WakeScheduler::new());
        let waiter = std::sync::Arc::clone(&scheduler);
        let handle = std::thread::spawn(move || waiter.wait_due(Duration::from_secs(30)));
        scheduler.shutdown();
        assert!(matches!(handle.join().unwrap(), WakeOutcome::Shutdown));
    }

    #[test]
    fn test_shared_wake_time_keeps_both_queues() {
        let scheduler = WakeScheduler::new();
        let at = now_ms().saturating_sub(1);
        scheduler.schedule("one", at);
        scheduler.schedule("two", at);
        match scheduler.wait_due(Duration::from_millis(10)) {
            WakeOutcome::Due(keys) => assert_eq!(keys.len(), 2),
            WakeOutcome::Shutdown => panic!("unexpected shutdown"),
        }
    }
}
