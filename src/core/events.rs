//! Outbound notification hooks.
//!
//! The frontier reports lifecycle milestones to an optional sink as
//! fire-and-forget events. Sinks must never block for long; the frontier
//! records events while holding only the sink's own lock.

use std::collections::VecDeque;

use crate::util::clock::now_ms;

/// Milestone reported to an event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    /// An item was handed to a worker.
    Dispatched,
    /// A recoverable failure was rescheduled for retry.
    RetryRescheduled,
    /// An item finished successfully.
    Succeeded,
    /// An item failed terminally.
    Failed,
    /// An item was disregarded.
    Disregarded,
}

/// Event structure delivered to sinks.
#[derive(Debug, Clone)]
pub struct FrontierEvent {
    /// Class key of the queue involved.
    pub class_key: String,
    /// Identifying payload of the item involved.
    pub target: String,
    /// What happened.
    pub action: EventAction,
    /// Timestamp milliseconds.
    pub at_ms: u64,
}

/// Event sink abstraction.
pub trait EventSink: Send {
    /// Record one event.
    fn record(&mut self, event: FrontierEvent);
}

/// In-memory event sink with a bounded buffer, for testing and dev.
pub struct InMemoryEventSink {
    events: VecDeque<FrontierEvent>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<FrontierEvent> {
        self.events.iter().cloned().collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, event: FrontierEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Helper to build an event from context.
#[must_use]
pub fn build_event(
    class_key: impl Into<String>,
    target: impl Into<String>,
    action: EventAction,
) -> FrontierEvent {
    FrontierEvent {
        class_key: class_key.into(),
        target: target.into(),
        action,
        at_ms: now_ms(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_buffer_drops_oldest() {
        let mut sink = InMemoryEventSink::new(2);
        sink.record(build_event("a", "t1", EventAction::Dispatched));
        sink.record(build_event("b", "t2", EventAction::Succeeded));
        sink.record(build_event("c", "t3", EventAction::Failed));
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].class_key, "b");
        assert_eq!(events[1].action, EventAction::Failed);
    }
}
