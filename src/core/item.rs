//! Work items and their completion dispositions.

use serde::{Deserialize, Serialize};

/// Unique item identifier assigned by the producer.
pub type ItemId = u64;

/// A unit of work: one pending fetch target.
///
/// An item is held by exactly one [`crate::core::WorkQueue`] while queued and
/// exclusively by one worker while dispatched. The `class_key` groups items
/// into per-origin queues; the cached cost is assigned once by the active
/// cost policy and charged against the queue's budgets when the item is
/// processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Producer-assigned identifier.
    pub id: ItemId,
    /// Identifying payload, e.g. the target URI.
    pub target: String,
    /// Origin identity used to pick this item's queue.
    pub class_key: String,
    /// Cost cached after first assignment by the cost policy.
    cost: Option<u32>,
    /// Class key of the queue currently holding this item, set on enqueue.
    pub(crate) holder_key: Option<String>,
    /// Number of processing attempts so far.
    pub attempts: u32,
    /// Historical/size signal consumed by the weighted cost policy.
    pub weight_hint: u32,
    /// Directive: retire this item's entire queue on completion.
    pub force_retire: bool,
}

impl WorkItem {
    /// Create an item whose class key is derived from the target's host part
    /// (everything between `://` and the next `/`, or the whole target).
    #[must_use]
    pub fn new(id: ItemId, target: impl Into<String>) -> Self {
        let target = target.into();
        let class_key = host_of(&target);
        Self::with_class_key(id, target, class_key)
    }

    /// Create an item with an explicit class key.
    #[must_use]
    pub fn with_class_key(
        id: ItemId,
        target: impl Into<String>,
        class_key: impl Into<String>,
    ) -> Self {
        Self {
            id,
            target: target.into(),
            class_key: class_key.into(),
            cost: None,
            holder_key: None,
            attempts: 0,
            weight_hint: 1,
            force_retire: false,
        }
    }

    /// Set the weight signal consumed by the weighted cost policy.
    #[must_use]
    pub const fn with_weight_hint(mut self, weight: u32) -> Self {
        self.weight_hint = weight;
        self
    }

    /// Mark this item as a retire directive for its queue.
    #[must_use]
    pub const fn with_force_retire(mut self) -> Self {
        self.force_retire = true;
        self
    }

    /// Cached cost, if one has been assigned.
    #[must_use]
    pub const fn cached_cost(&self) -> Option<u32> {
        self.cost
    }

    /// Cache an assigned cost. Later assignments are ignored; the first
    /// assignment sticks for the item's lifetime.
    pub fn cache_cost(&mut self, cost: u32) {
        if self.cost.is_none() {
            self.cost = Some(cost);
        }
    }

    /// Record one processing attempt.
    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }
}

/// Extract the host portion of a `scheme://host/...` target. Targets without
/// a scheme separator classify as themselves.
#[must_use]
pub(crate) fn host_of(target: &str) -> String {
    let rest = target.split_once("://").map_or(target, |(_, rest)| rest);
    rest.split('/').next().unwrap_or(rest).to_string()
}

/// Outcome of processing a dispatched item, reported via
/// [`crate::core::Frontier::finished`].
///
/// Retry and politeness delays are computed by the caller from fetch
/// semantics; the frontier only routes queues based on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// The item was processed successfully and is permanently dequeued.
    Success {
        /// Mandatory wait before the origin may offer another item.
        politeness_delay_ms: u64,
    },
    /// The item failed permanently; it is dequeued and the queue is charged
    /// an extra error penalty.
    TerminalFailure {
        /// Mandatory wait before the origin may offer another item.
        politeness_delay_ms: u64,
    },
    /// The item is dropped without penalty or success credit.
    Disregard {
        /// Mandatory wait before the origin may offer another item.
        politeness_delay_ms: u64,
    },
    /// Recoverable failure: the item stays at the head of its queue and will
    /// be retried after the given delay.
    NeedsRetry {
        /// Delay before the queue re-enters rotation; 0 re-admits at once.
        retry_delay_ms: u64,
    },
    /// Explicit directive: retire the queue and discard its remaining work.
    ForceRetire,
}

impl Disposition {
    /// The politeness delay carried by terminal outcomes, 0 otherwise.
    #[must_use]
    pub const fn politeness_delay_ms(&self) -> u64 {
        match self {
            Self::Success { politeness_delay_ms }
            | Self::TerminalFailure { politeness_delay_ms }
            | Self::Disregard { politeness_delay_ms } => *politeness_delay_ms,
            Self::NeedsRetry { .. } | Self::ForceRetire => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_classification() {
        let item = WorkItem::new(1, "https://example.com/page/1");
        assert_eq!(item.class_key, "example.com");

        let bare = WorkItem::new(2, "example.org");
        assert_eq!(bare.class_key, "example.org");
    }

    #[test]
    fn test_cost_caches_once() {
        let mut item = WorkItem::new(1, "https://example.com/");
        assert_eq!(item.cached_cost(), None);
        item.cache_cost(3);
        item.cache_cost(7);
        assert_eq!(item.cached_cost(), Some(3));
    }

    #[test]
    fn test_politeness_delay_accessor() {
        let d = Disposition::Success {
            politeness_delay_ms: 250,
        };
        assert_eq!(d.politeness_delay_ms(), 250);
        assert_eq!(Disposition::ForceRetire.politeness_delay_ms(), 0);
    }
}
