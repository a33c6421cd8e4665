//! Already-seen filter backends.
//!
//! The filter prevents re-scheduling of previously seen items. Deduplication
//! itself (canonicalization, persistence, batched flushes) is an external
//! concern; the frontier only consults this boundary.

pub mod memory;

use crate::core::item::WorkItem;

/// Record of already-seen work, keyed by a caller-canonicalized string.
pub trait SeenFilter: Send + Sync {
    /// Register a key. Returns `true` if it was new (the item should be
    /// admitted), `false` if already seen.
    fn add(&self, key: &str, item: &WorkItem) -> bool;

    /// Note a key as seen without admitting any item.
    fn note(&self, key: &str);

    /// Forget a key so a future instance may be admitted again.
    fn forget(&self, key: &str, item: &WorkItem);

    /// Number of additions not yet durably recorded.
    fn pending(&self) -> usize;

    /// Total distinct keys seen.
    fn count(&self) -> u64;

    /// Ask the filter to flush batched additions. Advisory; may be a no-op.
    fn request_flush(&self);
}

pub use memory::InMemorySeenFilter;
