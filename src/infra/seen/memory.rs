//! In-memory already-seen filter.

use std::collections::HashSet;

use parking_lot::Mutex;

use super::SeenFilter;
use crate::core::item::WorkItem;

/// Hash-set filter for development and small crawls. Nothing is ever
/// pending: every addition is immediately durable in memory.
pub struct InMemorySeenFilter {
    seen: Mutex<HashSet<String>>,
}

impl InMemorySeenFilter {
    /// Create an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
        }
    }
}

impl Default for InMemorySeenFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SeenFilter for InMemorySeenFilter {
    fn add(&self, key: &str, _item: &WorkItem) -> bool {
        self.seen.lock().insert(key.to_string())
    }

    fn note(&self, key: &str) {
        self.seen.lock().insert(key.to_string());
    }

    fn forget(&self, key: &str, _item: &WorkItem) {
        self.seen.lock().remove(key);
    }

    fn pending(&self) -> usize {
        0
    }

    fn count(&self) -> u64 {
        self.seen.lock().len() as u64
    }

    fn request_flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_note_forget() {
        let filter = InMemorySeenFilter::new();
        let item = WorkItem::new(1, "https://example.com/a");
        assert!(filter.add("https://example.com/a", &item));
        assert!(!filter.add("https://example.com/a", &item));
        assert_eq!(filter.count(), 1);

        filter.forget("https://example.com/a", &item);
        assert!(filter.add("https://example.com/a", &item));

        filter.note("https://example.com/b");
        assert_eq!(filter.count(), 2);
        assert_eq!(filter.pending(), 0);
    }
}
