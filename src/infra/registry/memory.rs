//! In-memory queue registry for crawls that fit in memory.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::{QueueRegistry, SharedQueue};
use crate::core::work_queue::WorkQueue;

/// Registry backed by a read-heavy map. Lookups take a read lock; only the
/// first reference to a class key takes the write lock.
pub struct InMemoryRegistry {
    queues: RwLock<HashMap<String, SharedQueue>>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueRegistry for InMemoryRegistry {
    fn get(&self, class_key: &str) -> Option<SharedQueue> {
        self.queues.read().get(class_key).cloned()
    }

    fn get_or_create(&self, class_key: &str) -> SharedQueue {
        if let Some(queue) = self.queues.read().get(class_key) {
            return Arc::clone(queue);
        }
        let mut queues = self.queues.write();
        Arc::clone(
            queues
                .entry(class_key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(WorkQueue::new(class_key)))),
        )
    }

    fn for_each(&self, visit: &mut dyn FnMut(&str, &SharedQueue)) {
        for (key, queue) in self.queues.read().iter() {
            visit(key, queue);
        }
    }

    fn len(&self) -> usize {
        self.queues.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let registry = InMemoryRegistry::new();
        let a = registry.get_or_create("example.com");
        let b = registry.get_or_create("example.com");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown_key() {
        let registry = InMemoryRegistry::new();
        assert!(registry.get("nowhere").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_for_each_visits_all() {
        let registry = InMemoryRegistry::new();
        registry.get_or_create("a");
        registry.get_or_create("b");
        let mut seen = Vec::new();
        registry.for_each(&mut |key, _| seen.push(key.to_string()));
        seen.sort();
        assert_eq!(seen, vec!["a", "b"]);
    }
}
