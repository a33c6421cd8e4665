//! Queue registry backends.
//!
//! The frontier resolves class keys to queues through this seam so that
//! crawls larger than memory can delegate the registry to a persistent
//! key-value store. Only get/put/iterate semantics are required.

pub mod memory;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::work_queue::WorkQueue;

/// A queue shared between workers and the waker; fields are only mutated
/// while holding this per-queue lock.
pub type SharedQueue = Arc<Mutex<WorkQueue>>;

/// Key-value registry of all known queues, indexed by class key.
pub trait QueueRegistry: Send + Sync {
    /// Look up a queue, or `None` if the key is unknown.
    fn get(&self, class_key: &str) -> Option<SharedQueue>;

    /// Look up a queue, creating an empty one on first reference.
    fn get_or_create(&self, class_key: &str) -> SharedQueue;

    /// Visit every registered queue. Iteration order is unspecified.
    fn for_each(&self, visit: &mut dyn FnMut(&str, &SharedQueue));

    /// Number of registered queues.
    fn len(&self) -> usize;

    /// Whether no queue has been registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub use memory::InMemoryRegistry;
