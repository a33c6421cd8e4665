//! Infrastructure seams: queue registry and already-seen filter backends.

pub mod registry;
pub mod seen;

pub use registry::{InMemoryRegistry, QueueRegistry, SharedQueue};
pub use seen::{InMemorySeenFilter, SeenFilter};
