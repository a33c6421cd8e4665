//! Core scheduling: work queues, pools, budgets, and the frontier itself.

pub mod cost;
pub mod error;
pub mod events;
pub mod frontier;
pub mod item;
pub mod wake;
pub mod work_queue;

pub use cost::{CostPolicy, CostPolicyRegistry, UnitCost, WeightedCost, ZeroCost};
pub use error::{AppResult, FrontierError};
pub use events::{EventAction, EventSink, FrontierEvent, InMemoryEventSink};
pub use frontier::{Frontier, FrontierStats, KeyResolver, UrlHostResolver};
pub use item::{Disposition, ItemId, WorkItem};
pub use wake::WakeScheduler;
pub use work_queue::WorkQueue;
