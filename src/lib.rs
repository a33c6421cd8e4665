//! # Crawl Frontier
//!
//! A multi-queue, politeness- and budget-aware work scheduler for crawling
//! workloads.
//!
//! This library is the part of a crawler that decides, among thousands of
//! per-origin queues of pending items, which single item a worker may fetch
//! next, and what happens to that item's queue afterward. Items are grouped
//! into one [`core::WorkQueue`] per origin (class key), and each queue moves
//! through a five-state lifecycle: Ready, Inactive, Snoozed, Retired, or
//! dispatched (one item in flight).
//!
//! ## Guarantees
//!
//! - **Single-flight per origin**: at most one item per class key is ever in
//!   flight; while it is, its queue belongs to no pool.
//! - **FIFO within an origin**: items of one class key are dispatched in
//!   scheduling order, absent external reclassification.
//! - **Fair rotation**: origins interleave in Ready-pool arrival order; a
//!   duty-cycle balance and a lifetime budget keep any one origin from
//!   monopolizing workers.
//! - **Politeness**: after a dispatch completes, its queue can be snoozed for
//!   an externally computed delay before it may offer another item. Long
//!   snoozes deactivate the queue instead, keeping responsive origins cycling.
//!
//! ## Threading model
//!
//! Many worker threads call [`core::Frontier::next`] and
//! [`core::Frontier::finished`] concurrently; one dedicated waker thread
//! promotes snoozed queues back into rotation. The Ready pool is the workers'
//! only suspension point: a bounded wait, re-checked against the shutdown
//! flag.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crawl_frontier::builders::FrontierBuilder;
//! use crawl_frontier::config::FrontierConfig;
//! use crawl_frontier::core::{Disposition, WorkItem};
//!
//! let frontier = FrontierBuilder::new(FrontierConfig::default()).build()?;
//!
//! frontier.schedule(WorkItem::new(1, "https://example.com/a"));
//! let item = frontier.next()?;
//! // ... fetch ...
//! frontier.finished(item, Disposition::Success { politeness_delay_ms: 500 });
//! ```
//!
//! Network fetching, URI canonicalization, and persistent queue storage are
//! external collaborators behind the traits in [`infra`] and [`core`].

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling: work queues, pools, budgets, and the frontier itself.
pub mod core;
/// Configuration model for the frontier.
pub mod config;
/// Builders to construct a frontier from configuration.
pub mod builders;
/// Infrastructure seams: queue registry and already-seen filter backends.
pub mod infra;
/// Shared utilities.
pub mod util;
