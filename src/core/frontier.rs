//! The frontier: multi-queue scheduler core.
//!
//! Orchestrates five queue pools (Ready, Inactive, Retired, Snoozed,
//! in-process), dispatches items to workers, and routes queues after each
//! completion based on budgets, politeness delays, and retry delays.
//!
//! # Pools and locks
//!
//! Ready, Inactive, and Retired are unbounded channel FIFOs of class keys;
//! the Ready receiver is the workers' single suspension point (bounded
//! `recv_timeout`, re-looped against the shutdown flag). The snooze board
//! lives in the [`WakeScheduler`] under its own lock, shared with the wake
//! signalling state. Each [`WorkQueue`] has its own mutex; pool membership
//! changes happen while holding it. Lock order is queue, then pool channels
//! (lock-free), then snooze board; the settings lock is only ever read under
//! a queue lock and written while holding no other lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::FrontierConfig;
use crate::core::cost::{CostPolicy, CostPolicyRegistry};
use crate::core::error::FrontierError;
use crate::core::events::{build_event, EventAction, EventSink};
use crate::core::item::{host_of, Disposition, WorkItem};
use crate::core::wake::{WakeOutcome, WakeScheduler};
use crate::core::work_queue::WorkQueue;
use crate::infra::registry::QueueRegistry;
use crate::infra::seen::SeenFilter;
use crate::util::clock::now_ms;

/// Computes an item's class key. Stable unless the item is externally
/// mutated; a changed key observed at dispatch time moves the item to its
/// new queue.
pub trait KeyResolver: Send + Sync {
    /// Current class key of the item.
    fn class_key(&self, item: &WorkItem) -> String;
}

/// Default resolver: the host part of a `scheme://host/...` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlHostResolver;

impl KeyResolver for UrlHostResolver {
    fn class_key(&self, item: &WorkItem) -> String {
        host_of(&item.target)
    }
}

/// Settings swappable at runtime via `kick_update`.
struct RuntimeSettings {
    hold_queues: bool,
    balance_replenish_amount: i64,
    error_penalty_amount: u32,
    queue_total_budget: i64,
    snooze_deactivate_ms: u64,
    target_ready_backlog: usize,
    ready_wait_ms: u64,
    cost_policy: Arc<dyn CostPolicy>,
}

impl RuntimeSettings {
    fn from_config(cfg: &FrontierConfig, cost_policy: Arc<dyn CostPolicy>) -> Self {
        Self {
            hold_queues: cfg.hold_queues,
            balance_replenish_amount: cfg.balance_replenish_amount,
            error_penalty_amount: cfg.error_penalty_amount,
            queue_total_budget: cfg.queue_total_budget,
            snooze_deactivate_ms: cfg.snooze_deactivate_ms,
            target_ready_backlog: cfg.target_ready_backlog.max(1),
            ready_wait_ms: cfg.ready_wait_ms,
            cost_policy,
        }
    }
}

/// Progress counters (lock-free atomics).
#[derive(Debug, Default)]
struct FrontierCounters {
    dispatched: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    disregarded: AtomicU64,
    retried: AtomicU64,
}

/// A pool of class keys with FIFO order and a bounded-wait pop.
struct KeyPool {
    tx: Sender<String>,
    rx: Receiver<String>,
}

impl KeyPool {
    fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    fn push(&self, key: String) {
        // Unbounded channel with a held receiver: send cannot fail.
        let _ = self.tx.send(key);
    }

    fn try_pop(&self) -> Option<String> {
        self.rx.try_recv().ok()
    }

    fn len(&self) -> usize {
        self.rx.len()
    }

    fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Snapshot of pool sizes and progress counters.
#[derive(Debug, Clone)]
pub struct FrontierStats {
    /// Queues known to the registry, in any state.
    pub known_queues: usize,
    /// Queues whose head item may be handed out.
    pub ready: usize,
    /// Queues held out of rotation until needed.
    pub inactive: usize,
    /// Queues waiting out a politeness or retry delay.
    pub snoozed: usize,
    /// Queues permanently removed from rotation.
    pub retired: usize,
    /// Distinct queues with an item in flight.
    pub in_process: usize,
    /// Items queued and counted across all non-retired queues.
    pub queued_items: i64,
    /// Items handed to workers.
    pub dispatched: u64,
    /// Items finished successfully.
    pub succeeded: u64,
    /// Items failed terminally.
    pub failed: u64,
    /// Items disregarded.
    pub disregarded: u64,
    /// Recoverable failures rescheduled for retry.
    pub retried: u64,
    /// Distinct keys recorded by the seen filter.
    pub discovered: u64,
    /// Class key and depth of the deepest queue observed so far.
    pub deepest_queue: Option<(String, u64)>,
}

impl FrontierStats {
    /// Mean queued items per queue still in rotation.
    #[must_use]
    pub fn average_depth(&self) -> i64 {
        let active = self.in_process + self.ready + self.snoozed;
        let total = active + self.inactive;
        if total == 0 {
            0
        } else {
            self.queued_items / i64::try_from(total).unwrap_or(i64::MAX)
        }
    }

    /// Ratio of queues wanting rotation to queues actually progressing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn congestion_ratio(&self) -> f64 {
        let wanting = self.in_process + self.ready + self.snoozed + self.inactive;
        let progressing = self.in_process + self.snoozed;
        if progressing == 0 {
            0.0
        } else {
            wanting as f64 / progressing as f64
        }
    }
}

struct FrontierInner {
    settings: RwLock<RuntimeSettings>,
    policies: CostPolicyRegistry,
    registry: Box<dyn QueueRegistry>,
    seen: Box<dyn SeenFilter>,
    resolver: Box<dyn KeyResolver>,
    ready: KeyPool,
    inactive: KeyPool,
    retired: KeyPool,
    /// Queues with an item in flight, with multiplicity. Single-flight makes
    /// the multiplicity 0 or 1 in practice.
    in_process: Mutex<HashMap<String, usize>>,
    wake: WakeScheduler,
    /// Serializes Inactive-to-Ready backlog fills across workers.
    activation: Mutex<()>,
    queued_items: AtomicI64,
    shutdown: AtomicBool,
    /// Set once the waker thread has been told to exit; snoozed work can no
    /// longer be promoted after this.
    wake_stopped: AtomicBool,
    counters: FrontierCounters,
    events: Option<Mutex<Box<dyn EventSink>>>,
    deepest: Mutex<Option<(String, u64)>>,
}

/// The scheduler core. Cheap to share behind an `Arc`; all methods take
/// `&self` and are safe to call from many worker threads.
pub struct Frontier {
    inner: Arc<FrontierInner>,
    waker: Mutex<Option<JoinHandle<()>>>,
}

impl Frontier {
    /// Assemble a frontier from configuration and collaborators, and start
    /// the waker thread. Used by [`crate::builders::FrontierBuilder`].
    ///
    /// # Errors
    ///
    /// Returns [`FrontierError::InvalidConfig`] for invalid configuration and
    /// [`FrontierError::UnknownCostPolicy`] when the configured policy name
    /// cannot be resolved; both abort construction.
    pub(crate) fn assemble(
        config: &FrontierConfig,
        policies: CostPolicyRegistry,
        registry: Box<dyn QueueRegistry>,
        seen: Box<dyn SeenFilter>,
        resolver: Box<dyn KeyResolver>,
        events: Option<Box<dyn EventSink>>,
    ) -> Result<Self, FrontierError> {
        config.validate().map_err(FrontierError::InvalidConfig)?;
        let cost_policy = policies.build(&config.cost_policy)?;

        let inner = Arc::new(FrontierInner {
            settings: RwLock::new(RuntimeSettings::from_config(config, cost_policy)),
            policies,
            registry,
            seen,
            resolver,
            ready: KeyPool::new(),
            inactive: KeyPool::new(),
            retired: KeyPool::new(),
            in_process: Mutex::new(HashMap::new()),
            wake: WakeScheduler::new(),
            activation: Mutex::new(()),
            queued_items: AtomicI64::new(0),
            shutdown: AtomicBool::new(false),
            wake_stopped: AtomicBool::new(false),
            counters: FrontierCounters::default(),
            events: events.map(Mutex::new),
            deepest: Mutex::new(None),
        });

        let waker_inner = Arc::clone(&inner);
        let waker = thread::Builder::new()
            .name("frontier-waker".into())
            .spawn(move || wake_loop(&waker_inner))
            .map_err(|e| FrontierError::Backend(format!("failed to spawn waker: {e}")))?;

        info!(
            cost_policy = %config.cost_policy,
            target_ready_backlog = config.target_ready_backlog,
            hold_queues = config.hold_queues,
            "frontier initialized"
        );

        Ok(Self {
            inner,
            waker: Mutex::new(Some(waker)),
        })
    }

    /// Arrange for the item to be visited, unless the seen filter already
    /// knows it.
    pub fn schedule(&self, item: WorkItem) {
        if !self.inner.seen.add(&item.target, &item) {
            debug!(target = %item.target, "already seen; dropped");
            return;
        }
        self.inner.send_to_queue(item);
    }

    /// Arrange for the item to be visited even if it was seen before. The
    /// seen filter still takes note of it.
    pub fn schedule_force(&self, item: WorkItem) {
        self.inner.seen.note(&item.target);
        self.inner.send_to_queue(item);
    }

    /// Return the next item for a worker, blocking until one is available.
    ///
    /// # Errors
    ///
    /// [`FrontierError::Ended`] once shutdown is signaled and no Ready,
    /// Snoozed, or in-process work remains.
    pub fn next(&self) -> Result<WorkItem, FrontierError> {
        loop {
            let wait = Duration::from_millis(self.inner.settings.read().ready_wait_ms);
            if let Some(item) = self.poll_next(wait)? {
                return Ok(item);
            }
        }
    }

    /// One bounded-wait attempt to obtain an item: fill the Ready backlog
    /// from Inactive, then wait up to `wait` for a Ready queue.
    ///
    /// # Errors
    ///
    /// [`FrontierError::Ended`] as for [`Self::next`].
    pub fn poll_next(&self, wait: Duration) -> Result<Option<WorkItem>, FrontierError> {
        let inner = &self.inner;
        inner.fill_ready_backlog();
        match inner.ready.rx.recv_timeout(wait) {
            Ok(key) => Ok(inner.dispatch_from(&key)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                if inner.shutdown.load(Ordering::Acquire) && inner.no_dispatchable_work() {
                    return Err(FrontierError::Ended);
                }
                if inner.in_process.lock().is_empty() {
                    inner.seen.request_flush();
                }
                Ok(None)
            }
        }
    }

    /// Report the outcome of a dispatched item and route its queue.
    pub fn finished(&self, item: WorkItem, disposition: Disposition) {
        self.inner.finished(item, disposition);
    }

    /// Swap in new runtime settings and un-retire any queue whose operator
    /// reset latch is armed.
    ///
    /// # Errors
    ///
    /// [`FrontierError::InvalidConfig`] or
    /// [`FrontierError::UnknownCostPolicy`]; in both cases the previous
    /// settings stay in effect.
    pub fn kick_update(&self, config: &FrontierConfig) -> Result<(), FrontierError> {
        self.inner.kick_update(config)
    }

    /// Arm the operator reset latch on a retired queue; the next
    /// `kick_update` returns it to rotation. Returns whether a retired queue
    /// with that key exists.
    pub fn request_queue_reset(&self, class_key: &str) -> bool {
        let Some(queue) = self.inner.registry.get(class_key) else {
            return false;
        };
        let mut wq = queue.lock();
        if wq.is_retired() {
            wq.request_reset();
            true
        } else {
            false
        }
    }

    /// Whether no counted items remain queued and the seen filter reports no
    /// pending work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.queued_items.load(Ordering::Acquire) == 0 && self.inner.seen.pending() == 0
    }

    /// Snapshot pool sizes and progress counters.
    #[must_use]
    pub fn stats(&self) -> FrontierStats {
        let inner = &self.inner;
        FrontierStats {
            known_queues: inner.registry.len(),
            ready: inner.ready.len(),
            inactive: inner.inactive.len(),
            snoozed: inner.wake.len(),
            retired: inner.retired.len(),
            in_process: inner.in_process.lock().len(),
            queued_items: inner.queued_items.load(Ordering::Acquire),
            dispatched: inner.counters.dispatched.load(Ordering::Relaxed),
            succeeded: inner.counters.succeeded.load(Ordering::Relaxed),
            failed: inner.counters.failed.load(Ordering::Relaxed),
            disregarded: inner.counters.disregarded.load(Ordering::Relaxed),
            retried: inner.counters.retried.load(Ordering::Relaxed),
            discovered: inner.seen.count(),
            deepest_queue: inner.deepest.lock().clone(),
        }
    }

    /// Remove matching pending items across all queues; returns how many
    /// were dropped.
    pub fn delete_matching<F: Fn(&WorkItem) -> bool>(&self, pred: F) -> u64 {
        let inner = &self.inner;
        let mut removed_total = 0;
        inner.registry.for_each(&mut |_, queue| {
            let mut wq = queue.lock();
            let counted = !wq.is_retired();
            let removed = wq.delete_matching(&pred);
            if removed > 0 && counted {
                inner
                    .queued_items
                    .fetch_sub(i64::try_from(removed).unwrap_or(i64::MAX), Ordering::Relaxed);
            }
            removed_total += removed;
        });
        removed_total
    }

    /// Record an externally processed item: mark it seen and charge its
    /// queue's budgets as if it had been dispatched here.
    pub fn note_included(&self, mut item: WorkItem) {
        self.inner.seen.note(&item.target);
        let queue = self.inner.registry.get_or_create(&item.class_key);
        let cost = self.inner.cost_of(&mut item);
        queue.lock().expend(cost);
    }

    /// Forget an item so a new instance may be scheduled in the future.
    pub fn forget(&self, item: &WorkItem) {
        debug!(target = %item.target, "forgetting");
        self.inner.seen.forget(&item.target, item);
    }

    /// Signal shutdown. Workers drain remaining Ready work, then `next`
    /// returns [`FrontierError::Ended`]; in-flight items finish normally.
    pub fn request_stop(&self) {
        self.inner.shutdown.store(true, Ordering::Release);
    }

    /// Signal shutdown and stop the waker thread. Snoozed queues are no
    /// longer promoted after this.
    pub fn shutdown(&self) {
        self.request_stop();
        self.inner.wake_stopped.store(true, Ordering::Release);
        self.inner.wake.shutdown();
        if let Some(handle) = self.waker.lock().take() {
            if handle.join().is_err() {
                warn!("waker thread panicked");
            }
        }
    }
}

impl Drop for Frontier {
    fn drop(&mut self) {
        // Signal without joining; an explicit shutdown() is the graceful
        // path and the waker exits promptly on the signal either way.
        if !self.inner.shutdown.swap(true, Ordering::AcqRel) {
            self.inner.wake_stopped.store(true, Ordering::Release);
            self.inner.wake.shutdown();
        }
    }
}

impl FrontierInner {
    /// Send an item to its per-class-key queue, creating the queue on first
    /// reference and deciding its first pool placement.
    fn send_to_queue(&self, mut item: WorkItem) {
        let class_key = item.class_key.clone();
        let queue = self.registry.get_or_create(&class_key);
        let mut wq = queue.lock();
        item.holder_key = Some(class_key.clone());
        wq.enqueue(item);
        if !wq.is_retired() {
            self.queued_items.fetch_add(1, Ordering::Relaxed);
        }
        if !wq.is_held() {
            wq.set_held();
            let (hold_queues, target, amount, budget) = {
                let s = self.settings.read();
                (
                    s.hold_queues,
                    s.target_ready_backlog,
                    s.balance_replenish_amount,
                    s.queue_total_budget,
                )
            };
            if hold_queues && self.ready.len() >= target {
                self.deactivate_queue(&mut wq);
            } else {
                wq.replenish(amount, budget);
                self.ready_queue(&mut wq);
            }
        }
        if !wq.is_retired() {
            let depth = wq.queued_count();
            let mut deepest = self.deepest.lock();
            if deepest.as_ref().is_none_or(|(_, d)| depth > *d) {
                *deepest = Some((class_key, depth));
            }
        }
    }

    /// Put the queue in the Ready pool.
    fn ready_queue(&self, wq: &mut WorkQueue) {
        wq.set_active(true);
        self.ready.push(wq.class_key().to_string());
    }

    /// Put the queue in the Inactive pool with a drained session balance; it
    /// re-earns its balance at next activation.
    fn deactivate_queue(&self, wq: &mut WorkQueue) {
        wq.drain_session_balance();
        wq.set_active(false);
        self.inactive.push(wq.class_key().to_string());
    }

    /// Permanently remove the queue from rotation. Its counted
    /// items leave the global total; the items themselves are kept inert in
    /// case of an operator reset.
    fn retire_queue(&self, wq: &mut WorkQueue) {
        info!(
            class_key = wq.class_key(),
            expended = wq.total_expended(),
            "retiring queue"
        );
        self.retired.push(wq.class_key().to_string());
        self.queued_items.fetch_sub(
            i64::try_from(wq.queued_count()).unwrap_or(i64::MAX),
            Ordering::Relaxed,
        );
        wq.set_retired(true);
        wq.set_active(false);
    }

    /// Route a queue with no pending snooze back into rotation: retire it
    /// when over budget, honor an unserved wake time, drop an empty queue
    /// out of every pool, and otherwise replenish and ready it.
    fn re_admit(&self, wq: &mut WorkQueue) {
        if wq.is_over_budget() {
            self.retire_queue(wq);
            return;
        }
        if wq.wake_time_ms() > now_ms() {
            // Still serving an earlier snooze; honor it.
            wq.set_active(false);
            self.wake.schedule(wq.class_key(), wq.wake_time_ms());
            return;
        }
        wq.set_wake_time(0);
        if wq.is_empty() {
            // Out of every pool until its next schedule() re-places it.
            wq.clear_held();
            wq.set_active(false);
            return;
        }
        let (hold_queues, amount, budget) = {
            let s = self.settings.read();
            (
                s.hold_queues,
                s.balance_replenish_amount,
                s.queue_total_budget,
            )
        };
        if hold_queues && wq.is_duty_exhausted() {
            debug!(class_key = wq.class_key(), "duty cycle exhausted; deactivating");
            self.deactivate_queue(wq);
            return;
        }
        wq.replenish(amount, budget);
        self.ready_queue(wq);
    }

    /// Snooze the queue for `delay_ms`. Delays beyond the
    /// deactivation threshold move the queue to Inactive instead when other
    /// queues are waiting there, keeping the snooze board small; the wake
    /// time is still recorded and honored at next activation.
    fn snooze_queue(&self, wq: &mut WorkQueue, now: u64, delay_ms: u64) {
        wq.set_wake_time(now + delay_ms);
        let threshold = self.settings.read().snooze_deactivate_ms;
        if delay_ms > threshold && !self.inactive.is_empty() {
            debug!(
                class_key = wq.class_key(),
                delay_ms, "long snooze; deactivating instead"
            );
            self.deactivate_queue(wq);
        } else {
            wq.set_active(false);
            self.wake.schedule(wq.class_key(), wq.wake_time_ms());
        }
    }

    /// Pop queues from Inactive until the Ready backlog reaches its target
    /// or Inactive is exhausted. Serialized so concurrent workers do not
    /// over-fill.
    fn fill_ready_backlog(&self) {
        let _guard = self.activation.lock();
        let target = self.settings.read().target_ready_backlog;
        let mut needed = target.saturating_sub(self.ready.len());
        while needed > 0 && self.activate_one_inactive() {
            needed -= 1;
        }
    }

    /// Activate one Inactive queue: replenish, then retire, snooze, or
    /// ready it. Returns false when Inactive is exhausted.
    fn activate_one_inactive(&self) -> bool {
        let Some(key) = self.inactive.try_pop() else {
            return false;
        };
        let Some(queue) = self.registry.get(&key) else {
            warn!(%key, "inactive key missing from registry");
            return true;
        };
        let mut wq = queue.lock();
        let (amount, budget) = {
            let s = self.settings.read();
            (s.balance_replenish_amount, s.queue_total_budget)
        };
        wq.replenish(amount, budget);
        if wq.is_over_budget() {
            self.retire_queue(&mut wq);
            return true;
        }
        if wq.wake_time_ms() > now_ms() {
            wq.set_active(false);
            self.wake.schedule(wq.class_key(), wq.wake_time_ms());
            return true;
        }
        wq.set_wake_time(0);
        debug!(class_key = wq.class_key(), "activated queue");
        self.ready_queue(&mut wq);
        true
    }

    /// Commit a Ready queue's head item to a worker, moving reclassified
    /// items to their new queue first.
    fn dispatch_from(&self, key: &str) -> Option<WorkItem> {
        let Some(queue) = self.registry.get(key) else {
            warn!(key, "ready key missing from registry");
            return None;
        };
        loop {
            let moved = {
                let mut wq = queue.lock();
                let Some(head) = wq.peek_head() else {
                    // Exhausted; next schedule() re-places it.
                    wq.clear_held();
                    wq.set_active(false);
                    return None;
                };
                let current_key = self.resolver.class_key(head);
                if current_key == key {
                    let mut out = head.clone();
                    out.holder_key = Some(key.to_string());
                    self.in_process_add(key);
                    self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
                    self.emit(key, &out.target, EventAction::Dispatched);
                    return Some(out);
                }
                let mut moved = wq.dequeue_head()?;
                self.queued_items.fetch_sub(1, Ordering::Relaxed);
                moved.class_key = current_key;
                moved.holder_key = None;
                moved
            };
            debug!(from = key, to = %moved.class_key, "item reclassified");
            self.send_to_queue(moved);
        }
    }

    fn finished(&self, mut item: WorkItem, disposition: Disposition) {
        let now = now_ms();
        let key = item
            .holder_key
            .clone()
            .unwrap_or_else(|| item.class_key.clone());
        self.in_process_remove(&key);
        let Some(queue) = self.registry.get(&key) else {
            warn!(%key, item = item.id, "finished item for unknown queue");
            return;
        };
        let cost = self.cost_of(&mut item);

        if item.force_retire || disposition == Disposition::ForceRetire {
            let mut wq = queue.lock();
            self.retire_queue(&mut wq);
            return;
        }

        if let Disposition::NeedsRetry { retry_delay_ms } = disposition {
            {
                let mut wq = queue.lock();
                // The item stays at the head; the attempt and the assigned
                // cost belong to the stored item, not the worker's copy.
                if let Some(head) = wq.peek_head_mut().filter(|head| head.id == item.id) {
                    head.record_attempt();
                    head.cache_cost(cost);
                }
                // Failed attempts are charged.
                wq.expend(cost);
                if retry_delay_ms > 0 {
                    self.snooze_queue(&mut wq, now, retry_delay_ms);
                } else {
                    self.re_admit(&mut wq);
                }
            }
            self.counters.retried.fetch_add(1, Ordering::Relaxed);
            self.emit(&key, &item.target, EventAction::RetryRescheduled);
            return;
        }

        let delay_ms = disposition.politeness_delay_ms();
        {
            let mut wq = queue.lock();
            match wq.peek_head() {
                Some(head) if head.id == item.id => {
                    wq.dequeue_head();
                    self.queued_items.fetch_sub(1, Ordering::Relaxed);
                }
                _ => warn!(%key, item = item.id, "finished item not at queue head"),
            }
            wq.expend(cost);
            if matches!(disposition, Disposition::TerminalFailure { .. }) {
                let penalty = self.settings.read().error_penalty_amount;
                wq.note_error(penalty);
            }
            if delay_ms > 0 {
                self.snooze_queue(&mut wq, now, delay_ms);
            } else {
                self.re_admit(&mut wq);
            }
        }

        match disposition {
            Disposition::Success { .. } => {
                self.counters.succeeded.fetch_add(1, Ordering::Relaxed);
                self.emit(&key, &item.target, EventAction::Succeeded);
            }
            Disposition::TerminalFailure { .. } => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                self.emit(&key, &item.target, EventAction::Failed);
            }
            Disposition::Disregard { .. } => {
                self.counters.disregarded.fetch_add(1, Ordering::Relaxed);
                self.emit(&key, &item.target, EventAction::Disregarded);
            }
            Disposition::NeedsRetry { .. } | Disposition::ForceRetire => {}
        }
    }

    fn kick_update(&self, config: &FrontierConfig) -> Result<(), FrontierError> {
        config.validate().map_err(FrontierError::InvalidConfig)?;
        let cost_policy = self.policies.build(&config.cost_policy)?;
        *self.settings.write() = RuntimeSettings::from_config(config, cost_policy);
        info!(cost_policy = %config.cost_policy, "runtime settings updated");

        let (amount, budget) = {
            let s = self.settings.read();
            (s.balance_replenish_amount, s.queue_total_budget)
        };
        let mut keep = Vec::new();
        while let Some(key) = self.retired.try_pop() {
            let Some(queue) = self.registry.get(&key) else {
                warn!(%key, "retired key missing from registry");
                continue;
            };
            let mut wq = queue.lock();
            if wq.take_reset_request() {
                wq.set_retired(false);
                self.queued_items.fetch_add(
                    i64::try_from(wq.queued_count()).unwrap_or(i64::MAX),
                    Ordering::Relaxed,
                );
                // The refreshed budget must apply before re-admission checks
                // it, otherwise the reset retires the queue right back.
                wq.replenish(amount, budget);
                info!(%key, "queue un-retired");
                self.re_admit(&mut wq);
            } else {
                keep.push(key);
            }
        }
        for key in keep {
            self.retired.push(key);
        }
        Ok(())
    }

    /// Assign (and cache) the item's cost under the active policy.
    fn cost_of(&self, item: &mut WorkItem) -> u32 {
        if let Some(cost) = item.cached_cost() {
            return cost;
        }
        let cost = self.settings.read().cost_policy.cost_of(item);
        item.cache_cost(cost);
        cost
    }

    fn no_dispatchable_work(&self) -> bool {
        self.ready.is_empty()
            && self.in_process.lock().is_empty()
            && (self.wake.is_empty() || self.wake_stopped.load(Ordering::Acquire))
    }

    fn in_process_add(&self, key: &str) {
        *self.in_process.lock().entry(key.to_string()).or_insert(0) += 1;
    }

    fn in_process_remove(&self, key: &str) {
        let mut map = self.in_process.lock();
        if let Some(n) = map.get_mut(key) {
            *n -= 1;
            if *n == 0 {
                map.remove(key);
            }
        } else {
            warn!(key, "finished for item not marked in-process");
        }
    }

    fn emit(&self, class_key: &str, target: &str, action: EventAction) {
        if let Some(sink) = &self.events {
            sink.lock().record(build_event(class_key, target, action));
        }
    }
}

/// Waker thread body: promote snoozed queues whose time has come.
fn wake_loop(inner: &Arc<FrontierInner>) {
    debug!("waker thread started");
    loop {
        let idle = Duration::from_millis(inner.settings.read().ready_wait_ms);
        match inner.wake.wait_due(idle) {
            WakeOutcome::Shutdown => break,
            WakeOutcome::Due(keys) => {
                for key in keys {
                    let Some(queue) = inner.registry.get(&key) else {
                        warn!(%key, "snoozed key missing from registry");
                        continue;
                    };
                    let mut wq = queue.lock();
                    wq.set_wake_time(0);
                    inner.re_admit(&mut wq);
                }
            }
        }
    }
    debug!("waker thread exiting");
}
