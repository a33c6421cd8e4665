//! Per-origin work queue entity.

use std::collections::VecDeque;

use crate::core::item::WorkItem;

/// Lifetime budget value meaning "no ceiling".
pub const UNLIMITED_BUDGET: i64 = -1;

/// One FIFO of pending items per distinct class key, carrying its own
/// budget and lifecycle flags.
///
/// At any instant a queue is a member of exactly one of the Ready, Inactive,
/// Snoozed, or Retired pools, except while one of its items is dispatched,
/// during which it belongs to no pool and is recorded once in the in-process
/// multiset. The frontier mutates a queue only while holding that queue's
/// lock; the queue itself performs no I/O.
#[derive(Debug)]
pub struct WorkQueue {
    class_key: String,
    pending: VecDeque<WorkItem>,
    /// Has ever been registered into a pool; gates first placement.
    held: bool,
    active: bool,
    retired: bool,
    /// Operator latch consumed by `kick_update` to un-retire this queue.
    reset_requested: bool,
    /// Duty-cycle credit, replenished on activation. May go negative.
    session_balance: i64,
    /// Lifetime expenditure cap; [`UNLIMITED_BUDGET`] disables the check.
    total_budget: i64,
    /// Monotonically increasing lifetime expenditure.
    total_expended: i64,
    /// Epoch millis of the pending wake; 0 when not snoozing.
    wake_time_ms: u64,
    /// Items counted toward the global queued total. Zeroed on retirement
    /// while the items themselves are kept for a possible operator reset.
    queued_count: u64,
    error_count: u64,
}

impl WorkQueue {
    /// Create an empty queue for the given class key.
    #[must_use]
    pub fn new(class_key: impl Into<String>) -> Self {
        Self {
            class_key: class_key.into(),
            pending: VecDeque::new(),
            held: false,
            active: false,
            retired: false,
            reset_requested: false,
            session_balance: 0,
            total_budget: UNLIMITED_BUDGET,
            total_expended: 0,
            wake_time_ms: 0,
            queued_count: 0,
            error_count: 0,
        }
    }

    /// The origin identity this queue serves.
    #[must_use]
    pub fn class_key(&self) -> &str {
        &self.class_key
    }

    /// Append an item; O(1).
    pub fn enqueue(&mut self, item: WorkItem) {
        self.pending.push_back(item);
        if !self.retired {
            self.queued_count += 1;
        }
    }

    /// Non-destructive look at the head item.
    #[must_use]
    pub fn peek_head(&self) -> Option<&WorkItem> {
        self.pending.front()
    }

    /// Mutable access to the head item, for writing back attempt counts and
    /// the assigned cost on an item that stays queued.
    pub fn peek_head_mut(&mut self) -> Option<&mut WorkItem> {
        self.pending.front_mut()
    }

    /// Remove and return the head item, decrementing the queued count.
    pub fn dequeue_head(&mut self) -> Option<WorkItem> {
        let item = self.pending.pop_front();
        if item.is_some() {
            self.queued_count = self.queued_count.saturating_sub(1);
        }
        item
    }

    /// Remove pending items matching the predicate; returns how many were
    /// dropped. The queued count shrinks by the same amount.
    pub fn delete_matching<F: Fn(&WorkItem) -> bool>(&mut self, pred: F) -> u64 {
        let before = self.pending.len();
        self.pending.retain(|item| !pred(item));
        let removed = (before - self.pending.len()) as u64;
        self.queued_count = self.queued_count.saturating_sub(removed);
        removed
    }

    /// Charge a processing cost: adds to the lifetime expenditure and
    /// subtracts from the session balance, which may go negative.
    pub fn expend(&mut self, cost: u32) {
        self.total_expended += i64::from(cost);
        self.session_balance -= i64::from(cost);
    }

    /// Record a terminal failure: the penalty is expended like cost and the
    /// error count is bumped.
    pub fn note_error(&mut self, penalty: u32) {
        self.expend(penalty);
        self.error_count += 1;
    }

    /// Whether the lifetime budget is used up.
    #[must_use]
    pub const fn is_over_budget(&self) -> bool {
        self.total_budget != UNLIMITED_BUDGET && self.total_expended >= self.total_budget
    }

    /// Whether the duty-cycle credit is used up for this activation.
    #[must_use]
    pub const fn is_duty_exhausted(&self) -> bool {
        self.session_balance <= 0
    }

    /// Reset the duty-cycle credit and refresh the lifetime budget from the
    /// current configuration.
    pub const fn replenish(&mut self, amount: i64, total_budget: i64) {
        self.session_balance = amount;
        self.total_budget = total_budget;
    }

    /// Zero the duty-cycle credit (used on deactivation).
    pub const fn drain_session_balance(&mut self) {
        self.session_balance = 0;
    }

    /// Current duty-cycle credit.
    #[must_use]
    pub const fn session_balance(&self) -> i64 {
        self.session_balance
    }

    /// Lifetime expenditure so far.
    #[must_use]
    pub const fn total_expended(&self) -> i64 {
        self.total_expended
    }

    /// Set the pending wake time (epoch millis; 0 clears it).
    pub const fn set_wake_time(&mut self, wake_time_ms: u64) {
        self.wake_time_ms = wake_time_ms;
    }

    /// Pending wake time; 0 when not snoozing.
    #[must_use]
    pub const fn wake_time_ms(&self) -> u64 {
        self.wake_time_ms
    }

    /// Number of items counted toward the global queued total.
    #[must_use]
    pub const fn queued_count(&self) -> u64 {
        self.queued_count
    }

    /// Number of terminal failures recorded against this queue.
    #[must_use]
    pub const fn error_count(&self) -> u64 {
        self.error_count
    }

    /// Whether the queue holds no pending items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending items, counted or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether this queue has ever been registered into a pool.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    /// Mark the queue as registered into a pool.
    pub const fn set_held(&mut self) {
        self.held = true;
    }

    /// Clear the held flag so the next `schedule()` re-places the queue.
    pub const fn clear_held(&mut self) {
        self.held = false;
    }

    /// Whether the queue is in active rotation (Ready or dispatched).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Set the active-rotation flag.
    pub const fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the queue has been permanently removed from rotation.
    #[must_use]
    pub const fn is_retired(&self) -> bool {
        self.retired
    }

    /// Mark the queue retired or restored. Retirement zeroes the queued
    /// count; restoration recounts the surviving pending items.
    pub fn set_retired(&mut self, retired: bool) {
        self.retired = retired;
        if retired {
            self.queued_count = 0;
        } else {
            self.queued_count = self.pending.len() as u64;
        }
    }

    /// Arm the operator reset latch consumed by `kick_update`.
    pub const fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Consume the operator reset latch, returning whether it was armed.
    pub const fn take_reset_request(&mut self) -> bool {
        let armed = self.reset_requested;
        self.reset_requested = false;
        armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64) -> WorkItem {
        WorkItem::with_class_key(id, format!("https://h/{id}"), "h")
    }

    #[test]
    fn test_fifo_order() {
        let mut wq = WorkQueue::new("h");
        wq.enqueue(item(1));
        wq.enqueue(item(2));
        wq.enqueue(item(3));
        assert_eq!(wq.peek_head().unwrap().id, 1);
        assert_eq!(wq.dequeue_head().unwrap().id, 1);
        assert_eq!(wq.dequeue_head().unwrap().id, 2);
        assert_eq!(wq.queued_count(), 1);
    }

    #[test]
    fn test_budget_accounting() {
        let mut wq = WorkQueue::new("h");
        wq.replenish(3, 5);
        assert!(!wq.is_duty_exhausted());
        wq.expend(2);
        wq.expend(2);
        assert!(wq.is_duty_exhausted());
        assert_eq!(wq.session_balance(), -1);
        assert!(!wq.is_over_budget());
        // The budget is used up exactly at the cap, not one past it.
        wq.expend(1);
        assert!(wq.is_over_budget());
    }

    #[test]
    fn test_unlimited_budget_never_exceeded() {
        let mut wq = WorkQueue::new("h");
        wq.replenish(1, UNLIMITED_BUDGET);
        wq.expend(1_000_000);
        assert!(!wq.is_over_budget());
    }

    #[test]
    fn test_error_penalty_counts_and_expends() {
        let mut wq = WorkQueue::new("h");
        wq.replenish(10, UNLIMITED_BUDGET);
        wq.note_error(100);
        assert_eq!(wq.error_count(), 1);
        assert_eq!(wq.total_expended(), 100);
    }

    #[test]
    fn test_retire_zeroes_count_and_keeps_items() {
        let mut wq = WorkQueue::new("h");
        wq.enqueue(item(1));
        wq.enqueue(item(2));
        wq.set_retired(true);
        assert_eq!(wq.queued_count(), 0);
        assert_eq!(wq.len(), 2);
        // Items scheduled while retired stay uncounted.
        wq.enqueue(item(3));
        assert_eq!(wq.queued_count(), 0);
        wq.set_retired(false);
        assert_eq!(wq.queued_count(), 3);
    }

    #[test]
    fn test_delete_matching() {
        let mut wq = WorkQueue::new("h");
        for id in 1..=4 {
            wq.enqueue(item(id));
        }
        let removed = wq.delete_matching(|i| i.id % 2 == 0);
        assert_eq!(removed, 2);
        assert_eq!(wq.queued_count(), 2);
        assert_eq!(wq.peek_head().unwrap().id, 1);
    }
}
