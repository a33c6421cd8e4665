//! Frontier configuration structure.

use serde::{Deserialize, Serialize};

use crate::core::work_queue::UNLIMITED_BUDGET;

/// Tunables governing queue rotation, budgets, and politeness.
///
/// The same structure is accepted by `kick_update`, which swaps the runtime
/// settings atomically without disturbing already-queued items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontierConfig {
    /// Whether new queues start Inactive, activating only when needed to
    /// keep the Ready backlog at its target.
    pub hold_queues: bool,
    /// Duty-cycle credit granted to a queue on each activation. Larger
    /// amounts let a queue run longer before yielding to waiting queues.
    pub balance_replenish_amount: i64,
    /// Extra expenditure charged when an item fails terminally, accelerating
    /// retirement of problem origins.
    pub error_penalty_amount: u32,
    /// Lifetime expenditure ceiling per queue; −1 means no ceiling.
    pub queue_total_budget: i64,
    /// Named cost policy resolved through the policy registry.
    pub cost_policy: String,
    /// Snooze delays above this threshold deactivate the queue instead of
    /// snoozing it, when other queues are waiting Inactive.
    pub snooze_deactivate_ms: u64,
    /// Target size of the Ready-pool backlog. Clamped to at least 1.
    pub target_ready_backlog: usize,
    /// Bounded wait for a Ready queue before a worker re-checks shutdown.
    pub ready_wait_ms: u64,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            hold_queues: true,
            balance_replenish_amount: 3000,
            error_penalty_amount: 100,
            queue_total_budget: UNLIMITED_BUDGET,
            cost_policy: "unit".to_string(),
            snooze_deactivate_ms: 5 * 60 * 1000,
            target_ready_backlog: 50,
            ready_wait_ms: 1000,
        }
    }
}

impl FrontierConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.balance_replenish_amount <= 0 {
            return Err("balance_replenish_amount must be greater than 0".into());
        }
        if self.queue_total_budget < UNLIMITED_BUDGET {
            return Err("queue_total_budget must be -1 (unlimited) or non-negative".into());
        }
        if self.cost_policy.is_empty() {
            return Err("cost_policy must be set".into());
        }
        if self.ready_wait_ms == 0 {
            return Err("ready_wait_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse a configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = FrontierConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.hold_queues);
        assert_eq!(cfg.balance_replenish_amount, 3000);
        assert_eq!(cfg.queue_total_budget, UNLIMITED_BUDGET);
        assert_eq!(cfg.snooze_deactivate_ms, 300_000);
        assert_eq!(cfg.target_ready_backlog, 50);
    }

    #[test]
    fn test_invalid_replenish_amount() {
        let cfg = FrontierConfig {
            balance_replenish_amount: 0,
            ..FrontierConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_invalid_total_budget() {
        let cfg = FrontierConfig {
            queue_total_budget: -2,
            ..FrontierConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_json_partial_overrides() {
        let cfg =
            FrontierConfig::from_json_str(r#"{"hold_queues":false,"target_ready_backlog":2}"#)
                .unwrap();
        assert!(!cfg.hold_queues);
        assert_eq!(cfg.target_ready_backlog, 2);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.cost_policy, "unit");
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let err = FrontierConfig::from_json_str(r#"{"ready_wait_ms":0}"#).unwrap_err();
        assert!(err.contains("ready_wait_ms"));
    }
}
