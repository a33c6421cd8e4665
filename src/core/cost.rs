//! Cost assignment policies.
//!
//! A cost policy assigns each item a numeric cost, charged against its
//! queue's session balance and lifetime budget when the item is processed.
//! Policies are pure and deterministic for a fixed configuration and are
//! resolved by name through an explicit registry at configuration time; an
//! unresolvable name is a fatal startup error.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::FrontierError;
use crate::core::item::WorkItem;

/// Strategy assigning a numeric cost to an item.
pub trait CostPolicy: Send + Sync {
    /// Cost of processing the given item. Non-negative by construction.
    fn cost_of(&self, item: &WorkItem) -> u32;
}

/// Every item costs 1. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCost;

impl CostPolicy for UnitCost {
    fn cost_of(&self, _item: &WorkItem) -> u32 {
        1
    }
}

/// Every item costs 0: scheduling without budget consumption.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroCost;

impl CostPolicy for ZeroCost {
    fn cost_of(&self, _item: &WorkItem) -> u32 {
        0
    }
}

/// Cost derived from the item's externally supplied weight hint, floored at
/// 1 so weighted items still consume budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedCost;

impl CostPolicy for WeightedCost {
    fn cost_of(&self, item: &WorkItem) -> u32 {
        item.weight_hint.max(1)
    }
}

type PolicyCtor = fn() -> Arc<dyn CostPolicy>;

/// Name-to-constructor registry for cost policies, resolved when a frontier
/// is built or its settings are kicked.
pub struct CostPolicyRegistry {
    ctors: HashMap<String, PolicyCtor>,
}

impl CostPolicyRegistry {
    /// Registry preloaded with the built-in policies: `unit`, `zero`,
    /// `weighted`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            ctors: HashMap::new(),
        };
        registry.register("unit", || Arc::new(UnitCost));
        registry.register("zero", || Arc::new(ZeroCost));
        registry.register("weighted", || Arc::new(WeightedCost));
        registry
    }

    /// Register (or replace) a named policy constructor.
    pub fn register(&mut self, name: impl Into<String>, ctor: PolicyCtor) {
        self.ctors.insert(name.into(), ctor);
    }

    /// Resolve a policy by name.
    ///
    /// # Errors
    ///
    /// Returns [`FrontierError::UnknownCostPolicy`] for unregistered names;
    /// callers treat this as fatal rather than falling back silently.
    pub fn build(&self, name: &str) -> Result<Arc<dyn CostPolicy>, FrontierError> {
        self.ctors
            .get(name)
            .map(|ctor| ctor())
            .ok_or_else(|| FrontierError::UnknownCostPolicy(name.to_string()))
    }

    /// Names of all registered policies.
    #[must_use]
    pub fn available(&self) -> Vec<&str> {
        self.ctors.keys().map(String::as_str).collect()
    }
}

impl Default for CostPolicyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_policies() {
        let item = WorkItem::new(1, "https://example.com/a").with_weight_hint(4);
        assert_eq!(UnitCost.cost_of(&item), 1);
        assert_eq!(ZeroCost.cost_of(&item), 0);
        assert_eq!(WeightedCost.cost_of(&item), 4);
    }

    #[test]
    fn test_weighted_floors_at_one() {
        let item = WorkItem::new(1, "https://example.com/a").with_weight_hint(0);
        assert_eq!(WeightedCost.cost_of(&item), 1);
    }

    #[test]
    fn test_registry_resolution() {
        let registry = CostPolicyRegistry::with_defaults();
        let item = WorkItem::new(1, "https://example.com/a");
        let policy = registry.build("unit").unwrap();
        assert_eq!(policy.cost_of(&item), 1);

        let err = registry.build("no-such-policy").err().unwrap();
        assert!(matches!(err, FrontierError::UnknownCostPolicy(_)));
    }

    #[test]
    fn test_registry_custom_registration() {
        let mut registry = CostPolicyRegistry::with_defaults();
        registry.register("double", || {
            struct Double;
            impl CostPolicy for Double {
                fn cost_of(&self, item: &WorkItem) -> u32 {
                    item.weight_hint * 2
                }
            }
            Arc::new(Double)
        });
        let item = WorkItem::new(1, "https://example.com/a").with_weight_hint(3);
        assert_eq!(registry.build("double").unwrap().cost_of(&item), 6);
    }
}
