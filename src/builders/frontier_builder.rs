//! Builder wiring configuration and collaborators into a frontier.

use crate::config::FrontierConfig;
use crate::core::cost::CostPolicyRegistry;
use crate::core::error::FrontierError;
use crate::core::events::EventSink;
use crate::core::frontier::{Frontier, KeyResolver, UrlHostResolver};
use crate::infra::registry::{InMemoryRegistry, QueueRegistry};
use crate::infra::seen::{InMemorySeenFilter, SeenFilter};

/// Builder for [`Frontier`].
///
/// Every collaborator has an in-memory default, so
/// `FrontierBuilder::new(config).build()` yields a working scheduler;
/// production deployments swap in persistent backends at the same seams.
///
/// # Example
///
/// ```
/// use crawl_frontier::builders::FrontierBuilder;
/// use crawl_frontier::config::FrontierConfig;
///
/// let frontier = FrontierBuilder::new(FrontierConfig::default())
///     .build()
///     .expect("valid default configuration");
/// assert!(frontier.is_empty());
/// ```
pub struct FrontierBuilder {
    config: FrontierConfig,
    registry: Option<Box<dyn QueueRegistry>>,
    seen: Option<Box<dyn SeenFilter>>,
    resolver: Option<Box<dyn KeyResolver>>,
    policies: CostPolicyRegistry,
    events: Option<Box<dyn EventSink>>,
}

impl FrontierBuilder {
    /// Start a builder from the given configuration.
    #[must_use]
    pub fn new(config: FrontierConfig) -> Self {
        Self {
            config,
            registry: None,
            seen: None,
            resolver: None,
            policies: CostPolicyRegistry::with_defaults(),
            events: None,
        }
    }

    /// Use a custom queue registry backend.
    #[must_use]
    pub fn with_registry(mut self, registry: Box<dyn QueueRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use a custom already-seen filter.
    #[must_use]
    pub fn with_seen_filter(mut self, seen: Box<dyn SeenFilter>) -> Self {
        self.seen = Some(seen);
        self
    }

    /// Use a custom class-key resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn KeyResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replace the cost-policy registry, e.g. to register custom policies.
    #[must_use]
    pub fn with_cost_policies(mut self, policies: CostPolicyRegistry) -> Self {
        self.policies = policies;
        self
    }

    /// Attach an event sink receiving lifecycle notifications.
    #[must_use]
    pub fn with_event_sink(mut self, events: Box<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// Build the frontier and start its waker thread.
    ///
    /// # Errors
    ///
    /// [`FrontierError::InvalidConfig`] for invalid configuration values and
    /// [`FrontierError::UnknownCostPolicy`] when the configured cost policy
    /// is not registered. Both abort construction.
    pub fn build(self) -> Result<Frontier, FrontierError> {
        Frontier::assemble(
            &self.config,
            self.policies,
            self.registry
                .unwrap_or_else(|| Box::new(InMemoryRegistry::new())),
            self.seen
                .unwrap_or_else(|| Box::new(InMemorySeenFilter::new())),
            self.resolver.unwrap_or_else(|| Box::new(UrlHostResolver)),
            self.events,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_build() {
        let frontier = FrontierBuilder::new(FrontierConfig::default()).build().unwrap();
        assert!(frontier.is_empty());
        frontier.shutdown();
    }

    #[test]
    fn test_unknown_cost_policy_is_fatal() {
        let config = FrontierConfig {
            cost_policy: "no-such-policy".to_string(),
            ..FrontierConfig::default()
        };
        let err = FrontierBuilder::new(config).build().err().unwrap();
        assert!(matches!(err, FrontierError::UnknownCostPolicy(_)));
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = FrontierConfig {
            balance_replenish_amount: 0,
            ..FrontierConfig::default()
        };
        let err = FrontierBuilder::new(config).build().err().unwrap();
        assert!(matches!(err, FrontierError::InvalidConfig(_)));
    }
}
