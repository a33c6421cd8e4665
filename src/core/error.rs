//! Error types for frontier operations.

use thiserror::Error;

/// Errors produced by frontier components.
#[derive(Debug, Error)]
pub enum FrontierError {
    /// Shutdown was signaled and no dispatchable work remains.
    #[error("frontier ended: no remaining work after shutdown")]
    Ended,
    /// A cost policy name could not be resolved. Fatal at configuration time.
    #[error("unknown cost policy: {0}")]
    UnknownCostPolicy(String),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
