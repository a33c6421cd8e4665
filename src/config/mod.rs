//! Configuration model for the frontier.

pub mod frontier;

pub use frontier::FrontierConfig;
