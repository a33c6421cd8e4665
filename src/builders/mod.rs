//! Fluent construction of a [`crate::core::Frontier`].

pub mod frontier_builder;

pub use frontier_builder::FrontierBuilder;
