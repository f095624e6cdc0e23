//! Application layer - Use cases and orchestration.
//!
//! Services here orchestrate domain logic over the domain ports (traits)
//! rather than concrete implementations, so tests can substitute fakes.

pub mod services;

pub use services::{QueryProcessor, RetrievalService};
