//! Execution engine.
//!
//! Provides sequential check execution and result aggregation.

pub mod result;
pub mod runner;
