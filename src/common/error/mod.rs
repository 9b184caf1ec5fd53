//! Unified error types for cellscan.
//!
//! Every format reader reports its own error type; this module folds them
//! into one taxonomy so the extraction pipeline can classify a failure
//! without knowing which reader produced it.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
