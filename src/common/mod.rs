//! Common types and utilities shared across formats.
//!
//! The error taxonomy, the structural probe and the binary field readers are
//! used by every reader variant.

// Submodule declarations
pub mod binary;
pub mod detection;
pub mod encoding;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use detection::{Container, FileFormat, probe_format};
pub use error::{Error, Result};
