//! File format detection.
//!
//! Detection is based on file signatures (magic numbers), reading only the
//! first few bytes of the file.

// Submodule declarations
pub mod functions;
pub mod types;
pub mod utils;

// Re-exports
pub use functions::{detect_container, detect_container_from_bytes, probe_format};
pub use types::{Container, FileFormat};
