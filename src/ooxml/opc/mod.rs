/// Open Packaging Conventions (OPC) access for spreadsheet packages.
///
/// Only the read side needed to walk a workbook is provided:
///
/// - zip-backed part access (`phys_pkg`)
/// - part names and relative reference resolution (`packuri`)
/// - relationship parsing (`rel`)

pub mod constants;
pub mod error;
pub mod packuri;
pub mod phys_pkg;
pub mod rel;

// Re-export commonly used types
pub use error::OpcError;
pub use packuri::PackURI;
pub use phys_pkg::PhysPkgReader;
pub use rel::{Relationship, Relationships};
