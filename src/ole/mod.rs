//! Legacy OLE2-based spreadsheet formats.
//!
//! The compound file container itself is handled by the `cfb` crate; this
//! module covers the BIFF workbook stream and the Escher drawing records
//! embedded in it.

/// Escher (Office Drawing) record walker
pub mod escher;

/// Legacy Excel workbook (.xls) reader
pub mod xls;

pub use xls::{XlsError, XlsWorkbook};
