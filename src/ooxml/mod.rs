//! Office Open XML spreadsheet support.
//!
//! 1. **OPC Layer** (`opc`): zip access, part names and relationships
//! 2. **SpreadsheetML** (`xlsx`): workbook, worksheet, styles, shared strings
//!    and drawing parts
pub mod opc;
pub mod xlsx;

pub use opc::{OpcError, PackURI};
pub use xlsx::Workbook;
