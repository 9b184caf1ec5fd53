//! Legacy Excel (.xls) file format reader
//!
//! Reads one worksheet of a BIFF5 or BIFF8 workbook stored in an OLE2
//! compound file: typed cell values, and the cells pictures in the sheet's
//! drawing are anchored to.

mod cell;
mod drawing;
mod error;
mod records;
mod strings;
mod workbook;
mod worksheet;


pub use cell::rk_to_f64;
pub use error::{XlsError, XlsResult};
pub use workbook::{BoundSheet, WorkbookGlobals, XlsWorkbook};
