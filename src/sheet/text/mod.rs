//! Delimited text (CSV) input.
//!
//! A CSV file is a single sheet: field N of record N maps to column N, row N
//! of a cell reference. Fields are auto-typed the way a spreadsheet types
//! them on import, and CSV has no way to host an embedded image.
//!
//! # Example
//!
//! ```
//! use cellscan::sheet::text::{CsvSheet, TextConfig};
//! use cellscan::sheet::{CellValue, resolve};
//!
//! let sheet = CsvSheet::from_text("name,qty\nwidget,3\n", &TextConfig::default())?;
//! assert_eq!(sheet.read_cell(&resolve("B2")?), CellValue::Number(3.0));
//! assert_eq!(sheet.read_cell(&resolve("Z9")?), CellValue::Empty);
//! # Ok::<(), cellscan::common::Error>(())
//! ```

mod cell;
mod config;
mod parser;
mod worksheet;


pub use cell::infer_value;
pub use config::TextConfig;
pub use parser::TextParser;
pub use worksheet::CsvSheet;
