//! cellscan - collect cell values and seal images from spreadsheet files
//!
//! Walks a directory tree for `.xlsx`, `.xls` and `.csv` files whose names
//! contain a keyword, reads a configured set of cells from each, checks a
//! second set of cells for an anchored picture, and renders one aligned text
//! row per file.
//!
//! # Features
//!
//! - **Format sniffing**: the extension must agree with the container (zip,
//!   OLE2 or plain text); a mismatch fails the file instead of guessing
//! - **Typed values**: text, numbers, dates (with the workbook's date system)
//!   and booleans render identically whichever format they came from
//! - **Image anchoring**: pictures count at the top-left cell of their anchor,
//!   from DrawingML parts in xlsx and Escher records in xls
//! - **Fault isolation**: a file that cannot be read becomes an error row;
//!   the rest of the run continues
//!
//! # Example
//!
//! ```no_run
//! use cellscan::config::Config;
//! use cellscan::pipeline::scan;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("config.toml")?;
//! let report = scan(&config)?;
//! std::fs::write(&config.output_path, &report.table)?;
//! println!("{} files, {} failed", report.processed(), report.failed());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading one file
//!
//! ```no_run
//! use cellscan::sheet::{CellSource, ReaderOptions, SheetReader, resolve};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut reader = SheetReader::open("申請書.xls", &ReaderOptions::default())?;
//! let seal = resolve("D1")?;
//! println!("{}", reader.read_cell(&resolve("B2")?));
//! if let Some(index) = reader.build_anchor_index() {
//!     println!("seal: {}", index?.presence(&seal));
//! }
//! # Ok(())
//! # }
//! ```

/// Shared error taxonomy, structural probe and binary helpers
pub mod common;

/// Run configuration
pub mod config;

/// Directory traversal
pub mod locator;

/// Legacy OLE2-based workbooks (.xls)
pub mod ole;

/// Office Open XML workbooks (.xlsx)
pub mod ooxml;

/// Per-file extraction and whole-run orchestration
pub mod pipeline;

/// Aligned text output
pub mod render;

/// Format-independent cell model and reader variants
pub mod sheet;

#[cfg(test)]
pub(crate) mod test_support;

pub use common::{Error, Result};
pub use config::Config;
pub use pipeline::{ExtractedRow, FileOutcome, ScanReport, scan};
pub use sheet::{CellCoordinate, CellValue, ImagePresence, resolve};
