//! Format-independent sheet model.
//!
//! A cell reference resolves to the same zero-based indices whatever the
//! file format; each reader maps those indices onto its own storage and
//! returns a [`CellValue`]. Readers of formats with a drawing layer also
//! build an [`AnchorIndex`] that answers image-presence queries.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cellscan::sheet::{CellSource, ReaderOptions, SheetReader, resolve};
//!
//! let mut reader = SheetReader::open("report.xlsx", &ReaderOptions::default())?;
//! println!("{}", reader.read_cell(&resolve("B2")?));
//! if let Some(index) = reader.build_anchor_index() {
//!     println!("{}", index?.presence(&resolve("D1")?));
//! }
//! # Ok::<(), cellscan::common::Error>(())
//! ```

pub mod anchor;
pub mod coordinate;
pub mod date;
pub mod reader;
pub mod text;
pub mod traits;
pub mod types;

pub use anchor::AnchorIndex;
pub use coordinate::{CellCoordinate, column_name, resolve, resolve_all};
pub use reader::{ReaderOptions, SheetReader};
pub use traits::{AnchorSource, CellSource};
pub use types::{CellValue, ImagePresence};
