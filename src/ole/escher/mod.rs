//! OfficeArt (Escher) drawing records.
//!
//! Excel stores the shapes of a sheet as Escher records split across
//! MSODRAWING records. This module walks the reassembled record tree and
//! reports which cells pictures are anchored to.

pub mod container;
pub mod parser;
pub mod record;
pub mod shape;
pub mod types;

pub use container::EscherContainer;
pub use parser::EscherParser;
pub use record::{EscherError, EscherRecord};
pub use shape::{CellAnchor, EscherShape, EscherShapeType};
pub use types::EscherRecordType;
