//! Excel (.xlsx) spreadsheet support.
//!
//! Reads one worksheet of an Office Open XML workbook: typed cell values and
//! the cells pictures are anchored to.
//!
//! ```rust,no_run
//! use cellscan::ooxml::xlsx::Workbook;
//! use cellscan::sheet::resolve;
//!
//! let mut workbook = Workbook::open("report.xlsx", None)?;
//! println!("{}", workbook.read_cell(&resolve("B2")?));
//! let anchors = workbook.build_anchor_index()?;
//! println!("{:?}", anchors.presence(&resolve("D1")?));
//! # Ok::<(), cellscan::common::Error>(())
//! ```

mod drawing;
mod shared_strings;
mod styles;
mod workbook;
mod worksheet;


use quick_xml::events::BytesStart;

use crate::ooxml::opc::error::Result;

pub use drawing::parse_drawing;
pub use shared_strings::SharedStrings;
pub use styles::Styles;
pub use workbook::{Workbook, WorkbookInfo, WorksheetInfo};

/// Unescaped value of the attribute whose local name is `name`.
///
/// Prefixes are ignored, so `b"id"` matches `r:id`.
pub(crate) fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
