//! Capabilities a sheet reader offers.
//!
//! Every reader can look up a cell. Only readers whose format has a drawing
//! layer can index picture anchors; CSV implements [`CellSource`] alone.

use crate::common::Result;
use crate::ole::xls::XlsWorkbook;
use crate::ooxml::xlsx::Workbook;

use super::anchor::AnchorIndex;
use super::coordinate::CellCoordinate;
use super::text::CsvSheet;
use super::types::CellValue;

/// Read access to the cells of one loaded sheet.
pub trait CellSource {
    /// Value at `coord`. A blank or out-of-range cell is `CellValue::Empty`.
    fn read_cell(&self, coord: &CellCoordinate) -> CellValue;
}

/// A sheet that can carry embedded pictures.
pub trait AnchorSource: CellSource {
    /// Index the top-left cell of every picture on the sheet.
    ///
    /// Called at most once per file; the index is owned by the caller.
    fn build_anchor_index(&mut self) -> Result<AnchorIndex>;
}

impl CellSource for Workbook {
    fn read_cell(&self, coord: &CellCoordinate) -> CellValue {
        Workbook::read_cell(self, coord)
    }
}

impl AnchorSource for Workbook {
    fn build_anchor_index(&mut self) -> Result<AnchorIndex> {
        Ok(Workbook::build_anchor_index(self)?)
    }
}

impl CellSource for XlsWorkbook {
    fn read_cell(&self, coord: &CellCoordinate) -> CellValue {
        XlsWorkbook::read_cell(self, coord)
    }
}

impl AnchorSource for XlsWorkbook {
    fn build_anchor_index(&mut self) -> Result<AnchorIndex> {
        Ok(XlsWorkbook::build_anchor_index(self)?)
    }
}

impl CellSource for CsvSheet {
    fn read_cell(&self, coord: &CellCoordinate) -> CellValue {
        CsvSheet::read_cell(self, coord)
    }
}
