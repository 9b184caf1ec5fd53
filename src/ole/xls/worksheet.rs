//! Worksheet substream parsing for XLS files

use std::collections::HashMap;

use tracing::trace;

use crate::ole::xls::cell::{CellFormats, FormulaValue, formula_value, rk_to_f64};
use crate::ole::xls::error::{XlsError, XlsResult};
use crate::ole::xls::records::{BiffVersion, Record, RecordIter, record_type as rt};
use crate::ole::xls::strings::{LengthPrefix, error_literal, read_string};
use crate::sheet::CellValue;

/// Workbook-level data the cell records refer to.
pub struct SheetContext<'a> {
    pub version: BiffVersion,
    pub codepage: u16,
    pub shared_strings: &'a [String],
    pub formats: &'a CellFormats,
}

/// Values and drawing data of one worksheet.
#[derive(Debug, Default)]
pub struct XlsWorksheet {
    /// (row, col) zero-based -> value; empty cells are absent
    pub cells: HashMap<(u32, u32), CellValue>,
    /// MSODRAWING bodies and their CONTINUE records, concatenated
    pub drawing: Vec<u8>,
}

impl XlsWorksheet {
    /// Parse the substream whose BOF record is at `position`.
    ///
    /// Substreams of embedded charts are skipped.
    pub fn parse(stream: &[u8], position: usize, ctx: &SheetContext<'_>) -> XlsResult<Self> {
        let mut sheet = XlsWorksheet::default();
        let mut depth = 0usize;
        let mut previous = 0u16;
        let mut pending_string: Option<(u32, u32)> = None;

        for record in RecordIter::at(stream, position) {
            let record = record?;
            let kind = record.record_type;

            match kind {
                rt::BOF => depth += 1,
                rt::EOF => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                },
                _ if depth != 1 => {},
                rt::MSODRAWING => sheet.drawing.extend_from_slice(record.data),
                rt::CONTINUE if previous == rt::MSODRAWING => {
                    sheet.drawing.extend_from_slice(record.data)
                },
                rt::STRING => {
                    if let Some((row, col)) = pending_string.take() {
                        let text = read_string(
                            &record,
                            0,
                            LengthPrefix::U16,
                            ctx.version,
                            ctx.codepage,
                        )?;
                        sheet.insert(row, col, CellValue::text(text));
                    }
                },
                _ => {
                    if let Some(pending) = sheet.cell_record(&record, ctx)? {
                        pending_string = Some(pending);
                    }
                },
            }

            // A CONTINUE of a drawing may itself be continued.
            if !(kind == rt::CONTINUE && previous == rt::MSODRAWING) {
                previous = kind;
            }
        }

        if depth != 0 {
            return Err(XlsError::InvalidRecord {
                record_type: rt::EOF,
                message: "worksheet substream ends without EOF".to_string(),
            });
        }

        trace!(
            cells = sheet.cells.len(),
            drawing_bytes = sheet.drawing.len(),
            "parsed worksheet substream"
        );
        Ok(sheet)
    }

    fn insert(&mut self, row: u32, col: u32, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    // Returns the cell a string-valued formula is waiting to fill.
    fn cell_record(
        &mut self,
        record: &Record<'_>,
        ctx: &SheetContext<'_>,
    ) -> XlsResult<Option<(u32, u32)>> {
        let kind = record.record_type;
        if !matches!(
            kind,
            rt::NUMBER
                | rt::RK
                | rt::MULRK
                | rt::LABELSST
                | rt::LABEL
                | rt::RSTRING
                | rt::BOOLERR
                | rt::FORMULA
        ) {
            return Ok(None);
        }

        let row = record.u16_at(0)? as u32;
        let col = record.u16_at(2)? as u32;
        let xf = record.u16_at(4)?;

        match kind {
            rt::NUMBER => {
                let value = ctx.formats.number(record.f64_at(6)?, xf);
                self.insert(row, col, value);
            },
            rt::RK => {
                let value = ctx.formats.number(rk_to_f64(record.u32_at(6)?), xf);
                self.insert(row, col, value);
            },
            rt::MULRK => {
                // row, first column, (xf, rk) pairs, last column
                let pairs = record.data.len().saturating_sub(6) / 6;
                for i in 0..pairs {
                    let offset = 4 + i * 6;
                    let xf = record.u16_at(offset)?;
                    let value = ctx.formats.number(rk_to_f64(record.u32_at(offset + 2)?), xf);
                    self.insert(row, col + i as u32, value);
                }
            },
            rt::LABELSST => {
                let index = record.u32_at(6)? as usize;
                let text = ctx.shared_strings.get(index).ok_or_else(|| {
                    XlsError::InvalidRecord {
                        record_type: kind,
                        message: format!("shared string index {} out of range", index),
                    }
                })?;
                self.insert(row, col, CellValue::text(text.as_str()));
            },
            rt::LABEL | rt::RSTRING => {
                let text = read_string(record, 6, LengthPrefix::U16, ctx.version, ctx.codepage)?;
                self.insert(row, col, CellValue::text(text));
            },
            rt::BOOLERR => {
                let value = record.u8_at(6)?;
                let cell = if record.u8_at(7)? != 0 {
                    CellValue::Text(error_literal(value)?.to_string())
                } else {
                    CellValue::Boolean(value != 0)
                };
                self.insert(row, col, cell);
            },
            rt::FORMULA => {
                let mut result = [0u8; 8];
                result.copy_from_slice(record.tail(6)?.get(..8).ok_or(XlsError::Truncated {
                    record_type: kind,
                    needed: 14,
                    found: record.data.len(),
                })?);
                match formula_value(result)? {
                    FormulaValue::Number(n) => self.insert(row, col, ctx.formats.number(n, xf)),
                    FormulaValue::Bool(b) => self.insert(row, col, CellValue::Boolean(b)),
                    FormulaValue::Error(e) => self.insert(row, col, CellValue::Text(e.to_string())),
                    FormulaValue::EmptyString => self.insert(row, col, CellValue::Empty),
                    FormulaValue::String => return Ok(Some((row, col))),
                }
            },
            _ => {},
        }
        Ok(None)
    }
}
