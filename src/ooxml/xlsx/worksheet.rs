//! Worksheet part parsing.
//!
//! Walks `<sheetData>` once and keeps every non-empty cell, already typed,
//! in a sparse map. The `<drawing>` element's relationship id is captured on
//! the way so the drawing part can be found later.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use crate::common::xml::push_entity;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::sheet::CellValue;
use crate::sheet::coordinate::resolve;
use crate::sheet::date::{parse_iso_timestamp, serial_to_datetime};

use super::attr_value;
use super::shared_strings::SharedStrings;
use super::styles::Styles;

/// Context needed to type raw cell values.
pub struct CellContext<'a> {
    pub shared_strings: &'a SharedStrings,
    pub styles: &'a Styles,
    pub date1904: bool,
}

/// Cell data of one worksheet.
#[derive(Debug, Default)]
pub struct SheetData {
    /// (row, col) zero-based -> value; empty cells are absent
    pub cells: HashMap<(u32, u32), CellValue>,
    /// `r:id` of the sheet's `<drawing>` element
    pub drawing_rid: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Capture {
    None,
    Value,
    InlineText,
}

struct PendingCell {
    row: u32,
    col: u32,
    kind: Option<String>,
    style: usize,
    value: String,
    inline: String,
}

/// Parse a worksheet part.
pub fn parse_worksheet(xml: &[u8], ctx: &CellContext<'_>) -> Result<SheetData> {
    let mut reader = Reader::from_reader(xml);
    let mut data = SheetData::default();

    let mut next_row = 0u32;
    let mut next_col = 0u32;
    let mut pending: Option<PendingCell> = None;
    let mut capture = Capture::None;
    let mut in_inline = false;
    let mut phonetic_depth = 0usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"row" => start_row(e, &mut next_row, &mut next_col)?,
                b"c" => {
                    pending = Some(start_cell(e, next_row, &mut next_col)?);
                },
                b"v" if pending.is_some() => capture = Capture::Value,
                b"is" if pending.is_some() => in_inline = true,
                b"t" if in_inline && phonetic_depth == 0 => capture = Capture::InlineText,
                b"rPh" => phonetic_depth += 1,
                _ => {},
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    start_row(e, &mut next_row, &mut next_col)?;
                    next_row = next_row.saturating_add(1);
                },
                // A self-closing cell has no value, only formatting.
                b"c" => {
                    start_cell(e, next_row, &mut next_col)?;
                },
                b"drawing" => data.drawing_rid = attr_value(e, b"id")?,
                _ => {},
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"row" => next_row = next_row.saturating_add(1),
                b"c" => {
                    if let Some(cell) = pending.take() {
                        let value = finish_cell(&cell, ctx)?;
                        if !value.is_empty() {
                            data.cells.insert((cell.row, cell.col), value);
                        }
                    }
                    capture = Capture::None;
                    in_inline = false;
                },
                b"v" | b"t" => capture = Capture::None,
                b"is" => in_inline = false,
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                _ => {},
            },
            Event::Text(ref e) => {
                if let Some(target) = capture_target(&mut pending, capture) {
                    target.push_str(std::str::from_utf8(e.as_ref())?);
                }
            },
            Event::CData(ref e) => {
                if let Some(target) = capture_target(&mut pending, capture) {
                    target.push_str(std::str::from_utf8(e.as_ref())?);
                }
            },
            Event::GeneralRef(ref e) => {
                if let Some(target) = capture_target(&mut pending, capture) {
                    push_entity(target, e.as_ref());
                }
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    trace!(cells = data.cells.len(), "parsed worksheet");
    Ok(data)
}

fn capture_target(pending: &mut Option<PendingCell>, capture: Capture) -> Option<&mut String> {
    let cell = pending.as_mut()?;
    match capture {
        Capture::Value => Some(&mut cell.value),
        Capture::InlineText => Some(&mut cell.inline),
        Capture::None => None,
    }
}

// Rows without `r` follow the previous row.
fn start_row(e: &BytesStart<'_>, next_row: &mut u32, next_col: &mut u32) -> Result<()> {
    if let Some(r) = attr_value(e, b"r")? {
        let number: u32 = atoi_simd::parse(r.trim().as_bytes())
            .map_err(|_| OpcError::XmlError(format!("invalid row number {:?}", r)))?;
        *next_row = number.saturating_sub(1);
    }
    *next_col = 0;
    Ok(())
}

// Cells without `r` follow the previous cell in the row.
fn start_cell(e: &BytesStart<'_>, row: u32, next_col: &mut u32) -> Result<PendingCell> {
    let mut reference = None;
    let mut kind = None;
    let mut style = 0usize;
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"r" => reference = Some(attr.unescape_value()?.into_owned()),
            b"t" => kind = Some(attr.unescape_value()?.into_owned()),
            b"s" => style = attr.unescape_value()?.trim().parse().unwrap_or(0),
            _ => {},
        }
    }

    let (row, col) = match reference {
        Some(r) => resolve(&r)
            .map_err(|_| OpcError::XmlError(format!("invalid cell reference {:?}", r)))?
            .indices(),
        None => (row, *next_col),
    };
    *next_col = col.saturating_add(1);

    Ok(PendingCell {
        row,
        col,
        kind,
        style,
        value: String::new(),
        inline: String::new(),
    })
}

fn finish_cell(cell: &PendingCell, ctx: &CellContext<'_>) -> Result<CellValue> {
    let raw = cell.value.as_str();
    let value = match cell.kind.as_deref() {
        Some("s") => {
            let index: usize = atoi_simd::parse(raw.trim().as_bytes()).map_err(|_| {
                OpcError::XmlError(format!("invalid shared string index {:?}", raw))
            })?;
            let text = ctx.shared_strings.get(index).ok_or_else(|| {
                OpcError::XmlError(format!("shared string index {} out of range", index))
            })?;
            CellValue::text(text)
        },
        Some("inlineStr") => CellValue::text(cell.inline.as_str()),
        Some("str") | Some("e") => CellValue::text(raw),
        Some("b") => match raw.trim() {
            "" => CellValue::Empty,
            v => CellValue::Boolean(v == "1" || v.eq_ignore_ascii_case("true")),
        },
        Some("d") => match parse_iso_timestamp(raw) {
            Some(dt) => CellValue::Date(dt),
            None => CellValue::text(raw),
        },
        _ => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(CellValue::Empty);
            }
            let n: f64 = fast_float2::parse(raw)
                .map_err(|_| OpcError::XmlError(format!("invalid numeric value {:?}", raw)))?;
            if ctx.styles.is_date(cell.style) {
                serial_to_datetime(n, ctx.date1904)
                    .map(CellValue::Date)
                    .unwrap_or(CellValue::Number(n))
            } else {
                CellValue::Number(n)
            }
        },
    };
    Ok(value)
}
