//! Workbook implementation for XLS files

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

use tracing::debug;

use crate::ole::xls::cell::CellFormats;
use crate::ole::xls::drawing::anchor_index;
use crate::ole::xls::error::{XlsError, XlsResult};
use crate::ole::xls::records::{BiffVersion, Record, RecordIter, record_type as rt};
use crate::ole::xls::strings::{LengthPrefix, parse_sst, read_string};
use crate::ole::xls::worksheet::{SheetContext, XlsWorksheet};
use crate::sheet::{AnchorIndex, CellCoordinate, CellValue};

/// Codepage Excel assumes when the workbook declares none.
const DEFAULT_CODEPAGE: u16 = 1252;

/// BOUNDSHEET entry: a sheet's name and the stream offset of its BOF.
#[derive(Debug, Clone)]
pub struct BoundSheet {
    pub name: String,
    pub position: usize,
}

/// Workbook globals: everything before the first sheet substream.
#[derive(Debug)]
pub struct WorkbookGlobals {
    pub version: BiffVersion,
    pub codepage: u16,
    pub sheets: Vec<BoundSheet>,
    pub shared_strings: Vec<String>,
    pub formats: CellFormats,
    pub active_sheet: usize,
}

impl WorkbookGlobals {
    /// Parse the globals substream at the start of `stream`.
    pub fn parse(stream: &[u8]) -> XlsResult<Self> {
        let mut records = RecordIter::new(stream);
        let bof = match records.next() {
            Some(record) => record?,
            None => {
                return Err(XlsError::InvalidRecord {
                    record_type: rt::BOF,
                    message: "empty workbook stream".to_string(),
                });
            },
        };
        if bof.record_type != rt::BOF {
            return Err(XlsError::InvalidRecord {
                record_type: bof.record_type,
                message: "workbook stream does not start with BOF".to_string(),
            });
        }
        let version = BiffVersion::from_bof(&bof)?;

        let mut codepage = DEFAULT_CODEPAGE;
        let mut date1904 = false;
        let mut active_sheet = 0usize;
        let mut sheets = Vec::new();
        let mut custom_formats = HashMap::new();
        let mut xf_format_ids = Vec::new();
        let mut sst: Option<Vec<Record<'_>>> = None;
        let mut shared_strings = Vec::new();

        for record in records {
            let record = record?;

            // SST continues until the first non-CONTINUE record.
            if let Some(parts) = sst.as_mut() {
                if record.record_type == rt::CONTINUE {
                    parts.push(record);
                    continue;
                }
                shared_strings = parse_sst(parts.iter().map(|r| r.data).collect())?;
                sst = None;
            }

            match record.record_type {
                rt::FILEPASS => return Err(XlsError::Encrypted),
                rt::CODEPAGE => codepage = record.u16_at(0)?,
                rt::DATEMODE => date1904 = record.u16_at(0)? == 1,
                rt::WINDOW1 => active_sheet = record.u16_at(10)? as usize,
                rt::FORMAT => {
                    let id = record.u16_at(0)?;
                    let prefix = match version {
                        BiffVersion::Biff8 => LengthPrefix::U16,
                        BiffVersion::Biff5 => LengthPrefix::U8,
                    };
                    let code = read_string(&record, 2, prefix, version, codepage)?;
                    custom_formats.insert(id, code);
                },
                rt::XF => xf_format_ids.push(record.u16_at(2)?),
                rt::SST => sst = Some(vec![record]),
                rt::BOUNDSHEET => {
                    // Only worksheets and macro sheets hold cells; the
                    // index still counts every sheet for WINDOW1.
                    let position = record.u32_at(0)? as usize;
                    let name = read_string(&record, 6, LengthPrefix::U8, version, codepage)?;
                    sheets.push(BoundSheet { name, position });
                },
                rt::EOF => break,
                _ => {},
            }
        }

        if let Some(parts) = sst {
            shared_strings = parse_sst(parts.iter().map(|r| r.data).collect())?;
        }

        Ok(WorkbookGlobals {
            version,
            codepage,
            sheets,
            shared_strings,
            formats: CellFormats::new(&xf_format_ids, &custom_formats, date1904),
            active_sheet,
        })
    }

    /// Pick the sheet by name, or the active sheet when no name is given.
    pub fn select(&self, name: Option<&str>) -> XlsResult<&BoundSheet> {
        match name {
            Some(name) => self
                .sheets
                .iter()
                .find(|sheet| sheet.name == name)
                .ok_or_else(|| XlsError::SheetNotFound(name.to_string())),
            None => self
                .sheets
                .get(self.active_sheet)
                .or_else(|| self.sheets.first())
                .ok_or_else(|| XlsError::SheetNotFound("(workbook has no sheets)".to_string())),
        }
    }
}

/// One worksheet of a legacy .xls workbook, loaded for cell lookup.
#[derive(Debug)]
pub struct XlsWorkbook {
    sheet_name: String,
    cells: HashMap<(u32, u32), CellValue>,
    drawing: Vec<u8>,
}

impl XlsWorkbook {
    /// Open a workbook from a file path.
    ///
    /// `sheet` selects a worksheet by name; without it the active sheet is used.
    pub fn open<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> XlsResult<Self> {
        Self::from_bytes(std::fs::read(path)?, sheet)
    }

    /// Open a workbook held in memory.
    pub fn from_bytes(data: Vec<u8>, sheet: Option<&str>) -> XlsResult<Self> {
        let stream = read_workbook_stream(data)?;
        let globals = WorkbookGlobals::parse(&stream)?;
        let selected = globals.select(sheet)?;

        let ctx = SheetContext {
            version: globals.version,
            codepage: globals.codepage,
            shared_strings: &globals.shared_strings,
            formats: &globals.formats,
        };
        let parsed = XlsWorksheet::parse(&stream, selected.position, &ctx)?;

        debug!(
            sheet = %selected.name,
            version = ?globals.version,
            cells = parsed.cells.len(),
            "loaded worksheet"
        );

        Ok(XlsWorkbook {
            sheet_name: selected.name.clone(),
            cells: parsed.cells,
            drawing: parsed.drawing,
        })
    }

    /// Name of the loaded worksheet.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Value at `coord`; cells outside the used range are empty.
    pub fn read_cell(&self, coord: &CellCoordinate) -> CellValue {
        self.cells
            .get(&coord.indices())
            .cloned()
            .unwrap_or(CellValue::Empty)
    }

    /// Top-left cells of the pictures placed on the worksheet.
    pub fn build_anchor_index(&self) -> XlsResult<AnchorIndex> {
        anchor_index(&self.drawing)
    }
}

/// Read the BIFF stream out of the compound file.
///
/// BIFF8 writes it as `Workbook`, BIFF5 as `Book`.
fn read_workbook_stream(data: Vec<u8>) -> XlsResult<Vec<u8>> {
    let mut compound = cfb::CompoundFile::open(Cursor::new(data))
        .map_err(|e| XlsError::Container(e.to_string()))?;

    let name = ["/Workbook", "/Book"]
        .into_iter()
        .find(|name| compound.is_stream(name))
        .ok_or(XlsError::StreamNotFound("Workbook"))?;

    let mut stream = Vec::new();
    compound.open_stream(name)?.read_to_end(&mut stream)?;
    Ok(stream)
}
