//! Excel workbook (.xlsx) reader.
//!
//! Opening a workbook resolves the package relationships down to a single
//! worksheet and loads its cells. The sheet's drawing is only parsed when
//! image anchors are requested.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use crate::ooxml::opc::constants::{DEFAULT_WORKBOOK_PART, relationship_type as rt};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PACKAGE_URI;
use crate::ooxml::opc::{PackURI, PhysPkgReader, Relationships};
use crate::sheet::{AnchorIndex, CellCoordinate, CellValue};

use super::attr_value;
use super::drawing::parse_drawing;
use super::shared_strings::SharedStrings;
use super::styles::Styles;
use super::worksheet::{CellContext, parse_worksheet};

/// Sheet entry from `<sheets>` in workbook.xml
#[derive(Debug, Clone)]
pub struct WorksheetInfo {
    /// Worksheet name
    pub name: String,
    /// Relationship ID for the worksheet
    pub relationship_id: String,
}

/// Workbook-level settings from workbook.xml.
#[derive(Debug, Default)]
pub struct WorkbookInfo {
    pub sheets: Vec<WorksheetInfo>,
    /// Index of the sheet shown when the file is opened
    pub active_tab: usize,
    /// Serial dates count from 1904-01-01
    pub date1904: bool,
}

impl WorkbookInfo {
    /// Parse workbook.xml.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut info = WorkbookInfo::default();
        let mut seen_view = false;
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"sheet" => {
                        let name = attr_value(e, b"name")?;
                        let relationship_id = attr_value(e, b"id")?;
                        if let (Some(name), Some(relationship_id)) = (name, relationship_id) {
                            info.sheets.push(WorksheetInfo {
                                name,
                                relationship_id,
                            });
                        }
                    },
                    b"workbookPr" => {
                        info.date1904 = attr_value(e, b"date1904")?
                            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
                    },
                    // Only the first view decides the active sheet.
                    b"workbookView" if !seen_view => {
                        seen_view = true;
                        info.active_tab = attr_value(e, b"activeTab")?
                            .and_then(|v| v.trim().parse().ok())
                            .unwrap_or(0);
                    },
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }
        Ok(info)
    }

    /// Pick the sheet by name, or the active sheet when no name is given.
    pub fn select(&self, name: Option<&str>) -> Result<&WorksheetInfo> {
        match name {
            Some(name) => self
                .sheets
                .iter()
                .find(|sheet| sheet.name == name)
                .ok_or_else(|| OpcError::NotAWorkbook(format!("no sheet named {:?}", name))),
            None => {
                let last = self
                    .sheets
                    .len()
                    .checked_sub(1)
                    .ok_or_else(|| OpcError::NotAWorkbook("workbook has no sheets".into()))?;
                Ok(&self.sheets[self.active_tab.min(last)])
            },
        }
    }
}

/// One worksheet of an .xlsx package, loaded for cell lookup.
pub struct Workbook {
    package: PhysPkgReader,
    sheet_name: String,
    cells: HashMap<(u32, u32), CellValue>,
    drawing: Option<PackURI>,
}

impl Workbook {
    /// Open a workbook from a file path.
    ///
    /// `sheet` selects a worksheet by name; without it the active sheet is used.
    pub fn open<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<Self> {
        let package = PhysPkgReader::open(path)?;
        Self::from_package(package, sheet)
    }

    /// Open a workbook held in memory.
    pub fn from_bytes(data: Vec<u8>, sheet: Option<&str>) -> Result<Self> {
        Self::from_package(PhysPkgReader::from_bytes(data)?, sheet)
    }

    fn from_package(mut package: PhysPkgReader, sheet: Option<&str>) -> Result<Self> {
        let root = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let workbook_uri = match package
            .relationships_of(&root)?
            .first_of_type(rt::OFFICE_DOCUMENT)
        {
            Some(rel) => rel.target_partname()?,
            None => PackURI::new(DEFAULT_WORKBOOK_PART).map_err(OpcError::InvalidPackUri)?,
        };
        if !package.contains(&workbook_uri) {
            return Err(OpcError::NotAWorkbook(format!(
                "no workbook part at {}",
                workbook_uri
            )));
        }

        let info = WorkbookInfo::parse(&package.blob_for(&workbook_uri)?)?;
        let workbook_rels = package.relationships_of(&workbook_uri)?;
        let selected = info.select(sheet)?;
        let sheet_rel = workbook_rels.get(&selected.relationship_id).ok_or_else(|| {
            OpcError::InvalidRelationship(format!(
                "sheet {:?} refers to missing relationship {}",
                selected.name, selected.relationship_id
            ))
        })?;
        // Chart sheets and dialog sheets have no cell grid.
        if !sheet_rel.is_type(rt::WORKSHEET) {
            return Err(OpcError::NotAWorkbook(format!(
                "sheet {:?} is not a worksheet ({})",
                selected.name,
                sheet_rel.reltype()
            )));
        }
        let sheet_uri = sheet_rel.target_partname()?;

        let shared_strings = match optional_part(&mut package, &workbook_rels, rt::SHARED_STRINGS)? {
            Some(xml) => SharedStrings::parse(&xml)?,
            None => SharedStrings::default(),
        };
        let styles = match optional_part(&mut package, &workbook_rels, rt::STYLES)? {
            Some(xml) => Styles::parse(&xml)?,
            None => Styles::default(),
        };

        let ctx = CellContext {
            shared_strings: &shared_strings,
            styles: &styles,
            date1904: info.date1904,
        };
        let data = parse_worksheet(&package.blob_for(&sheet_uri)?, &ctx)?;

        let drawing = match data.drawing_rid {
            Some(rid) => {
                let sheet_rels = package.relationships_of(&sheet_uri)?;
                match sheet_rels.get(&rid) {
                    Some(rel) if rel.is_type(rt::DRAWING) && !rel.is_external() => {
                        Some(rel.target_partname()?)
                    },
                    _ => None,
                }
            },
            None => None,
        };

        debug!(
            sheet = %selected.name,
            part = %sheet_uri,
            cells = data.cells.len(),
            has_drawing = drawing.is_some(),
            "loaded worksheet"
        );

        Ok(Workbook {
            sheet_name: selected.name.clone(),
            package,
            cells: data.cells,
            drawing,
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
    pub fn build_anchor_index(&mut self) -> Result<AnchorIndex> {
        let Some(uri) = self.drawing.as_ref() else {
            return Ok(AnchorIndex::new());
        };
        match self.package.blob_for(uri) {
            Ok(xml) => parse_drawing(&xml),
            // A dangling drawing relationship places nothing.
            Err(OpcError::PartNotFound(_)) => Ok(AnchorIndex::new()),
            Err(e) => Err(e),
        }
    }
}

fn optional_part(
    package: &mut PhysPkgReader,
    rels: &Relationships,
    reltype: &str,
) -> Result<Option<Vec<u8>>> {
    let Some(rel) = rels.first_of_type(reltype) else {
        return Ok(None);
    };
    match package.blob_for(&rel.target_partname()?) {
        Ok(xml) => Ok(Some(xml)),
        Err(OpcError::PartNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
