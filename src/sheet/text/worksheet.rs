//! A CSV file held as a grid of raw fields.

use std::path::Path;

use tracing::debug;

use crate::common::encoding::decode_text;
use crate::common::{Error, Result};
use crate::sheet::{CellCoordinate, CellValue};

use super::cell::infer_value;
use super::config::TextConfig;
use super::parser::TextParser;

/// A parsed delimited text file.
///
/// The whole file is parsed when opened, so malformed input is reported
/// before any cell is read.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    rows: Vec<Vec<String>>,
}

impl CsvSheet {
    /// Read and parse a file from disk.
    pub fn open<P: AsRef<Path>>(path: P, config: &TextConfig) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes, config)
    }

    /// Parse raw file content.
    ///
    /// A byte order mark overrides `config.encoding`.
    pub fn from_bytes(bytes: &[u8], config: &TextConfig) -> Result<Self> {
        let text = decode_text(bytes, config.encoding);
        Self::from_text(&text, config)
    }

    /// Parse already decoded text.
    pub fn from_text(text: &str, config: &TextConfig) -> Result<Self> {
        let mut parser = TextParser::new(text, config);
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut limit = None;

        loop {
            let line = parser.line();
            let Some(row) = parser.parse_row() else {
                break;
            };
            let row = row?;

            match limit {
                None => {
                    limit = config
                        .max_extra_fields
                        .map(|extra| row.len().saturating_add(extra));
                },
                Some(max) if row.len() > max => {
                    return Err(Error::MalformedCsv {
                        line,
                        reason: format!("{} fields, at most {} allowed", row.len(), max),
                    });
                },
                Some(_) => {},
            }
            rows.push(row);
        }

        debug!(rows = rows.len(), "parsed delimited text");
        Ok(Self { rows })
    }

    /// Value at `coord`; anything beyond the file's extent is empty.
    pub fn read_cell(&self, coord: &CellCoordinate) -> CellValue {
        let (row, col) = coord.indices();
        self.rows
            .get(row as usize)
            .and_then(|fields| fields.get(col as usize))
            .map(|raw| infer_value(raw))
            .unwrap_or(CellValue::Empty)
    }

    /// Number of records, blank lines included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
