//! Per-file results.

use thiserror::Error;

use crate::common::Error;
use crate::sheet::{CellCoordinate, CellValue, ImagePresence};

/// Values and image checks read from one file, in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRow {
    display_path: String,
    values: Vec<(CellCoordinate, CellValue)>,
    images: Vec<(CellCoordinate, ImagePresence)>,
}

impl ExtractedRow {
    pub fn new(display_path: impl Into<String>) -> Self {
        ExtractedRow {
            display_path: display_path.into(),
            values: Vec::new(),
            images: Vec::new(),
        }
    }

    pub(crate) fn push_value(&mut self, coord: &CellCoordinate, value: CellValue) {
        self.values.push((coord.clone(), value));
    }

    pub(crate) fn push_image(&mut self, coord: &CellCoordinate, presence: ImagePresence) {
        self.images.push((coord.clone(), presence));
    }

    /// Row key: the file's path relative to the traversal root.
    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    pub fn values(&self) -> &[(CellCoordinate, CellValue)] {
        &self.values
    }

    pub fn images(&self) -> &[(CellCoordinate, ImagePresence)] {
        &self.images
    }
}

/// A file that could not be processed.
#[derive(Debug, Error)]
#[error("{display_path}: {source}")]
pub struct FileProcessingError {
    pub display_path: String,
    pub source: Error,
}

/// Outcome of one file: a row of values, or the reason there is none.
#[derive(Debug)]
pub enum FileOutcome {
    Extracted(ExtractedRow),
    Failed(FileProcessingError),
}

impl FileOutcome {
    pub fn display_path(&self) -> &str {
        match self {
            FileOutcome::Extracted(row) => row.display_path(),
            FileOutcome::Failed(err) => &err.display_path,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed(_))
    }

    pub fn row(&self) -> Option<&ExtractedRow> {
        match self {
            FileOutcome::Extracted(row) => Some(row),
            FileOutcome::Failed(_) => None,
        }
    }
}

impl From<Result<ExtractedRow, FileProcessingError>> for FileOutcome {
    fn from(result: Result<ExtractedRow, FileProcessingError>) -> Self {
        match result {
            Ok(row) => FileOutcome::Extracted(row),
            Err(err) => FileOutcome::Failed(err),
        }
    }
}
