//! Per-file extraction.
//!
//! Each file is opened with the reader its structure calls for, the target
//! cells are read in configuration order, and the image-check cells are
//! answered from an anchor index built once for the file. Files share no
//! state, so a run may process them on the rayon pool; results are collected
//! in discovery order either way.
//!
//! A file that cannot be processed becomes a [`FileOutcome::Failed`] and the
//! run goes on.

mod row;
mod scan;


use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, error};

use crate::common::Result;
use crate::locator::LocatedFile;
use crate::sheet::{CellCoordinate, CellSource, ImagePresence, ReaderOptions, SheetReader};

pub use row::{ExtractedRow, FileOutcome, FileProcessingError};
pub use scan::{ScanReport, scan};

/// Read the target cells and image-check cells of one file.
///
/// # Errors
///
/// `FileProcessingError` wrapping whatever prevented the file from being
/// opened, or its drawing from being read.
pub fn process(
    path: &Path,
    display_path: &str,
    target_cells: &[CellCoordinate],
    image_check_cells: &[CellCoordinate],
    options: &ReaderOptions,
) -> std::result::Result<ExtractedRow, FileProcessingError> {
    extract(path, display_path, target_cells, image_check_cells, options).map_err(|source| {
        FileProcessingError {
            display_path: display_path.to_string(),
            source,
        }
    })
}

fn extract(
    path: &Path,
    display_path: &str,
    target_cells: &[CellCoordinate],
    image_check_cells: &[CellCoordinate],
    options: &ReaderOptions,
) -> Result<ExtractedRow> {
    let mut reader = SheetReader::open(path, options)?;
    let mut row = ExtractedRow::new(display_path);

    for coord in target_cells {
        row.push_value(coord, reader.read_cell(coord));
    }

    if image_check_cells.is_empty() {
        return Ok(row);
    }
    match reader.build_anchor_index().transpose()? {
        Some(index) => {
            debug!(
                path = display_path,
                anchored_cells = index.len(),
                pictures = index.total(),
                "built anchor index"
            );
            for coord in image_check_cells {
                row.push_image(coord, index.presence(coord));
            }
        },
        None => {
            for coord in image_check_cells {
                row.push_image(coord, ImagePresence::Unsupported);
            }
        },
    }
    Ok(row)
}

/// The cells to read from every file of a run.
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    pub target_cells: Vec<CellCoordinate>,
    pub image_check_cells: Vec<CellCoordinate>,
    pub options: ReaderOptions,
}

impl ExtractionPlan {
    /// Process one located file.
    pub fn process(&self, file: &LocatedFile) -> FileOutcome {
        let result = process(
            &file.path,
            &file.display_path,
            &self.target_cells,
            &self.image_check_cells,
            &self.options,
        );
        match &result {
            Ok(_) => debug!(path = %file.display_path, "processed file"),
            Err(e) => error!(path = %file.display_path, error = %e.source, "failed to process file"),
        }
        result.into()
    }

    /// Process every file, returning outcomes in the order given.
    pub fn run(&self, files: &[LocatedFile], parallel: bool) -> Vec<FileOutcome> {
        if parallel {
            files.par_iter().map(|file| self.process(file)).collect()
        } else {
            files.iter().map(|file| self.process(file)).collect()
        }
    }
}
