//! A whole run: locate, extract, render.

use tracing::info;

use crate::common::Result;
use crate::config::Config;
use crate::locator::FileLocator;
use crate::render::TableRenderer;

use super::{ExtractionPlan, FileOutcome};

/// Everything a run produced.
#[derive(Debug)]
pub struct ScanReport {
    /// One outcome per located file, in path order
    pub outcomes: Vec<FileOutcome>,
    /// The rendered table
    pub table: String,
}

impl ScanReport {
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

/// Run the configured scan and render its table.
///
/// # Errors
///
/// Only run-level problems, such as a missing target directory, are
/// returned; a file that cannot be processed is a failed outcome instead.
pub fn scan(config: &Config) -> Result<ScanReport> {
    info!(target_dir = %config.target_dir.display(), "scan started");
    let locator = FileLocator::new(&config.target_dir, config.search_keyword.as_str())?;
    let files = locator.locate();
    info!(count = files.len(), "files found");

    let plan = ExtractionPlan {
        target_cells: config.target_cells.clone(),
        image_check_cells: config.image_check_cells.clone(),
        options: config.reader_options(),
    };
    let outcomes = plan.run(&files, config.parallel);

    let table = TableRenderer::new(&config.target_cells, &config.image_check_cells)
        .with_error_marker(config.error_marker.as_str())
        .render(&outcomes);

    Ok(ScanReport { outcomes, table })
}
