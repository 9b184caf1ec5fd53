//! Column-aligned text table of the extracted rows.
//!
//! Columns are joined by `", "` and every column is right-padded to the
//! widest entry in it, so the separators line up in a monospace view.
//! Widths are display widths: East Asian wide and fullwidth characters take
//! two columns.

use unicode_width::UnicodeWidthStr;

use crate::pipeline::FileOutcome;
use crate::sheet::CellCoordinate;

/// Marker written in every cell of a file that could not be processed.
pub const DEFAULT_ERROR_MARKER: &str = "#ERROR";

/// Suffix appended to image-check columns in the header.
pub const IMAGE_COLUMN_SUFFIX: &str = "(画像)";

const SEPARATOR: &str = ", ";

/// Builds the result table for a fixed set of columns.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    header: Vec<String>,
    error_marker: String,
}

impl TableRenderer {
    pub fn new(target_cells: &[CellCoordinate], image_check_cells: &[CellCoordinate]) -> Self {
        let mut header = Vec::with_capacity(1 + target_cells.len() + image_check_cells.len());
        header.push("Filename".to_string());
        header.extend(target_cells.iter().map(|c| c.reference().to_string()));
        header.extend(
            image_check_cells
                .iter()
                .map(|c| format!("{}{}", c.reference(), IMAGE_COLUMN_SUFFIX)),
        );
        TableRenderer {
            header,
            error_marker: DEFAULT_ERROR_MARKER.to_string(),
        }
    }

    pub fn with_error_marker(mut self, marker: impl Into<String>) -> Self {
        self.error_marker = marker.into();
        self
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Render the header and one line per outcome, each ending in `\n`.
    pub fn render(&self, outcomes: &[FileOutcome]) -> String {
        let rows: Vec<Vec<String>> = outcomes.iter().map(|o| self.columns(o)).collect();

        let mut widths: Vec<usize> = self.header.iter().map(|h| display_width(h)).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(cell));
            }
        }

        let mut out = String::new();
        write_line(&mut out, &self.header, &widths);
        for row in &rows {
            write_line(&mut out, row, &widths);
        }
        out
    }

    fn columns(&self, outcome: &FileOutcome) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.header.len());
        columns.push(outcome.display_path().to_string());
        match outcome.row() {
            Some(row) => {
                columns.extend(row.values().iter().map(|(_, value)| value.to_string()));
                columns.extend(row.images().iter().map(|(_, p)| p.symbol().to_string()));
            },
            None => {
                columns.resize(self.header.len(), self.error_marker.clone());
            },
        }
        columns
    }
}

/// Terminal columns `text` occupies.
#[inline]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn write_line(out: &mut String, columns: &[String], widths: &[usize]) {
    for (i, (column, &width)) in columns.iter().zip(widths).enumerate() {
        if i > 0 {
            out.push_str(SEPARATOR);
        }
        out.push_str(column);
        let padding = width.saturating_sub(display_width(column));
        out.extend(std::iter::repeat_n(' ', padding));
    }
    out.push('\n');
}
