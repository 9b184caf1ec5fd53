//! Per-file index of drawing anchors.
//!
//! An index is built once for one sheet of one file, queried for each
//! image-check cell, then dropped with the reader that built it. Entries are
//! only ever added.

use std::collections::HashMap;

use super::coordinate::CellCoordinate;
use super::types::ImagePresence;

/// Number of image anchors whose top-left ("from") cell is each (row, col).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorIndex {
    counts: HashMap<(u32, u32), u32>,
}

impl AnchorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one anchored image at a zero-based (row, col).
    pub fn add(&mut self, row: u32, col: u32) {
        *self.counts.entry((row, col)).or_insert(0) += 1;
    }

    /// Number of images anchored at `coord`.
    pub fn count(&self, coord: &CellCoordinate) -> u32 {
        self.counts.get(&coord.indices()).copied().unwrap_or(0)
    }

    /// Any count of one or more is `Present`.
    pub fn presence(&self, coord: &CellCoordinate) -> ImagePresence {
        if self.count(coord) > 0 {
            ImagePresence::Present
        } else {
            ImagePresence::Absent
        }
    }

    /// Number of distinct anchored cells.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of anchored images.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

impl Extend<(u32, u32)> for AnchorIndex {
    fn extend<T: IntoIterator<Item = (u32, u32)>>(&mut self, iter: T) {
        for (row, col) in iter {
            self.add(row, col);
        }
    }
}
