//! Container record handling with iterator-based traversal.

use super::record::{EscherRecord, HEADER_LEN, Result};
use super::types::EscherRecordType;

/// Iterator over child records in an Escher container.
///
/// Stops after the first malformed record; its error is yielded once.
pub struct EscherChildIterator<'data> {
    data: &'data [u8],
    offset: usize,
    failed: bool,
}

impl<'data> EscherChildIterator<'data> {
    /// Create a new child iterator over a container body.
    #[inline]
    pub fn new(container_data: &'data [u8]) -> Self {
        Self {
            data: container_data,
            offset: 0,
            failed: false,
        }
    }
}

impl<'data> Iterator for EscherChildIterator<'data> {
    type Item = Result<EscherRecord<'data>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset + HEADER_LEN > self.data.len() {
            return None;
        }

        match EscherRecord::parse(self.data, self.offset) {
            Ok((record, consumed)) => {
                self.offset += consumed;
                Some(Ok(record))
            },
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            },
        }
    }
}

/// Escher container wrapper for convenient child access.
#[derive(Debug, Clone)]
pub struct EscherContainer<'data> {
    record: EscherRecord<'data>,
}

impl<'data> EscherContainer<'data> {
    /// Wrap an Escher record as a container.
    #[inline]
    pub fn new(record: EscherRecord<'data>) -> Self {
        debug_assert!(record.is_container(), "Record is not a container");
        Self { record }
    }

    #[inline]
    pub fn record(&self) -> &EscherRecord<'data> {
        &self.record
    }

    /// Iterate over child records.
    #[inline]
    pub fn children(&self) -> EscherChildIterator<'data> {
        EscherChildIterator::new(self.record.data)
    }
}
