//! BIFF record stream handling.
//!
//! A workbook stream is a flat sequence of records, each a little-endian
//! type and length followed by the body. The workbook globals come first,
//! then one substream per sheet, each opened by BOF and closed by EOF.

use crate::common::binary::{read_f64_le, read_u16_le, read_u32_le};
use crate::ole::xls::error::{XlsError, XlsResult};

/// Record type identifiers.
pub mod record_type {
    pub const FORMULA: u16 = 0x0006;
    pub const EOF: u16 = 0x000A;
    pub const DATEMODE: u16 = 0x0022;
    pub const FILEPASS: u16 = 0x002F;
    pub const CONTINUE: u16 = 0x003C;
    pub const WINDOW1: u16 = 0x003D;
    pub const CODEPAGE: u16 = 0x0042;
    pub const BOUNDSHEET: u16 = 0x0085;
    pub const MULRK: u16 = 0x00BD;
    pub const MULBLANK: u16 = 0x00BE;
    pub const RSTRING: u16 = 0x00D6;
    pub const XF: u16 = 0x00E0;
    pub const MSODRAWING: u16 = 0x00EC;
    pub const SST: u16 = 0x00FC;
    pub const LABELSST: u16 = 0x00FD;
    pub const BLANK: u16 = 0x0201;
    pub const NUMBER: u16 = 0x0203;
    pub const LABEL: u16 = 0x0204;
    pub const BOOLERR: u16 = 0x0205;
    pub const STRING: u16 = 0x0207;
    pub const RK: u16 = 0x027E;
    pub const FORMAT: u16 = 0x041E;
    pub const BOF: u16 = 0x0809;
}

/// A record borrowed from the workbook stream.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub record_type: u16,
    pub data: &'a [u8],
    /// Stream offset of the record header
    pub offset: usize,
}

impl Record<'_> {
    fn truncated(&self, needed: usize) -> XlsError {
        XlsError::Truncated {
            record_type: self.record_type,
            needed,
            found: self.data.len(),
        }
    }

    pub fn u8_at(&self, offset: usize) -> XlsResult<u8> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(offset + 1))
    }

    pub fn u16_at(&self, offset: usize) -> XlsResult<u16> {
        read_u16_le(self.data, offset).map_err(|_| self.truncated(offset + 2))
    }

    pub fn u32_at(&self, offset: usize) -> XlsResult<u32> {
        read_u32_le(self.data, offset).map_err(|_| self.truncated(offset + 4))
    }

    pub fn f64_at(&self, offset: usize) -> XlsResult<f64> {
        read_f64_le(self.data, offset).map_err(|_| self.truncated(offset + 8))
    }

    /// Body from `offset` on.
    pub fn tail(&self, offset: usize) -> XlsResult<&[u8]> {
        self.data.get(offset..).ok_or_else(|| self.truncated(offset))
    }
}

/// Iterator over BIFF records in a stream
pub struct RecordIter<'a> {
    stream: &'a [u8],
    pos: usize,
}

impl<'a> RecordIter<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self::at(stream, 0)
    }

    /// Start at a stream offset, such as a sheet's BOF position.
    pub fn at(stream: &'a [u8], pos: usize) -> Self {
        RecordIter { stream, pos }
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = XlsResult<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        // Streams are padded to the sector size; trailing bytes too short
        // for a header are not a record.
        let header = self.stream.get(self.pos..self.pos + 4)?;
        let record_type = u16::from_le_bytes([header[0], header[1]]);
        let len = u16::from_le_bytes([header[2], header[3]]) as usize;

        let start = self.pos + 4;
        let Some(data) = self.stream.get(start..start + len) else {
            let found = self.stream.len().saturating_sub(start);
            self.pos = self.stream.len();
            return Some(Err(XlsError::Truncated {
                record_type,
                needed: len,
                found,
            }));
        };

        let record = Record {
            record_type,
            data,
            offset: self.pos,
        };
        self.pos = start + len;
        Some(Ok(record))
    }
}

/// BIFF versions supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiffVersion {
    /// Excel 5.0 and 95: 8-bit strings in the workbook codepage
    Biff5,
    /// Excel 97 and later: Unicode strings and a shared string table
    Biff8,
}

impl BiffVersion {
    /// Version from a BOF record body.
    pub fn from_bof(record: &Record<'_>) -> XlsResult<Self> {
        match record.u16_at(0)? {
            0x0600 => Ok(BiffVersion::Biff8),
            0x0500 => Ok(BiffVersion::Biff5),
            other => Err(XlsError::UnsupportedBiffVersion(other)),
        }
    }
}

/// Reads a byte sequence spread over a record and its CONTINUE records.
///
/// Unicode character data that crosses into a CONTINUE record restarts
/// there with a fresh option byte, so `read_chars` re-reads the
/// compression flag at every boundary.
pub struct ContinuedReader<'a> {
    record_type: u16,
    segments: Vec<&'a [u8]>,
    segment: usize,
    pos: usize,
}

impl<'a> ContinuedReader<'a> {
    pub fn new(record_type: u16, segments: Vec<&'a [u8]>) -> Self {
        ContinuedReader {
            record_type,
            segments,
            segment: 0,
            pos: 0,
        }
    }

    fn exhausted(&self, needed: usize) -> XlsError {
        XlsError::Truncated {
            record_type: self.record_type,
            needed,
            found: self.segments.iter().map(|s| s.len()).sum(),
        }
    }

    // Move past finished segments; false at the end of all data.
    fn settle(&mut self) -> bool {
        while let Some(current) = self.segments.get(self.segment) {
            if self.pos < current.len() {
                return true;
            }
            self.segment += 1;
            self.pos = 0;
        }
        false
    }

    /// Whether all data has been consumed.
    pub fn at_end(&mut self) -> bool {
        !self.settle()
    }

    pub fn read_u8(&mut self) -> XlsResult<u8> {
        if !self.settle() {
            return Err(self.exhausted(1));
        }
        let byte = self.segments[self.segment][self.pos];
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> XlsResult<u16> {
        Ok(u16::from_le_bytes([self.read_u8()?, self.read_u8()?]))
    }

    pub fn read_u32(&mut self) -> XlsResult<u32> {
        let lo = self.read_u16()? as u32;
        let hi = self.read_u16()? as u32;
        Ok(lo | (hi << 16))
    }

    pub fn skip(&mut self, mut count: usize) -> XlsResult<()> {
        while count > 0 {
            if !self.settle() {
                return Err(self.exhausted(count));
            }
            let available = self.segments[self.segment].len() - self.pos;
            let step = available.min(count);
            self.pos += step;
            count -= step;
        }
        Ok(())
    }

    /// Read `count` characters, 16-bit when `wide`, otherwise 8-bit.
    ///
    /// 8-bit characters in BIFF8 are UTF-16 code units with the high byte
    /// dropped.
    pub fn read_chars(&mut self, count: usize, mut wide: bool) -> XlsResult<String> {
        let mut units: Vec<u16> = Vec::with_capacity(count);
        let mut crossed = false;

        while units.len() < count {
            let Some(current) = self.segments.get(self.segment) else {
                return Err(self.exhausted(count));
            };
            if self.pos >= current.len() {
                self.segment += 1;
                self.pos = 0;
                crossed = true;
                continue;
            }
            if crossed {
                wide = self.segments[self.segment][self.pos] & 0x01 != 0;
                self.pos += 1;
                crossed = false;
                continue;
            }

            let current = self.segments[self.segment];
            if wide {
                if self.pos + 1 >= current.len() {
                    return Err(self.exhausted(count * 2));
                }
                units.push(u16::from_le_bytes([current[self.pos], current[self.pos + 1]]));
                self.pos += 2;
            } else {
                units.push(current[self.pos] as u16);
                self.pos += 1;
            }
        }

        Ok(String::from_utf16_lossy(&units))
    }
}
