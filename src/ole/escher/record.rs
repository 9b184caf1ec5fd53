//! Zero-copy Escher record.

use thiserror::Error;

use crate::common::binary::{read_u16_le, read_u32_le};

use super::types::EscherRecordType;

/// Size of every record header: ver/instance, type, length.
pub const HEADER_LEN: usize = 8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EscherError {
    #[error("escher record at offset {offset} needs {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

pub type Result<T> = std::result::Result<T, EscherError>;

/// A record borrowed from drawing data.
#[derive(Debug, Clone)]
pub struct EscherRecord<'data> {
    pub record_type: EscherRecordType,
    /// Low four bits of the first header word; 0xF marks a container
    pub version: u8,
    /// High twelve bits of the first header word
    pub instance: u16,
    /// Record body (children for containers)
    pub data: &'data [u8],
}

impl<'data> EscherRecord<'data> {
    /// Parse the record starting at `offset`, returning it and the bytes consumed.
    pub fn parse(data: &'data [u8], offset: usize) -> Result<(Self, usize)> {
        let truncated = |needed| EscherError::Truncated {
            offset,
            needed,
            available: data.len().saturating_sub(offset),
        };

        let ver_inst = read_u16_le(data, offset).map_err(|_| truncated(HEADER_LEN))?;
        let record_type = read_u16_le(data, offset + 2).map_err(|_| truncated(HEADER_LEN))?;
        let length = read_u32_le(data, offset + 4).map_err(|_| truncated(HEADER_LEN))? as usize;

        let start = offset + HEADER_LEN;
        let body = start
            .checked_add(length)
            .and_then(|end| data.get(start..end))
            .ok_or_else(|| truncated(HEADER_LEN.saturating_add(length)))?;

        Ok((
            EscherRecord {
                record_type: EscherRecordType::from_u16(record_type),
                version: (ver_inst & 0x000F) as u8,
                instance: ver_inst >> 4,
                data: body,
            },
            HEADER_LEN + length,
        ))
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        self.version == 0x0F
    }
}
