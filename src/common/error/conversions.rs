//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from the
//! per-format error types to the unified Error type.

use super::types::Error;
use crate::ole::xls::XlsError;
use crate::ooxml::opc::OpcError;

impl From<OpcError> for Error {
    fn from(err: OpcError) -> Self {
        match err {
            OpcError::IoError(e) => Error::Io(e),
            OpcError::PartNotFound(part) => {
                Error::UnsupportedStructure(format!("missing part {part}"))
            },
            OpcError::NotAWorkbook(s) => Error::UnsupportedStructure(s),
            other => Error::CorruptPackage(other.to_string()),
        }
    }
}

impl From<XlsError> for Error {
    fn from(err: XlsError) -> Self {
        match err {
            XlsError::Io(e) => Error::Io(e),
            XlsError::StreamNotFound(_)
            | XlsError::SheetNotFound(_)
            | XlsError::Encrypted
            | XlsError::UnsupportedBiffVersion(_) => Error::UnsupportedStructure(err.to_string()),
            other => Error::CorruptPackage(other.to_string()),
        }
    }
}
