//! Error types for XLS file parsing

use std::fmt;

use crate::ole::escher::EscherError;

/// Result type alias for XLS operations
pub type XlsResult<T> = Result<T, XlsError>;

/// Errors that can occur during XLS file parsing
#[derive(Debug)]
pub enum XlsError {
    /// I/O error
    Io(std::io::Error),
    /// The file is not a readable compound file
    Container(String),
    /// Neither a `Workbook` nor a `Book` stream exists
    StreamNotFound(&'static str),
    /// Requested worksheet does not exist
    SheetNotFound(String),
    /// The workbook is protected by a FILEPASS record
    Encrypted,
    /// BIFF versions before BIFF5
    UnsupportedBiffVersion(u16),
    /// Record shorter than its fields require
    Truncated {
        record_type: u16,
        needed: usize,
        found: usize,
    },
    /// Invalid BIFF record
    InvalidRecord {
        /// Record type
        record_type: u16,
        /// Error description
        message: String,
    },
    /// Malformed drawing data
    Drawing(EscherError),
}

impl fmt::Display for XlsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XlsError::Io(e) => write!(f, "I/O error: {}", e),
            XlsError::Container(msg) => write!(f, "Not a compound file: {}", msg),
            XlsError::StreamNotFound(name) => write!(f, "Stream '{}' not found", name),
            XlsError::SheetNotFound(name) => write!(f, "Worksheet '{}' not found", name),
            XlsError::Encrypted => write!(f, "Workbook is password protected"),
            XlsError::UnsupportedBiffVersion(version) => {
                write!(f, "Unsupported BIFF version: 0x{:04X}", version)
            },
            XlsError::Truncated {
                record_type,
                needed,
                found,
            } => write!(
                f,
                "Record 0x{:04X} truncated: needs {} bytes, found {}",
                record_type, needed, found
            ),
            XlsError::InvalidRecord {
                record_type,
                message,
            } => {
                write!(f, "Invalid record 0x{:04X}: {}", record_type, message)
            },
            XlsError::Drawing(e) => write!(f, "Invalid drawing: {}", e),
        }
    }
}

impl std::error::Error for XlsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XlsError::Io(e) => Some(e),
            XlsError::Drawing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for XlsError {
    fn from(err: std::io::Error) -> Self {
        XlsError::Io(err)
    }
}

impl From<EscherError> for XlsError {
    fn from(err: EscherError) -> Self {
        XlsError::Drawing(err)
    }
}
