//! Error taxonomy shared by the resolver, the format readers and the pipeline.
use thiserror::Error;

/// Main error type for cellscan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A cell reference did not match `letters digits` with a row of at least 1.
    #[error("invalid cell reference: {0:?}")]
    InvalidReference(String),

    /// The container could not be opened as the expected archive or markup.
    #[error("corrupt package: {0}")]
    CorruptPackage(String),

    /// The container opened but a required part or stream is missing.
    #[error("unsupported structure: {0}")]
    UnsupportedStructure(String),

    /// Unterminated quoting or a line with too many fields.
    #[error("malformed CSV at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },

    /// The file extension promised one container but the bytes hold another.
    #[error("extension .{extension} does not match detected {detected} content")]
    FormatMismatch {
        extension: String,
        detected: &'static str,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration rejected during validation.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for cellscan operations.
pub type Result<T> = std::result::Result<T, Error>;
