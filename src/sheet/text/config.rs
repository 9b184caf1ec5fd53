//! Configuration for delimited text input.

use encoding_rs::Encoding;

/// Configuration for parsing delimited text files
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Field delimiter character
    pub delimiter: u8,
    /// Quote character for quoted fields
    pub quote: u8,
    /// Encoding used when the file carries no byte order mark
    pub encoding: &'static Encoding,
    /// How many fields a record may carry beyond the first record's count.
    /// `None` accepts any length.
    pub max_extra_fields: Option<usize>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            encoding: encoding_rs::UTF_8,
            max_extra_fields: None,
        }
    }
}

impl TextConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Reject records longer than the first one by more than `extra` fields
    pub fn with_max_extra_fields(mut self, extra: Option<usize>) -> Self {
        self.max_extra_fields = extra;
        self
    }
}
