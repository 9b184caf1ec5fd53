//! Common types for spreadsheet operations.

use std::fmt;

use chrono::NaiveDateTime;

/// Types of data a requested cell can hold.
///
/// `Display` gives the canonical rendering used in the result table, so the
/// same logical value renders identically whichever format it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank or missing cell
    Empty,
    /// Text, including spreadsheet error literals such as `#DIV/0!`
    Text(String),
    /// Any number that is not date-formatted
    Number(f64),
    /// A date-formatted number, or a date-like CSV field
    Date(NaiveDateTime),
    /// Boolean value
    Boolean(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text value, treating an empty string as an empty cell.
    pub fn text<S: Into<String>>(s: S) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

/// Largest magnitude at which every integer is exactly representable.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write_number(f, *n),
            CellValue::Date(dt) => write!(f, "{}", dt.format("%Y/%m/%d")),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
        }
    }
}

/// Whether an image-check cell has an embedded image anchored on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImagePresence {
    Present,
    Absent,
    /// The format has no drawing layer (CSV).
    Unsupported,
}

impl ImagePresence {
    /// Symbol written to the result table.
    pub fn symbol(self) -> &'static str {
        match self {
            ImagePresence::Present => "○",
            ImagePresence::Absent => "×",
            ImagePresence::Unsupported => "-",
        }
    }
}

impl fmt::Display for ImagePresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
