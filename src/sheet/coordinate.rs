//! Cell references.
//!
//! `resolve` turns a human reference such as `B2` into zero-based
//! (row, column) indices. The resolution is the same for every file format:
//! `A1` is always `(0, 0)`.

use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

/// A validated cell reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellCoordinate {
    /// Normalised reference, uppercase (`"B2"`)
    reference: String,
    /// Zero-based row index
    row: u32,
    /// Zero-based column index
    col: u32,
}

impl CellCoordinate {
    /// Build a coordinate from zero-based indices.
    pub fn from_indices(row: u32, col: u32) -> Result<Self> {
        let row_number = row
            .checked_add(1)
            .ok_or_else(|| Error::InvalidReference(format!("row index {}", row)))?;
        Ok(Self {
            reference: format!("{}{}", column_name(col), row_number),
            row,
            col,
        })
    }

    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// `(row, col)` pair, zero-based.
    #[inline]
    pub fn indices(&self) -> (u32, u32) {
        (self.row, self.col)
    }

    /// Normalised reference text.
    #[inline]
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for CellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference)
    }
}

impl FromStr for CellCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        resolve(s)
    }
}

/// Resolve a reference of one or more letters followed by one or more digits.
///
/// Letters are matched case-insensitively. The row number is one-based and
/// must be at least 1. Anything else, including surrounding whitespace, is
/// `Error::InvalidReference`.
///
/// # Examples
///
/// ```
/// use cellscan::sheet::coordinate::resolve;
/// assert_eq!(resolve("b2").unwrap().indices(), (1, 1));
/// assert_eq!(resolve("AA10").unwrap().indices(), (9, 26));
/// assert!(resolve("A0").is_err());
/// ```
pub fn resolve(reference: &str) -> Result<CellCoordinate> {
    let invalid = || Error::InvalidReference(reference.to_string());
    let bytes = reference.as_bytes();

    let letters = bytes.iter().take_while(|b| b.is_ascii_alphabetic()).count();
    if letters == 0 || letters == bytes.len() {
        return Err(invalid());
    }
    let digits = &bytes[letters..];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let mut col_number: u32 = 0;
    for &byte in &bytes[..letters] {
        let value = u32::from(byte.to_ascii_uppercase() - b'A' + 1);
        col_number = col_number
            .checked_mul(26)
            .and_then(|n| n.checked_add(value))
            .ok_or_else(invalid)?;
    }

    let row_number: u32 = atoi_simd::parse(digits).map_err(|_| invalid())?;
    if row_number == 0 {
        return Err(invalid());
    }

    Ok(CellCoordinate {
        reference: format!(
            "{}{}",
            reference[..letters].to_ascii_uppercase(),
            row_number
        ),
        row: row_number - 1,
        col: col_number - 1,
    })
}

/// Column letters for a zero-based index (0 → `A`, 26 → `AA`).
pub fn column_name(mut col: u32) -> String {
    let mut letters = Vec::with_capacity(3);
    loop {
        letters.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Resolve a list of references, failing on the first invalid one.
pub fn resolve_all<I, S>(references: I) -> Result<Vec<CellCoordinate>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    references.into_iter().map(|r| resolve(r.as_ref())).collect()
}
