//! Cell value decoding for XLS files

use crate::sheet::CellValue;
use crate::sheet::date::{is_builtin_date_format, is_date_format_code, serial_to_datetime};

use super::strings::error_literal;
use super::error::XlsResult;

/// Number formats of the workbook, resolved per XF record.
#[derive(Debug, Default)]
pub struct CellFormats {
    /// Indexed by XF record position
    date_xfs: Vec<bool>,
    pub date1904: bool,
}

impl CellFormats {
    /// Classify XF records given their format ids and the custom FORMAT codes.
    pub fn new(
        xf_format_ids: &[u16],
        custom: &std::collections::HashMap<u16, String>,
        date1904: bool,
    ) -> Self {
        let date_xfs = xf_format_ids
            .iter()
            .map(|id| match custom.get(id) {
                Some(code) => is_date_format_code(code),
                None => is_builtin_date_format(*id),
            })
            .collect();
        CellFormats { date_xfs, date1904 }
    }

    pub fn is_date(&self, xf: u16) -> bool {
        self.date_xfs.get(xf as usize).copied().unwrap_or(false)
    }

    /// A numeric cell value, as a date when its format displays one.
    pub fn number(&self, value: f64, xf: u16) -> CellValue {
        if self.is_date(xf)
            && let Some(dt) = serial_to_datetime(value, self.date1904)
        {
            return CellValue::Date(dt);
        }
        CellValue::Number(value)
    }
}

/// Convert RK value to f64
///
/// Bit 1 selects a 30-bit signed integer over the top 30 bits of an IEEE
/// double; bit 0 divides the result by 100.
pub fn rk_to_f64(rk: u32) -> f64 {
    let d100 = (rk & 0x01) != 0;
    let is_int = (rk & 0x02) != 0;

    let value = if is_int {
        ((rk as i32) >> 2) as f64
    } else {
        f64::from_bits(((rk & 0xFFFF_FFFC) as u64) << 32)
    };

    if d100 { value / 100.0 } else { value }
}

/// Cached result stored in a FORMULA record.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    /// The text follows in a STRING record
    String,
    Bool(bool),
    Error(&'static str),
    EmptyString,
}

/// Decode the 8-byte result field of a FORMULA record.
pub fn formula_value(result: [u8; 8]) -> XlsResult<FormulaValue> {
    if result[6] != 0xFF || result[7] != 0xFF {
        return Ok(FormulaValue::Number(f64::from_le_bytes(result)));
    }
    Ok(match result[0] {
        0x00 => FormulaValue::String,
        0x01 => FormulaValue::Bool(result[2] != 0),
        0x02 => FormulaValue::Error(error_literal(result[2])?),
        _ => FormulaValue::EmptyString,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_rk_integers() {
        assert_eq!(rk_to_f64((42 << 2) | 0x02), 42.0);
        assert_eq!(rk_to_f64((12345 << 2) | 0x03), 123.45);
        assert_eq!(rk_to_f64(((-7i32 << 2) as u32) | 0x02), -7.0);
    }

    #[test]
    fn test_rk_floats() {
        let bits = 1.5f64.to_bits();
        let rk = (bits >> 32) as u32 & 0xFFFF_FFFC;
        assert_eq!(rk_to_f64(rk), 1.5);
        assert_eq!(rk_to_f64(rk | 0x01), 0.015);
    }

    #[test]
    fn test_formula_results() {
        assert_eq!(
            formula_value(2.5f64.to_le_bytes()).unwrap(),
            FormulaValue::Number(2.5)
        );
        assert_eq!(
            formula_value([0x00, 0, 0, 0, 0, 0, 0xFF, 0xFF]).unwrap(),
            FormulaValue::String
        );
        assert_eq!(
            formula_value([0x01, 0, 1, 0, 0, 0, 0xFF, 0xFF]).unwrap(),
            FormulaValue::Bool(true)
        );
        assert_eq!(
            formula_value([0x02, 0, 0x07, 0, 0, 0, 0xFF, 0xFF]).unwrap(),
            FormulaValue::Error("#DIV/0!")
        );
        assert_eq!(
            formula_value([0x03, 0, 0, 0, 0, 0, 0xFF, 0xFF]).unwrap(),
            FormulaValue::EmptyString
        );
    }

    #[test]
    fn test_date_formats() {
        let mut custom = HashMap::new();
        custom.insert(164, "yyyy\"年\"m\"月\"d\"日\"".to_string());
        custom.insert(165, "0.00".to_string());
        let formats = CellFormats::new(&[0, 14, 164, 165, 21], &custom, false);

        assert_eq!(formats.number(45383.0, 0), CellValue::Number(45383.0));
        let expected = NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(formats.number(45383.0, 1), CellValue::Date(expected));
        assert_eq!(formats.number(45383.0, 2), CellValue::Date(expected));
        assert_eq!(formats.number(45383.0, 3), CellValue::Number(45383.0));
        assert_eq!(formats.number(0.5, 4), CellValue::Number(0.5));
        assert_eq!(formats.number(1.0, 200), CellValue::Number(1.0));
    }
}
