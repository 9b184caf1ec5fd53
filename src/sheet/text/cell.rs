//! Auto-typing of delimited text fields.

use crate::sheet::CellValue;
use crate::sheet::date::parse_iso_like;

/// Type a raw field the way a spreadsheet would on import.
///
/// An empty field is an empty cell. Surrounding whitespace is ignored for
/// detection, but text values keep it.
pub fn infer_value(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }

    let trimmed = raw.trim();
    if is_plain_number(trimmed)
        && let Ok(n) = fast_float2::parse::<f64, _>(trimmed)
    {
        return CellValue::Number(n);
    }
    if let Some(dt) = parse_iso_like(trimmed) {
        return CellValue::Date(dt);
    }
    CellValue::Text(raw.to_string())
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`
///
/// Narrower than what `fast_float2` accepts, so `inf`, `NaN`, `1.` and
/// `.5` stay text.
fn is_plain_number(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return false;
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_numbers() {
        assert_eq!(infer_value("42"), CellValue::Number(42.0));
        assert_eq!(infer_value("-3.25"), CellValue::Number(-3.25));
        assert_eq!(infer_value(" 7 "), CellValue::Number(7.0));
        assert_eq!(infer_value("1.5e3"), CellValue::Number(1500.0));
    }

    #[test]
    fn test_ambiguous_numbers_stay_text() {
        for raw in ["1,000", "12abc", "NaN", "inf", ".5", "1.", "0x1F", "1e"] {
            assert_eq!(infer_value(raw), CellValue::Text(raw.to_string()), "{raw}");
        }
    }

    #[test]
    fn test_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(infer_value("2024-04-01"), CellValue::Date(expected));
        assert_eq!(infer_value("2024/4/1"), CellValue::Date(expected));
        assert_eq!(
            infer_value("2024-13-01"),
            CellValue::Text("2024-13-01".to_string())
        );
    }

    #[test]
    fn test_empty_and_text() {
        assert_eq!(infer_value(""), CellValue::Empty);
        assert_eq!(infer_value("  "), CellValue::Text("  ".to_string()));
        assert_eq!(infer_value("確定"), CellValue::Text("確定".to_string()));
    }
}
