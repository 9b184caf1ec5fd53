//! Spreadsheet serial dates and date number formats.
//!
//! Excel stores dates as day counts with the time of day in the fraction.
//! Whether a number *is* a date is decided only by its number format, so the
//! readers classify formats here and convert serials with the workbook's
//! date system.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use phf::phf_set;

/// Largest serial Excel accepts (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

const SECONDS_PER_DAY: i64 = 86_400;

/// Built-in number format ids that display a calendar date.
///
/// 14–17 and 22 are the locale-neutral date formats; 27–31, 34–36 and
/// 50–58 are the East Asian date formats. Time-only ids (18–21, 32, 33,
/// 45–47) are deliberately absent: they carry no calendar date.
static BUILTIN_DATE_FORMATS: phf::Set<u16> = phf_set! {
    14u16, 15u16, 16u16, 17u16, 22u16,
    27u16, 28u16, 29u16, 30u16, 31u16, 34u16, 35u16, 36u16,
    50u16, 51u16, 52u16, 53u16, 54u16, 55u16, 56u16, 57u16, 58u16,
};

/// Whether a built-in number format id is a date format.
#[inline]
pub fn is_builtin_date_format(id: u16) -> bool {
    BUILTIN_DATE_FORMATS.contains(&id)
}

/// Whether a custom format code displays a calendar date.
///
/// Only the first section (up to an unquoted `;`) is inspected. Quoted
/// literals, backslash escapes, `_x`/`*x` padding, `[...]` blocks (colours,
/// conditions, locales, elapsed time) and the `General` keyword are
/// skipped. A code is a date when it has a `y`, `d`, `e` or `g` token, or an
/// `m` token with no `h`/`s` next to it (a lone `m` after `h` or before `s`
/// means minutes).
pub fn is_date_format_code(code: &str) -> bool {
    let mut has_month = false;
    let mut has_time = false;
    let mut chars = code.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ';' => break,
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            },
            '\\' | '_' | '*' => {
                chars.next();
            },
            '[' => {
                for b in chars.by_ref() {
                    if b == ']' {
                        break;
                    }
                }
            },
            'a' | 'A' => {
                // AM/PM and A/P markers
                let rest: String = chars.clone().take(4).collect();
                if rest.eq_ignore_ascii_case("m/pm") {
                    chars.nth(3);
                    has_time = true;
                } else if rest.get(..2).is_some_and(|r| r.eq_ignore_ascii_case("/p")) {
                    chars.nth(1);
                    has_time = true;
                }
            },
            'g' | 'G' => {
                // `General` is a number keyword, not the era token
                let rest: String = chars.clone().take(6).collect();
                if rest.eq_ignore_ascii_case("eneral") {
                    chars.nth(5);
                } else {
                    return true;
                }
            },
            'e' | 'E' if matches!(chars.peek(), Some('+') | Some('-')) => {
                // scientific notation
                chars.next();
            },
            'y' | 'Y' | 'd' | 'D' | 'e' | 'E' => return true,
            'm' | 'M' => has_month = true,
            'h' | 'H' | 's' | 'S' => has_time = true,
            _ => {},
        }
    }

    has_month && !has_time
}

/// Convert a serial number to a date and time.
///
/// The 1900 system reproduces Excel's phantom 1900-02-29: serial 60 maps to
/// 1900-02-28 and serials below 60 are counted from 1899-12-31. The 1904
/// system counts from 1904-01-01. Returns `None` for negative, non-finite
/// or out-of-range serials.
pub fn serial_to_datetime(serial: f64, date1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }

    let mut days = serial.trunc() as i64;
    let mut seconds = (serial.fract() * SECONDS_PER_DAY as f64).round() as i64;
    if seconds >= SECONDS_PER_DAY {
        days += 1;
        seconds -= SECONDS_PER_DAY;
    }

    let date = if date1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)? + Duration::days(days)
    } else if days == 60 {
        NaiveDate::from_ymd_opt(1900, 2, 28)?
    } else if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)? + Duration::days(days)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)? + Duration::days(days)
    };

    date.and_hms_opt(0, 0, 0)
        .map(|midnight| midnight + Duration::seconds(seconds))
}

/// Parse an ISO-like date, optionally followed by a time of day.
///
/// Accepts `YYYY-MM-DD` and `YYYY/MM/DD` with one- or two-digit month and
/// day, then optionally `T` or a space and `HH:MM` or `HH:MM:SS`.
pub fn parse_iso_like(s: &str) -> Option<NaiveDateTime> {
    let bytes = s.as_bytes();
    if bytes.len() < 8 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let sep = bytes[4];
    if sep != b'-' && sep != b'/' {
        return None;
    }

    let (date_part, time_part) = match s.find(['T', ' ']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let mut fields = date_part.split(sep as char);
    let year = i32::try_from(parse_digits(fields.next()?, 4, 4)?).ok()?;
    let month = parse_digits(fields.next()?, 1, 2)?;
    let day = parse_digits(fields.next()?, 1, 2)?;
    if fields.next().is_some() {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let (hour, minute, second) = match time_part {
        None => (0, 0, 0),
        Some(t) => {
            let mut parts = t.split(':');
            let hour = parse_digits(parts.next()?, 1, 2)?;
            let minute = parse_digits(parts.next()?, 2, 2)?;
            let second = match parts.next() {
                Some(sec) => parse_digits(sec, 2, 2)?,
                None => 0,
            };
            if parts.next().is_some() {
                return None;
            }
            (hour, minute, second)
        },
    };
    date.and_hms_opt(hour, minute, second)
}

/// Parse an ISO-8601 timestamp such as `2023-12-25T08:15:30.000Z`.
///
/// Fractional seconds and a trailing `Z` or UTC offset are dropped; the
/// time is kept as written.
pub fn parse_iso_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let Some(split) = s.find(['T', ' ']) else {
        return parse_iso_like(s);
    };
    let (date, time) = s.split_at(split + 1);
    let end = time.find(['Z', 'z', '+', '-', '.']).unwrap_or(time.len());
    parse_iso_like(&format!("{}{}", date, &time[..end]))
}

fn parse_digits(s: &str, min: usize, max: usize) -> Option<u32> {
    let len = s.len();
    if len < min || len > max || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    atoi_simd::parse::<u32>(s.as_bytes()).ok()
}
