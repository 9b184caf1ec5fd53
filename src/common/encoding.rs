//! Character decoding for legacy codepages and CSV input.
//!
//! BIFF8 stores "compressed" strings as single bytes in the workbook's
//! CODEPAGE; CSV files arrive in whatever encoding the configuration names.
//! Both go through `encoding_rs`.

use encoding_rs::Encoding;

use crate::common::{Error, Result};

/// Map a Windows codepage identifier to an `encoding_rs` encoding.
///
/// Only codepages that appear in CODEPAGE records written by Excel are
/// listed. Codepage 1200 (UTF-16LE) is handled by the BIFF string reader
/// itself and never reaches this function.
pub fn codepage_to_encoding(codepage: u16) -> Option<&'static Encoding> {
    match codepage {
        // ANSI codepages
        874 => Some(encoding_rs::WINDOWS_874),
        1250 => Some(encoding_rs::WINDOWS_1250),
        1251 => Some(encoding_rs::WINDOWS_1251),
        1252 => Some(encoding_rs::WINDOWS_1252),
        1253 => Some(encoding_rs::WINDOWS_1253),
        1254 => Some(encoding_rs::WINDOWS_1254),
        1255 => Some(encoding_rs::WINDOWS_1255),
        1256 => Some(encoding_rs::WINDOWS_1256),
        1257 => Some(encoding_rs::WINDOWS_1257),
        1258 => Some(encoding_rs::WINDOWS_1258),
        // DBCS codepages
        932 => Some(encoding_rs::SHIFT_JIS),
        936 => Some(encoding_rs::GBK),
        949 => Some(encoding_rs::EUC_KR),
        950 => Some(encoding_rs::BIG5),
        // Mac codepages
        10000 | 32768 => Some(encoding_rs::MACINTOSH),
        10001 => Some(encoding_rs::SHIFT_JIS),
        // 367 is US-ASCII, 32769 is the BIFF "ANSI Latin I" alias
        367 | 32769 => Some(encoding_rs::WINDOWS_1252),
        65001 => Some(encoding_rs::UTF_8),
        _ => None,
    }
}

/// Decode single-byte BIFF string data with the workbook codepage.
///
/// Unknown codepages fall back to Windows-1252, which is what Excel assumes
/// for workbooks without a CODEPAGE record.
pub fn decode_codepage(bytes: &[u8], codepage: u16) -> String {
    let encoding = codepage_to_encoding(codepage).unwrap_or(encoding_rs::WINDOWS_1252);
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Resolve a WHATWG encoding label such as `utf-8` or `shift_jis`.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::Config(format!("unknown text encoding {:?}", label)))
}

/// Decode a whole text file.
///
/// A byte order mark overrides the configured encoding and is removed.
/// Malformed sequences become U+FFFD rather than failing the file.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
