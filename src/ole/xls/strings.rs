//! String structures in BIFF records.

use crate::common::encoding::decode_codepage;
use crate::ole::xls::error::{XlsError, XlsResult};
use crate::ole::xls::records::{BiffVersion, ContinuedReader, Record, record_type};

const FLAG_WIDE: u8 = 0x01;
const FLAG_PHONETIC: u8 = 0x04;
const FLAG_RICH: u8 = 0x08;

/// Width of a string's character count field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPrefix {
    U8,
    U16,
}

/// Read a one-record string starting at `offset` of `record`.
///
/// BIFF8 strings carry an option byte and may be rich or phonetic; BIFF5
/// strings are plain bytes in the workbook codepage.
pub fn read_string(
    record: &Record<'_>,
    offset: usize,
    prefix: LengthPrefix,
    version: BiffVersion,
    codepage: u16,
) -> XlsResult<String> {
    let data = record.tail(offset)?;
    let mut reader = ContinuedReader::new(record.record_type, vec![data]);
    let count = match prefix {
        LengthPrefix::U8 => reader.read_u8()? as usize,
        LengthPrefix::U16 => reader.read_u16()? as usize,
    };

    match version {
        BiffVersion::Biff8 => read_unicode_body(&mut reader, count),
        BiffVersion::Biff5 => {
            let start = match prefix {
                LengthPrefix::U8 => 1,
                LengthPrefix::U16 => 2,
            };
            let bytes = data
                .get(start..start + count)
                .ok_or_else(|| XlsError::Truncated {
                    record_type: record.record_type,
                    needed: offset + start + count,
                    found: record.data.len(),
                })?;
            Ok(decode_codepage(bytes, codepage))
        },
    }
}

// Option byte, optional run and extension sizes, characters, then the
// skipped formatting runs and extension block.
fn read_unicode_body(reader: &mut ContinuedReader<'_>, count: usize) -> XlsResult<String> {
    let flags = reader.read_u8()?;
    let runs = if flags & FLAG_RICH != 0 {
        reader.read_u16()? as usize
    } else {
        0
    };
    let ext = if flags & FLAG_PHONETIC != 0 {
        reader.read_u32()? as usize
    } else {
        0
    };
    let text = reader.read_chars(count, flags & FLAG_WIDE != 0)?;
    reader.skip(runs * 4)?;
    reader.skip(ext)?;
    Ok(text)
}

/// Parse the shared string table from an SST record and its CONTINUE records.
pub fn parse_sst(segments: Vec<&[u8]>) -> XlsResult<Vec<String>> {
    let mut reader = ContinuedReader::new(record_type::SST, segments);
    let _total = reader.read_u32()?;
    let unique = reader.read_u32()? as usize;

    // The declared count only sizes the allocation; it is not trusted.
    let mut strings = Vec::with_capacity(unique.min(65_536));
    for _ in 0..unique {
        if reader.at_end() {
            break;
        }
        let count = reader.read_u16()? as usize;
        strings.push(read_unicode_body(&mut reader, count)?);
    }
    Ok(strings)
}

/// Text for a BOOLERR/FORMULA error code.
pub fn error_literal(code: u8) -> XlsResult<&'static str> {
    Ok(match code {
        0x00 => "#NULL!",
        0x07 => "#DIV/0!",
        0x0F => "#VALUE!",
        0x17 => "#REF!",
        0x1D => "#NAME?",
        0x24 => "#NUM!",
        0x2A => "#N/A",
        0x2B => "#GETTING_DATA",
        other => {
            return Err(XlsError::InvalidRecord {
                record_type: record_type::BOOLERR,
                message: format!("unknown error code 0x{:02X}", other),
            });
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sst_body(strings: &[(&str, bool)]) -> Vec<u8> {
        let mut body = (strings.len() as u32).to_le_bytes().to_vec();
        body.extend_from_slice(&(strings.len() as u32).to_le_bytes());
        for (s, wide) in strings {
            let units: Vec<u16> = s.encode_utf16().collect();
            body.extend_from_slice(&(units.len() as u16).to_le_bytes());
            if *wide {
                body.push(FLAG_WIDE);
                body.extend(units.iter().flat_map(|u| u.to_le_bytes()));
            } else {
                body.push(0);
                body.extend(units.iter().map(|&u| u as u8));
            }
        }
        body
    }

    #[test]
    fn test_sst_compressed_and_wide() {
        let body = sst_body(&[("Name", false), ("確認済", true), ("", false)]);
        let strings = parse_sst(vec![&body]).unwrap();
        assert_eq!(strings, ["Name", "確認済", ""]);
    }

    #[test]
    fn test_sst_string_split_across_continue() {
        let body = sst_body(&[("承認者", true)]);
        // Split after the first character.
        let split = 8 + 3 + 2;
        let (first, rest) = body.split_at(split);
        let mut second = vec![FLAG_WIDE];
        second.extend_from_slice(rest);
        let strings = parse_sst(vec![first, &second]).unwrap();
        assert_eq!(strings, ["承認者"]);
    }

    #[test]
    fn test_rich_and_phonetic_blocks_are_skipped() {
        let mut body = 2u32.to_le_bytes().to_vec();
        body.extend_from_slice(&2u32.to_le_bytes());
        // "ab" with one formatting run and a 3-byte extension
        body.extend_from_slice(&2u16.to_le_bytes());
        body.push(FLAG_RICH | FLAG_PHONETIC);
        body.extend_from_slice(&1u16.to_le_bytes());
        body.extend_from_slice(&3u32.to_le_bytes());
        body.extend_from_slice(b"ab");
        body.extend_from_slice(&[0; 4]);
        body.extend_from_slice(&[0; 3]);
        body.extend_from_slice(&1u16.to_le_bytes());
        body.push(0);
        body.push(b'c');

        assert_eq!(parse_sst(vec![&body]).unwrap(), ["ab", "c"]);
    }

    #[test]
    fn test_biff5_string_uses_codepage() {
        // cch=2, "ｱｲ" in Shift_JIS half-width katakana
        let data = [0x00, 0x00, 0x02, 0x00, 0xB1, 0xB2];
        let record = Record {
            record_type: record_type::LABEL,
            data: &data,
            offset: 0,
        };
        let s = read_string(&record, 2, LengthPrefix::U16, BiffVersion::Biff5, 932).unwrap();
        assert_eq!(s, "ｱｲ");
    }

    #[test]
    fn test_error_literals() {
        assert_eq!(error_literal(0x07).unwrap(), "#DIV/0!");
        assert_eq!(error_literal(0x2A).unwrap(), "#N/A");
        assert!(error_literal(0x99).is_err());
    }
}
