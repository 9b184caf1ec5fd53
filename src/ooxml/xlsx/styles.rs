//! Cell formats from `xl/styles.xml`.
//!
//! Only the part that decides whether a numeric cell is a date is read: the
//! custom number formats and the `cellXfs` list a cell's `s` attribute
//! indexes into.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ooxml::opc::error::Result;
use crate::sheet::date::{is_builtin_date_format, is_date_format_code};

use super::attr_value;

/// Date classification of every cell format in the workbook.
#[derive(Debug, Default)]
pub struct Styles {
    /// Indexed by cell format (`xf`) position
    date_xfs: Vec<bool>,
}

impl Styles {
    /// Parse `xl/styles.xml`.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut custom_formats: HashMap<u16, String> = HashMap::new();
        let mut xf_format_ids: Vec<u16> = Vec::new();
        let mut in_cell_xfs = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                // `<cellXfs/>` closes itself and holds no formats.
                Event::Start(ref e) if e.local_name().as_ref() == b"cellXfs" => {
                    in_cell_xfs = true;
                },
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"numFmt" => {
                        let id = attr_value(e, b"numFmtId")?.and_then(|v| v.parse().ok());
                        let code = attr_value(e, b"formatCode")?;
                        if let (Some(id), Some(code)) = (id, code) {
                            custom_formats.insert(id, code);
                        }
                    },
                    b"xf" if in_cell_xfs => xf_format_ids.push(num_fmt_id(e)?),
                    _ => {},
                },
                Event::End(ref e) if e.local_name().as_ref() == b"cellXfs" => {
                    in_cell_xfs = false;
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        let date_xfs = xf_format_ids
            .into_iter()
            .map(|id| match custom_formats.get(&id) {
                Some(code) => is_date_format_code(code),
                None => is_builtin_date_format(id),
            })
            .collect();

        Ok(Styles { date_xfs })
    }

    /// Whether cell format `xf_index` displays numbers as dates.
    pub fn is_date(&self, xf_index: usize) -> bool {
        self.date_xfs.get(xf_index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.date_xfs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.date_xfs.is_empty()
    }
}

fn num_fmt_id(e: &BytesStart<'_>) -> Result<u16> {
    Ok(attr_value(e, b"numFmtId")?
        .and_then(|v| v.parse().ok())
        .unwrap_or(0))
}
