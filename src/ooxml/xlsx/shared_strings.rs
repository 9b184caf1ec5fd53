//! Shared strings table for Excel files.
//!
//! Cells with `t="s"` store an index into this table. Rich text entries are
//! flattened to the concatenation of their runs; phonetic guide runs
//! (`<rPh>`) are not part of the visible text and are skipped.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::common::xml::push_entity;
use crate::ooxml::opc::error::Result;

// Pre-allocate a typical table size to reduce reallocations
const INITIAL_STRINGS_CAPACITY: usize = 1024;

/// Shared strings table.
#[derive(Debug, Default)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse `xl/sharedStrings.xml`.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut strings = Vec::with_capacity(INITIAL_STRINGS_CAPACITY);
        let mut reader = Reader::from_reader(xml);

        let mut current = String::new();
        let mut in_text = false;
        let mut phonetic_depth = 0usize;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"si" => current.clear(),
                    b"t" => in_text = phonetic_depth == 0,
                    b"rPh" => phonetic_depth += 1,
                    _ => {},
                },
                Event::Empty(ref e) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                },
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"si" => strings.push(std::mem::take(&mut current)),
                    b"t" => in_text = false,
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    _ => {},
                },
                Event::Text(ref e) if in_text => {
                    current.push_str(std::str::from_utf8(e.as_ref())?);
                },
                Event::CData(ref e) if in_text => {
                    current.push_str(std::str::from_utf8(e.as_ref())?);
                },
                Event::GeneralRef(ref e) if in_text => push_entity(&mut current, e.as_ref()),
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        Ok(SharedStrings { strings })
    }

    /// Get a string by its index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the number of strings in the table.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_rich_entries() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
  <si><t>Approved</t></si>
  <si><r><rPr><b/></rPr><t>Rich </t></r><r><t xml:space="preserve">text</t></r></si>
  <si/>
</sst>"#;
        let sst = SharedStrings::parse(xml).unwrap();
        assert_eq!(sst.len(), 3);
        assert_eq!(sst.get(0), Some("Approved"));
        assert_eq!(sst.get(1), Some("Rich text"));
        assert_eq!(sst.get(2), Some(""));
        assert_eq!(sst.get(3), None);
    }

    #[test]
    fn test_phonetic_runs_are_skipped() {
        let xml = "<sst><si><t>山田</t><rPh sb=\"0\" eb=\"2\"><t>ヤマダ</t></rPh></si></sst>";
        let sst = SharedStrings::parse(xml.as_bytes()).unwrap();
        assert_eq!(sst.get(0), Some("山田"));
    }

    #[test]
    fn test_entities_are_resolved() {
        let xml = b"<sst><si><t>R&amp;D &lt;1&gt; &#x41;</t></si></sst>";
        let sst = SharedStrings::parse(xml).unwrap();
        assert_eq!(sst.get(0), Some("R&D <1> A"));
    }
}
