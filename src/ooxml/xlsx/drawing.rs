//! Picture anchors in a drawing part.
//!
//! A picture is placed by a `twoCellAnchor` or `oneCellAnchor` whose
//! `<xdr:from>` names the top-left cell. Pictures inside a group shape count
//! at their group's anchor. `absoluteAnchor` has no cell and is ignored, and
//! so is the `mc:Fallback` branch of alternate content, which repeats the
//! preferred `mc:Choice`.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::ooxml::opc::error::{OpcError, Result};
use crate::sheet::AnchorIndex;

#[derive(Debug, Default)]
struct AnchorState {
    row: Option<u32>,
    col: Option<u32>,
    has_picture: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FromField {
    None,
    Row,
    Col,
}

/// Collect the top-left cell of every picture anchor.
pub fn parse_drawing(xml: &[u8]) -> Result<AnchorIndex> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut index = AnchorIndex::new();
    let mut anchor: Option<AnchorState> = None;
    let mut in_from = false;
    let mut field = FromField::None;
    let mut fallback_depth = 0usize;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?;

        if fallback_depth > 0 {
            match event {
                Event::Start(ref e) if e.local_name().as_ref() == b"Fallback" => {
                    fallback_depth += 1
                },
                Event::End(ref e) if e.local_name().as_ref() == b"Fallback" => {
                    fallback_depth -= 1
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
            continue;
        }

        match event {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"twoCellAnchor" | b"oneCellAnchor" => anchor = Some(AnchorState::default()),
                b"from" if anchor.is_some() => in_from = true,
                b"row" if in_from => field = FromField::Row,
                b"col" if in_from => field = FromField::Col,
                b"pic" => mark_picture(&mut anchor),
                b"Fallback" => fallback_depth = 1,
                _ => {},
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"pic" => mark_picture(&mut anchor),
            Event::Text(ref e) if field != FromField::None => {
                let text = std::str::from_utf8(e.as_ref())?;
                let value: u32 = atoi_simd::parse(text.trim().as_bytes()).map_err(|_| {
                    OpcError::XmlError(format!("invalid anchor position {:?}", text))
                })?;
                if let Some(state) = anchor.as_mut() {
                    match field {
                        FromField::Row => state.row = Some(value),
                        FromField::Col => state.col = Some(value),
                        FromField::None => {},
                    }
                }
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"twoCellAnchor" | b"oneCellAnchor" => {
                    if let Some(AnchorState {
                        row: Some(row),
                        col: Some(col),
                        has_picture: true,
                    }) = anchor.take()
                    {
                        index.add(row, col);
                    }
                    in_from = false;
                },
                b"from" => in_from = false,
                b"row" | b"col" => field = FromField::None,
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    Ok(index)
}

fn mark_picture(anchor: &mut Option<AnchorState>) {
    if let Some(state) = anchor.as_mut() {
        state.has_picture = true;
    }
}
