//! Picture anchors of an XLS worksheet.

use crate::ole::escher::EscherParser;
use crate::ole::xls::error::XlsResult;
use crate::sheet::AnchorIndex;

/// Index the top-left cell of every picture in a sheet's drawing data.
pub fn anchor_index(drawing: &[u8]) -> XlsResult<AnchorIndex> {
    let mut index = AnchorIndex::new();
    if drawing.is_empty() {
        return Ok(index);
    }
    index.extend(
        EscherParser::new(drawing)
            .picture_anchors()?
            .into_iter()
            .map(|anchor| (anchor.row1, anchor.col1)),
    );
    Ok(index)
}
