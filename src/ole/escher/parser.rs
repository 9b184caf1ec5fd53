//! Escher drawing traversal.
//!
//! An Excel sheet's drawing is a DgContainer holding one top-level
//! SpgrContainer. Its children are shape containers, each anchored to cells
//! by a ClientAnchor, or nested group containers whose first shape carries
//! the group's anchor. Shapes inside a group only have child anchors, so a
//! grouped picture is located at its outermost group's cells.

use super::container::EscherContainer;
use super::record::{EscherRecord, Result};
use super::shape::{CellAnchor, EscherShape};
use super::types::EscherRecordType;

/// Escher parser over the drawing data of one sheet.
pub struct EscherParser<'data> {
    data: &'data [u8],
}

impl<'data> EscherParser<'data> {
    #[inline]
    pub fn new(data: &'data [u8]) -> Self {
        Self { data }
    }

    /// The first record, when it is a container.
    pub fn root_container(&self) -> Option<Result<EscherContainer<'data>>> {
        if self.data.len() < 8 {
            return None;
        }

        match EscherRecord::parse(self.data, 0) {
            Ok((record, _)) if record.is_container() => Some(Ok(EscherContainer::new(record))),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        }
    }

    /// Anchors of every picture in the drawing, in document order.
    pub fn picture_anchors(&self) -> Result<Vec<CellAnchor>> {
        let mut anchors = Vec::new();
        if let Some(root) = self.root_container() {
            collect_pictures(&root?, None, &mut anchors)?;
        }
        Ok(anchors)
    }
}

fn collect_pictures(
    container: &EscherContainer<'_>,
    inherited: Option<CellAnchor>,
    anchors: &mut Vec<CellAnchor>,
) -> Result<()> {
    // The first shape of a group container describes the group itself.
    let mut group_anchor = inherited;
    let is_group = container.record().record_type == EscherRecordType::SpgrContainer;
    let mut first = true;

    for child in container.children() {
        let child = child?;
        match child.record_type {
            EscherRecordType::SpContainer => {
                let shape = EscherShape::from_container(&EscherContainer::new(child))?;
                if is_group && first {
                    if inherited.is_none() {
                        group_anchor = shape.anchor;
                    }
                } else if shape.is_picture()
                    && let Some(anchor) = group_anchor.or(shape.anchor)
                {
                    anchors.push(anchor);
                }
            },
            _ if child.is_container() => {
                collect_pictures(&EscherContainer::new(child), group_anchor, anchors)?;
            },
            _ => {},
        }
        first = false;
    }
    Ok(())
}
