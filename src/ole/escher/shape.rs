//! Escher shape classification.

use crate::common::binary::{read_u16_le, read_u32_le};

use super::container::EscherContainer;
use super::record::Result;
use super::types::EscherRecordType;

/// `msosptPictureFrame`, the shape type Office gives inserted pictures.
pub const PICTURE_FRAME: u16 = 75;

/// Property id of the blip a picture shows (`pib`).
const PROP_PIB: u16 = 0x0104;

/// `fGroup` in the Sp record flags.
const SP_FLAG_GROUP: u32 = 0x0001;

/// Escher shape type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscherShapeType {
    Picture,
    Group,
    Other(u16),
}

/// Cell rectangle from an Excel client anchor, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAnchor {
    pub col1: u32,
    pub row1: u32,
    pub col2: u32,
    pub row2: u32,
}

impl CellAnchor {
    /// Parse the body of a ClientAnchor record written by Excel:
    /// flags, then (col, dx, row, dy) for the top-left and bottom-right corners.
    pub fn from_client_anchor(data: &[u8]) -> Option<Self> {
        let field = |offset| read_u16_le(data, offset).ok().map(u32::from);
        Some(CellAnchor {
            col1: field(2)?,
            row1: field(6)?,
            col2: field(10).unwrap_or(0),
            row2: field(14).unwrap_or(0),
        })
    }
}

/// The parts of a shape container that locate and classify it.
#[derive(Debug, Clone)]
pub struct EscherShape {
    pub shape_type: EscherShapeType,
    /// The property table references a blip
    pub has_blip: bool,
    pub anchor: Option<CellAnchor>,
}

impl EscherShape {
    /// Read an SpContainer.
    pub fn from_container(container: &EscherContainer<'_>) -> Result<Self> {
        let mut shape_type = EscherShapeType::Other(0);
        let mut has_blip = false;
        let mut anchor = None;

        for child in container.children() {
            let child = child?;
            match child.record_type {
                EscherRecordType::Sp => {
                    let flags = read_u32_le(child.data, 4).unwrap_or(0);
                    shape_type = if flags & SP_FLAG_GROUP != 0 {
                        EscherShapeType::Group
                    } else if child.instance == PICTURE_FRAME {
                        EscherShapeType::Picture
                    } else {
                        EscherShapeType::Other(child.instance)
                    };
                },
                EscherRecordType::Opt => {
                    has_blip = has_blip_property(child.data, child.instance);
                },
                EscherRecordType::ClientAnchor => {
                    anchor = CellAnchor::from_client_anchor(child.data);
                },
                _ => {},
            }
        }

        Ok(EscherShape {
            shape_type,
            has_blip,
            anchor,
        })
    }

    /// A picture frame, or any shape that shows a blip as its content.
    #[inline]
    pub fn is_picture(&self) -> bool {
        match self.shape_type {
            EscherShapeType::Picture => true,
            EscherShapeType::Group => false,
            EscherShapeType::Other(_) => self.has_blip,
        }
    }
}

// Fixed-size property entries come first: 2-byte id, 4-byte value.
fn has_blip_property(data: &[u8], count: u16) -> bool {
    (0..count as usize).any(|i| {
        let offset = i * 6;
        match (read_u16_le(data, offset), read_u32_le(data, offset + 2)) {
            (Ok(id), Ok(value)) => id & 0x3FFF == PROP_PIB && value != 0,
            _ => false,
        }
    })
}
