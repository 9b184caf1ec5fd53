//! Escher record type identifiers.

/// Record types that matter when locating pictures on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscherRecordType {
    /// Drawing group container (workbook level)
    DggContainer,
    /// Drawing container (one per sheet)
    DgContainer,
    /// Group shape container
    SpgrContainer,
    /// Shape container
    SpContainer,
    /// Group shape bounds
    Spgr,
    /// Shape: type in the instance field, flags in the data
    Sp,
    /// Property table
    Opt,
    /// Position of a child inside its group
    ChildAnchor,
    /// Host-specific anchor; cells for Excel
    ClientAnchor,
    ClientData,
    ClientTextbox,
    Unknown(u16),
}

impl EscherRecordType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0xF000 => Self::DggContainer,
            0xF002 => Self::DgContainer,
            0xF003 => Self::SpgrContainer,
            0xF004 => Self::SpContainer,
            0xF009 => Self::Spgr,
            0xF00A => Self::Sp,
            0xF00B => Self::Opt,
            0xF00F => Self::ChildAnchor,
            0xF010 => Self::ClientAnchor,
            0xF011 => Self::ClientData,
            0xF00D => Self::ClientTextbox,
            other => Self::Unknown(other),
        }
    }
}
