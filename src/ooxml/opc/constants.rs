//! Relationship type identifiers used by spreadsheet packages.
//!
//! Transitional packages use `http://schemas.openxmlformats.org/...` type
//! URIs and Strict packages use `http://purl.oclc.org/ooxml/...`; both end in
//! the same final segment, so lookups match on that suffix.

/// Relationship type suffixes (final path segment of the type URI).
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str = "/officeDocument";
    pub const WORKSHEET: &str = "/worksheet";
    pub const SHARED_STRINGS: &str = "/sharedStrings";
    pub const STYLES: &str = "/styles";
    pub const DRAWING: &str = "/drawing";
}

/// Values of the `TargetMode` attribute.
pub mod target_mode {
    pub const EXTERNAL: &str = "External";
}

/// Fallback location of the workbook part when the package relationships omit it.
pub const DEFAULT_WORKBOOK_PART: &str = "/xl/workbook.xml";
