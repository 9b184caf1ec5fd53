//! Spreadsheet format and container enumerations.

/// Spreadsheet formats handled by the extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Microsoft Excel Spreadsheet (OOXML format, .xlsx)
    Xlsx,
    /// Microsoft Excel Spreadsheet (OLE2 format, .xls)
    Xls,
    /// Comma-separated values (.csv)
    Csv,
}

impl FileFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            "csv" => Some(FileFormat::Csv),
            _ => None,
        }
    }

    /// The container this format must be stored in.
    pub fn expected_container(self) -> Container {
        match self {
            FileFormat::Xlsx => Container::Zip,
            FileFormat::Xls => Container::Ole2,
            FileFormat::Csv => Container::Plain,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Csv => "csv",
        }
    }
}

/// Physical container recognised from the leading bytes of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Zip archive (local file header signature)
    Zip,
    /// OLE2 compound file
    Ole2,
    /// Neither signature matched
    Plain,
}

impl Container {
    pub fn describe(self) -> &'static str {
        match self {
            Container::Zip => "zip archive",
            Container::Ole2 => "OLE2 compound file",
            Container::Plain => "plain text",
        }
    }
}
