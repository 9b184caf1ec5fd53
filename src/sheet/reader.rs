//! Reader variant chosen by the structural probe.

use std::path::Path;

use tracing::debug;

use crate::common::detection::{FileFormat, probe_format};
use crate::common::Result;
use crate::ole::xls::XlsWorkbook;
use crate::ooxml::xlsx::Workbook;

use super::anchor::AnchorIndex;
use super::coordinate::CellCoordinate;
use super::text::{CsvSheet, TextConfig};
use super::traits::{AnchorSource, CellSource};
use super::types::CellValue;

/// Options shared by every file of a run.
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    /// Worksheet name for xlsx/xls; the active sheet when `None`.
    pub target_sheet: Option<String>,
    /// Delimiter, quoting and encoding for CSV.
    pub csv: TextConfig,
}

/// One opened file, as one of the supported reader variants.
#[allow(clippy::large_enum_variant)]
pub enum SheetReader {
    Xlsx(Workbook),
    Xls(XlsWorkbook),
    Csv(CsvSheet),
}

impl SheetReader {
    /// Probe `path` and open it with the matching reader.
    ///
    /// # Errors
    ///
    /// `Error::FormatMismatch` when the extension and the container disagree;
    /// otherwise whatever the chosen reader reports.
    pub fn open<P: AsRef<Path>>(path: P, options: &ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let format = probe_format(path)?;
        Self::open_as(path, format, options)
    }

    /// Open `path` with the reader for `format`, without probing.
    pub fn open_as<P: AsRef<Path>>(
        path: P,
        format: FileFormat,
        options: &ReaderOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let sheet = options.target_sheet.as_deref();
        let reader = match format {
            FileFormat::Xlsx => SheetReader::Xlsx(Workbook::open(path, sheet)?),
            FileFormat::Xls => SheetReader::Xls(XlsWorkbook::open(path, sheet)?),
            FileFormat::Csv => SheetReader::Csv(CsvSheet::open(path, &options.csv)?),
        };
        debug!(
            path = %path.display(),
            format = format.extension(),
            sheet = reader.sheet_name().unwrap_or("-"),
            "opened reader"
        );
        Ok(reader)
    }

    pub fn format(&self) -> FileFormat {
        match self {
            SheetReader::Xlsx(_) => FileFormat::Xlsx,
            SheetReader::Xls(_) => FileFormat::Xls,
            SheetReader::Csv(_) => FileFormat::Csv,
        }
    }

    /// Name of the loaded worksheet; CSV files have none.
    pub fn sheet_name(&self) -> Option<&str> {
        match self {
            SheetReader::Xlsx(wb) => Some(wb.sheet_name()),
            SheetReader::Xls(wb) => Some(wb.sheet_name()),
            SheetReader::Csv(_) => None,
        }
    }

    /// The picture-anchor capability, when the format has a drawing layer.
    pub fn anchors(&mut self) -> Option<&mut dyn AnchorSource> {
        match self {
            SheetReader::Xlsx(wb) => Some(wb),
            SheetReader::Xls(wb) => Some(wb),
            SheetReader::Csv(_) => None,
        }
    }

    /// Build the anchor index, or `None` for formats without drawings.
    pub fn build_anchor_index(&mut self) -> Option<Result<AnchorIndex>> {
        self.anchors().map(|source| source.build_anchor_index())
    }
}

impl CellSource for SheetReader {
    fn read_cell(&self, coord: &CellCoordinate) -> CellValue {
        match self {
            SheetReader::Xlsx(wb) => CellSource::read_cell(wb, coord),
            SheetReader::Xls(wb) => CellSource::read_cell(wb, coord),
            SheetReader::Csv(sheet) => CellSource::read_cell(sheet, coord),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::sheet::resolve;
    use crate::test_support::{XLS_XF_GENERAL, XF_GENERAL, XlsFixture, XlsxFixture, write_file};

    #[test]
    fn test_variant_follows_container() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = write_file(
            dir.path(),
            "a.xlsx",
            &XlsxFixture::new().sheet("S").number("A1", 1.0, XF_GENERAL).build(),
        );
        let xls = write_file(
            dir.path(),
            "b.xls",
            &XlsFixture::new().sheet("S").number(0, 0, 2.0, XLS_XF_GENERAL).build(),
        );
        let csv = write_file(dir.path(), "c.csv", b"3\n");
        let options = ReaderOptions::default();
        let a1 = resolve("A1").unwrap();

        let mut reader = SheetReader::open(&xlsx, &options).unwrap();
        assert_eq!(reader.format(), FileFormat::Xlsx);
        assert_eq!(reader.read_cell(&a1), CellValue::Number(1.0));
        assert!(reader.build_anchor_index().is_some());

        let mut reader = SheetReader::open(&xls, &options).unwrap();
        assert_eq!(reader.format(), FileFormat::Xls);
        assert_eq!(reader.sheet_name(), Some("S"));
        assert_eq!(reader.read_cell(&a1), CellValue::Number(2.0));
        assert!(reader.build_anchor_index().is_some());

        let mut reader = SheetReader::open(&csv, &options).unwrap();
        assert_eq!(reader.format(), FileFormat::Csv);
        assert_eq!(reader.read_cell(&a1), CellValue::Number(3.0));
        assert!(reader.build_anchor_index().is_none());
    }

    #[test]
    fn test_errors_are_classified() {
        let dir = tempfile::tempdir().unwrap();
        let options = ReaderOptions::default();

        let truncated = write_file(dir.path(), "broken.xlsx", b"PK\x03\x04garbage");
        assert!(matches!(
            SheetReader::open(&truncated, &options),
            Err(Error::CorruptPackage(_))
        ));

        let disguised = write_file(dir.path(), "text.xls", b"a,b\n");
        assert!(matches!(
            SheetReader::open(&disguised, &options),
            Err(Error::FormatMismatch { .. })
        ));

        let named = ReaderOptions {
            target_sheet: Some("Missing".into()),
            ..ReaderOptions::default()
        };
        let xls = write_file(
            dir.path(),
            "one.xls",
            &XlsFixture::new().sheet("S").build(),
        );
        assert!(matches!(
            SheetReader::open(&xls, &named),
            Err(Error::UnsupportedStructure(_))
        ));
    }
}
