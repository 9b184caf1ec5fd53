//! Run configuration.
//!
//! Loaded from a TOML file with a required `[settings]` table (`[SETTINGS]`
//! is accepted too) and optional `[csv]` and `[run]` tables:
//!
//! ```toml
//! [settings]
//! target_dir = "./data"
//! search_keyword = "申請書"
//! target_cells = ["A1", "B1", "C1"]
//! image_check_cells = "D1, E1"
//! output_filename = "result.txt"
//! target_sheet = "Sheet1"
//!
//! [csv]
//! delimiter = ","
//! encoding = "shift_jis"
//!
//! [run]
//! parallel = true
//! error_marker = "#ERROR"
//! ```
//!
//! Everything is validated up front, cell references included, so a bad
//! configuration stops the run before any file is read.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::common::encoding::encoding_for_label;
use crate::common::{Error, Result};
use crate::render::DEFAULT_ERROR_MARKER;
use crate::sheet::text::TextConfig;
use crate::sheet::{CellCoordinate, ImagePresence, ReaderOptions, resolve};

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "SETTINGS")]
    settings: RawSettings,
    #[serde(default)]
    csv: RawCsv,
    #[serde(default)]
    run: RawRun,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    target_dir: PathBuf,
    search_keyword: String,
    target_cells: CellList,
    image_check_cells: CellList,
    output_filename: String,
    target_sheet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCsv {
    delimiter: Option<String>,
    quote: Option<String>,
    encoding: Option<String>,
    max_extra_fields: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRun {
    parallel: Option<bool>,
    error_marker: Option<String>,
}

/// A list of cell references, as a TOML array or one comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellList {
    List(Vec<String>),
    Joined(String),
}

impl CellList {
    fn entries(&self) -> Vec<&str> {
        match self {
            CellList::List(items) => items.iter().map(|s| s.trim()).collect(),
            CellList::Joined(joined) => joined.split(',').map(str::trim).collect(),
        }
    }
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub target_dir: PathBuf,
    pub search_keyword: String,
    pub target_cells: Vec<CellCoordinate>,
    pub image_check_cells: Vec<CellCoordinate>,
    pub output_path: PathBuf,
    pub target_sheet: Option<String>,
    pub csv: TextConfig,
    pub parallel: bool,
    pub error_marker: String,
}

impl Config {
    /// Read and validate the configuration file at `path`.
    ///
    /// Relative paths in the file resolve against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let base_dir = path.parent().unwrap_or(Path::new(""));
        Self::from_toml_str(&text, base_dir)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        let settings = raw.settings;

        let target_cells = cell_list("target_cells", &settings.target_cells)?;
        let image_check_cells = cell_list("image_check_cells", &settings.image_check_cells)?;

        if settings.output_filename.trim().is_empty() {
            return Err(Error::Config("output_filename must not be empty".into()));
        }

        let mut csv = TextConfig::default().with_max_extra_fields(raw.csv.max_extra_fields);
        if let Some(delimiter) = &raw.csv.delimiter {
            csv = csv.with_delimiter(single_byte("csv.delimiter", delimiter)?);
        }
        if let Some(quote) = &raw.csv.quote {
            csv = csv.with_quote(single_byte("csv.quote", quote)?);
        }
        if csv.delimiter == csv.quote {
            return Err(Error::Config(
                "csv.delimiter and csv.quote must differ".into(),
            ));
        }
        if let Some(label) = &raw.csv.encoding {
            csv = csv.with_encoding(encoding_for_label(label)?);
        }

        let error_marker = raw
            .run
            .error_marker
            .unwrap_or_else(|| DEFAULT_ERROR_MARKER.to_string());
        validate_error_marker(&error_marker)?;

        let config = Config {
            target_dir: base_dir.join(&settings.target_dir),
            search_keyword: settings.search_keyword,
            target_cells,
            image_check_cells,
            output_path: base_dir.join(settings.output_filename.trim()),
            target_sheet: settings
                .target_sheet
                .filter(|name| !name.trim().is_empty()),
            csv,
            parallel: raw.run.parallel.unwrap_or(true),
            error_marker,
        };
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Reader options shared by every file.
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            target_sheet: self.target_sheet.clone(),
            csv: self.csv.clone(),
        }
    }
}

fn cell_list(field: &str, list: &CellList) -> Result<Vec<CellCoordinate>> {
    let entries = list.entries();
    if entries.is_empty() || entries.iter().any(|e| e.is_empty()) {
        return Err(Error::Config(format!(
            "{} must list one or more cells without empty entries",
            field
        )));
    }
    entries.into_iter().map(resolve).collect()
}

fn single_byte(field: &str, value: &str) -> Result<u8> {
    match value.as_bytes() {
        // Line ends always terminate a record.
        [b] if b.is_ascii() && !matches!(b, b'\r' | b'\n') => Ok(*b),
        _ => Err(Error::Config(format!(
            "{} must be a single ASCII character other than CR or LF, got {:?}",
            field, value
        ))),
    }
}

fn validate_error_marker(marker: &str) -> Result<()> {
    let symbols = [
        ImagePresence::Present,
        ImagePresence::Absent,
        ImagePresence::Unsupported,
    ]
    .map(ImagePresence::symbol);
    if marker.is_empty() || symbols.contains(&marker) {
        return Err(Error::Config(format!(
            "error_marker {:?} must be non-empty and differ from {:?}",
            marker, symbols
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[settings]
target_dir = "data"
search_keyword = "申請"
target_cells = ["A1", "b1", " C1 "]
image_check_cells = "D1, E1"
output_filename = "result.txt"
"#;

    #[test]
    fn test_minimal_config() {
        let config = Config::from_toml_str(MINIMAL, Path::new("/work")).unwrap();
        assert_eq!(config.target_dir, Path::new("/work/data"));
        assert_eq!(config.output_path, Path::new("/work/result.txt"));
        let refs: Vec<&str> = config.target_cells.iter().map(|c| c.reference()).collect();
        assert_eq!(refs, ["A1", "B1", "C1"]);
        assert_eq!(config.image_check_cells.len(), 2);
        assert_eq!(config.target_sheet, None);
        assert!(config.parallel);
        assert_eq!(config.error_marker, "#ERROR");
        assert_eq!(config.csv.delimiter, b',');
        assert_eq!(config.csv.max_extra_fields, None);
    }

    #[test]
    fn test_uppercase_table_and_optional_tables() {
        let text = r#"
[SETTINGS]
target_dir = "/abs"
search_keyword = ""
target_cells = "A1"
image_check_cells = ["B2"]
output_filename = "out.txt"
target_sheet = "集計"

[csv]
delimiter = ";"
encoding = "shift_jis"
max_extra_fields = 2

[run]
parallel = false
error_marker = "ERR"
"#;
        let config = Config::from_toml_str(text, Path::new("/work")).unwrap();
        assert_eq!(config.target_dir, Path::new("/abs"));
        assert_eq!(config.target_sheet.as_deref(), Some("集計"));
        assert_eq!(config.csv.delimiter, b';');
        assert_eq!(config.csv.encoding, encoding_rs::SHIFT_JIS);
        assert_eq!(config.csv.max_extra_fields, Some(2));
        assert!(!config.parallel);
        assert_eq!(config.error_marker, "ERR");
        assert_eq!(config.reader_options().target_sheet.as_deref(), Some("集計"));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let text = MINIMAL.replace("output_filename = \"result.txt\"", "");
        assert!(matches!(
            Config::from_toml_str(&text, Path::new(".")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_bad_cell_reference_is_fatal() {
        let text = MINIMAL.replace("\"D1, E1\"", "\"D1, 1E\"");
        assert!(matches!(
            Config::from_toml_str(&text, Path::new(".")),
            Err(Error::InvalidReference(r)) if r == "1E"
        ));
    }

    #[test]
    fn test_empty_cell_entries_are_rejected() {
        for cells in ["\"\"", "[]", "\"A1,,B1\""] {
            let text = MINIMAL.replace("\"D1, E1\"", cells);
            assert!(
                matches!(Config::from_toml_str(&text, Path::new(".")), Err(Error::Config(_))),
                "{cells} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_marker_must_be_distinct() {
        for marker in ["○", "×", "-", ""] {
            let text = format!("{MINIMAL}\n[run]\nerror_marker = \"{marker}\"\n");
            assert!(matches!(
                Config::from_toml_str(&text, Path::new(".")),
                Err(Error::Config(_))
            ));
        }
    }

    #[test]
    fn test_csv_options_are_validated() {
        for csv in [
            "delimiter = \"::\"",
            "quote = \"、\"",
            "delimiter = \"'\"\nquote = \"'\"",
            "encoding = \"klingon\"",
            "delimiter = \"\\n\"",
            "delimiter = \"\\r\"",
            "quote = \"\\n\"",
            "quote = \"\\r\"",
        ] {
            let text = format!("{MINIMAL}\n[csv]\n{csv}\n");
            assert!(
                matches!(Config::from_toml_str(&text, Path::new(".")), Err(Error::Config(_))),
                "{csv} should be rejected"
            );
        }
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.target_dir, dir.path().join("data"));

        assert!(matches!(
            Config::load(dir.path().join("missing.toml")),
            Err(Error::Config(_))
        ));
    }
}
