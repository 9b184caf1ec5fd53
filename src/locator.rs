//! Discovery of spreadsheet files under a directory tree.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::common::detection::FileFormat;
use crate::common::{Error, Result};

/// Prefix Excel gives the lock file of an open workbook.
const LOCK_FILE_PREFIX: &str = "~$";

/// A discovered file and the path shown for it in the result table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocatedFile {
    pub path: PathBuf,
    /// Path relative to the traversal root, `/`-separated
    pub display_path: String,
}

impl LocatedFile {
    /// Locate `path` relative to `root`.
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let display_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        LocatedFile { path, display_path }
    }
}

/// Recursive search for xlsx, xls and csv files whose name contains a keyword.
#[derive(Debug, Clone)]
pub struct FileLocator {
    root: PathBuf,
    keyword: String,
}

impl FileLocator {
    /// # Errors
    ///
    /// `Error::Config` when `root` is missing or not a directory.
    pub fn new<P: Into<PathBuf>>(root: P, keyword: impl Into<String>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(Error::Config(format!(
                "target directory not found: {}",
                root.display()
            )));
        }
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "target path is not a directory: {}",
                root.display()
            )));
        }
        Ok(FileLocator {
            root,
            keyword: keyword.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Matching files, sorted by path.
    ///
    /// Entries that cannot be read are logged and skipped.
    pub fn locate(&self) -> Vec<LocatedFile> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                },
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
                continue;
            };
            if self.matches(name) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        files
            .into_iter()
            .map(|path| LocatedFile::new(&self.root, path))
            .collect()
    }

    fn matches(&self, name: &str) -> bool {
        if name.starts_with(LOCK_FILE_PREFIX) || !name.contains(self.keyword.as_str()) {
            return false;
        }
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(FileFormat::from_extension)
            .is_some()
    }
}
