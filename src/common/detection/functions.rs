//! Structural probe that chooses a reader variant.
//!
//! The extension says which format a file claims to be; the leading bytes say
//! which container it really is. The two must agree.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use super::types::{Container, FileFormat};
use super::utils::{OLE2_SIGNATURE, PROBE_LEN, ZIP_SIGNATURE};
use crate::common::error::{Error, Result};

/// Classify a container from its leading bytes.
///
/// # Examples
///
/// ```
/// use cellscan::common::detection::{Container, detect_container_from_bytes};
/// assert_eq!(detect_container_from_bytes(b"PK\x03\x04rest"), Container::Zip);
/// assert_eq!(detect_container_from_bytes(b"a,b,c\n"), Container::Plain);
/// ```
pub fn detect_container_from_bytes(header: &[u8]) -> Container {
    if header.starts_with(OLE2_SIGNATURE) {
        Container::Ole2
    } else if header.starts_with(ZIP_SIGNATURE) {
        Container::Zip
    } else {
        Container::Plain
    }
}

/// Classify the container behind a reader, leaving its position unchanged.
pub fn detect_container<R: Read + Seek>(reader: &mut R) -> std::io::Result<Container> {
    let start = reader.stream_position()?;
    let mut header = [0u8; PROBE_LEN];
    let mut filled = 0;
    while filled < PROBE_LEN {
        match reader.read(&mut header[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    reader.seek(SeekFrom::Start(start))?;
    Ok(detect_container_from_bytes(&header[..filled]))
}

/// Decide the format of `path` from its extension and verify the container.
///
/// # Errors
///
/// - `Error::UnsupportedStructure` when the extension is not one of xlsx, xls or csv
/// - `Error::FormatMismatch` when the bytes belong to a different container
/// - `Error::Io` when the file cannot be read
pub fn probe_format<P: AsRef<Path>>(path: P) -> Result<FileFormat> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let format = FileFormat::from_extension(ext).ok_or_else(|| {
        Error::UnsupportedStructure(format!("unsupported file extension {:?}", ext))
    })?;

    let mut file = File::open(path)?;
    let detected = detect_container(&mut file)?;
    if detected != format.expected_container() {
        return Err(Error::FormatMismatch {
            extension: format.extension().to_string(),
            detected: detected.describe(),
        });
    }
    Ok(format)
}
