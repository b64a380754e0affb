// Pipeline ingestion: read the report into memory and fingerprint it

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// The full report text, read once before any parsing
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub text: String,
    /// Hex SHA-256 of the bytes on disk
    pub sha256: String,
    /// Size on disk
    pub bytes: usize,
}

/// Read the whole report into memory.
///
/// A leading UTF-8 byte-order mark is dropped. Bytes that are not valid UTF-8
/// are replaced rather than rejected, with a warning.
pub fn read_report(path: &Path) -> Result<ReportInput> {
    let raw = fs::read(path)?;
    let bytes = raw.len();
    let sha256 = hex::encode(Sha256::digest(&raw));

    let mut text = match String::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                path = %path.display(),
                valid_up_to = e.utf8_error().valid_up_to(),
                "Report is not valid UTF-8; replacing invalid bytes"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    if text.starts_with(BYTE_ORDER_MARK) {
        text.replace_range(..BYTE_ORDER_MARK.len_utf8(), "");
    }

    info!(path = %path.display(), bytes, sha256 = %sha256, "Read report");
    Ok(ReportInput {
        text,
        sha256,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_and_fingerprints() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        let input = read_report(file.path()).unwrap();
        assert_eq!(input.text, "abc");
        assert_eq!(
            input.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFPatch List,,,,,,,,\n").unwrap();

        let input = read_report(file.path()).unwrap();
        assert!(input.text.starts_with("Patch List"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"caf\xE9,1\n").unwrap();

        let input = read_report(file.path()).unwrap();
        assert_eq!(input.text, "caf\u{fffd},1\n");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_report(Path::new("/nonexistent/report.csv")).unwrap_err();
        assert!(matches!(err, crate::error::ReportError::Io(_)));
    }
}
