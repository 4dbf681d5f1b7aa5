//! Document scanning.
//!
//! # Data Flow
//! ```text
//! HTML file on disk
//!     → scan_file (read, lossy UTF-8)
//!     → links.rs (parse tree, collect shortlink + canonical)
//!     → Vec<MappingRecord>
//! ```
//!
//! # Design Decisions
//! - Pure: no I/O beyond reading the one file, no shared state
//! - Per-link failures are logged and skipped, never fatal for the document

pub mod links;

use std::path::{Path, PathBuf};

pub use links::scan_document;

use crate::mapping::MappingRecord;

/// Error reading a document from disk.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read and scan a single HTML file.
pub fn scan_file(path: &Path) -> Result<Vec<MappingRecord>, ScanError> {
    let bytes = std::fs::read(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(scan_document(&String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(
            &path,
            r#"<html><head><link rel="shortlink" href="/s"><link rel="canonical" href="/p"></head></html>"#,
        )
        .unwrap();

        let records = scan_file(&path).unwrap();
        assert_eq!(records, vec![MappingRecord::new("/s", "/p")]);
    }

    #[test]
    fn test_scan_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_file(&dir.path().join("missing.html")).unwrap_err();
        assert!(err.to_string().contains("missing.html"));
    }
}
