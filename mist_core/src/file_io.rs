//! # File I/O Module
//!
//! Reading material documents and writing generated artifacts.
//!
//! - **Atomic writes**: output is written to a `.tmp` sibling, synced, then
//!   renamed over the destination, so a reader never sees a half-written file
//! - **Structured errors**: every failure names the operation and the path
//!
//! ## Example
//!
//! ```rust,no_run
//! use mist_core::file_io::{read_document, write_atomic};
//! use std::path::Path;
//!
//! let document = read_document(Path::new("SS316L.json"))?;
//! write_atomic(Path::new("SS316L.copy.json"), document.to_string().as_bytes())?;
//! # Ok::<(), mist_core::errors::MistError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{MistError, MistResult};

/// Read and parse a JSON document.
///
/// # Returns
///
/// * `Ok(Value)` - The parsed document
/// * `Err(MistError::FileError)` - I/O error
/// * `Err(MistError::SerializationError)` - Invalid JSON
pub fn read_document(path: &Path) -> MistResult<Value> {
    let mut file = File::open(path).map_err(|e| {
        MistError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        MistError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| MistError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Write `contents` to `path` with atomic replace semantics.
///
/// The write process:
/// 1. Write to a temporary file next to the destination
/// 2. Sync to disk (fsync)
/// 3. Rename the temporary file over the destination
pub fn write_atomic(path: &Path, contents: &[u8]) -> MistResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        MistError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        MistError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        MistError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        MistError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// `out.json` -> `out.json.tmp`; `transportProperties` -> `transportProperties.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp_path = path.to_path_buf();
    let extension = tmp_path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp_path.set_extension(extension);
    tmp_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("mist_file_io_test_{}", name))
    }

    #[test]
    fn test_tmp_path_generation() {
        assert_eq!(tmp_path_for(Path::new("/out/exaca.json")), Path::new("/out/exaca.json.tmp"));
        assert_eq!(
            tmp_path_for(Path::new("/out/transportProperties")),
            Path::new("/out/transportProperties.tmp")
        );
    }

    #[test]
    fn test_write_then_read_document() {
        let path = temp_path("roundtrip.json");
        write_atomic(&path, br#"{ "name": "SS316L", "note": "" }"#).unwrap();

        let document = read_document(&path).unwrap();
        assert_eq!(document["name"], "SS316L");
        assert!(!tmp_path_for(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_document(&temp_path("does_not_exist.json")).unwrap_err();
        assert!(matches!(err, MistError::FileError { ref operation, .. } if operation == "open"));
    }

    #[test]
    fn test_read_invalid_json() {
        let path = temp_path("invalid.json");
        fs::write(&path, "{ name: SS316L").unwrap();

        let err = read_document(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let path = temp_path("no_such_dir").join("out.txt");
        let err = write_atomic(&path, b"data").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
