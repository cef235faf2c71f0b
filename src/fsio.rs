//! Change-aware atomic target writes.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::{Error, Result};

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `content` unless the target already holds exactly those bytes.
/// Returns whether a write happened.
///
/// Writes go through a temp file in the target's directory followed by a
/// rename, so an interrupted run never leaves a partial target behind.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    // Missing or unreadable current content counts as changed.
    if let Ok(current) = fs::read_to_string(path) {
        if current == content {
            return Ok(false);
        }
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    // The rename would otherwise replace the target's mode with the temp
    // file's restrictive one.
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions()).map_err(write_err)?;
    }
    tmp.persist(path)
        .map_err(|e| Error::Write {
            path: path.to_path_buf(),
            source: e.error,
        })?;
    Ok(true)
}
