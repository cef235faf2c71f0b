//! Error types for the generator.
//!
//! `ScanError` covers failures local to one target file (markers or keys that
//! cannot be located, unbalanced delimiters). It carries no path; emitters
//! convert it to `Error::TargetMalformed` at the point where the path is
//! known.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure while scanning a target file for a splice region.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("{0} key not found")]
    KeyNotFound(String),
    #[error("{0} key missing colon")]
    MissingColon(String),
    #[error("{0} key missing value")]
    MissingValue(String),
    #[error("{0} value must be an object")]
    NotAnObject(String),
    #[error("unterminated string at byte {0}")]
    UnterminatedString(usize),
    #[error("unterminated object starting at byte {0}")]
    UnterminatedObject(usize),
    #[error("unterminated array starting at byte {0}")]
    UnterminatedArray(usize),
    #[error("marker must be on its own line: {0:?}")]
    MarkerNotAlone(String),
}

/// Top-level error from a generation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("read {}: {}", path.display(), source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write {}: {}", path.display(), source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {}: {}", path.display(), source)]
    SourceDecode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{0}")]
    PathResolution(String),
    #[error("{}: {}", path.display(), source)]
    TargetMalformed {
        path: PathBuf,
        #[source]
        source: ScanError,
    },
}

impl Error {
    /// Attach a target path to a scan failure.
    pub fn malformed(path: &std::path::Path, source: ScanError) -> Self {
        Self::TargetMalformed {
            path: path.to_path_buf(),
            source,
        }
    }
}
