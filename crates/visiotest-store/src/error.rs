//! Record store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by file-backed record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a collection file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of a collection file is not a valid stored record.
    #[error("corrupt record in {path} at line {line}: {source}")]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns `true` if the data on disk is damaged, as opposed to a transient failure.
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::CorruptRecord { .. })
    }
}
