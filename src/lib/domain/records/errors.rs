//! Error types for the record store

use thiserror::Error;

/// Errors raised by the file-backed record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a record file failed
    #[error("record file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized or deserialized
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
