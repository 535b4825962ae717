//! Key-value store error types

use thiserror::Error;

/// Errors that can occur while reading or writing the key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage full: writing '{key}' needs {required} bytes, {available} available")]
    StorageFull {
        key: String,
        required: u64,
        available: u64,
    },

    #[error("Data directory not found")]
    DataDirNotFound,
}

impl StorageError {
    /// Whether this error means the backing medium rejected a write for capacity
    pub fn is_storage_full(&self) -> bool {
        match self {
            Self::StorageFull { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::StorageFull,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
