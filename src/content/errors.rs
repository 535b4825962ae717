//! Content error types

use thiserror::Error;

use crate::kv::StorageError;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid content format: {0}")]
    InvalidFormat(String),

    #[error("No content cached for topic '{0}'")]
    TopicNotFound(String),
}

pub type Result<T> = std::result::Result<T, ContentError>;
