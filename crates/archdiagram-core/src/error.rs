//! Error types for diagram generation

use thiserror::Error;

/// Errors raised by an [`ObjectStore`](crate::ObjectStore) implementation
#[derive(Debug, Error)]
pub enum StorageError {
    /// No bucket name was configured for the write
    #[error("bucket name is empty; set BUCKET_NAME to the destination bucket")]
    MissingBucket,

    /// The storage backend rejected or failed the write
    #[error("failed to write '{key}' to bucket '{bucket}': {message}")]
    Backend {
        bucket: String,
        key: String,
        message: String,
    },
}

impl StorageError {
    pub fn backend(bucket: &str, key: &str, message: impl Into<String>) -> Self {
        Self::Backend {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while handling a diagram request
#[derive(Debug, Error)]
pub enum DiagramError {
    /// The request carried no usable `documentId`
    #[error("documentId is required")]
    MissingDocumentId,

    /// Persisting the artifact failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Building the viewer link failed
    #[error("failed to encode viewer link: {0}")]
    ViewerEncoding(#[from] std::io::Error),
}

impl DiagramError {
    /// Validation failures are answered before any side effect happens
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingDocumentId)
    }
}
