//! OpenDAL-backed object store
//!
//! Writes diagram artifacts to S3 (or an S3-compatible endpoint) in Lambda,
//! and to a local directory tree for CLI runs. One operator is created per
//! bucket on first use and reused for later writes.

use archdiagram_config::{StorageBackend, StorageConfig};
use archdiagram_core::{ObjectStore, StorageError};
use async_trait::async_trait;
use opendal::Operator;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone)]
enum Backend {
    S3 {
        region: String,
        endpoint: Option<String>,
    },
    /// Objects land in `<root>/<bucket>/<key>`
    Fs { root: PathBuf },
}

/// [`ObjectStore`] over OpenDAL operators
pub struct OpendalStore {
    backend: Backend,
    operators: Mutex<HashMap<String, Operator>>,
}

impl OpendalStore {
    /// S3 storage. OpenDAL discovers credentials from the environment
    /// (IAM role in Lambda, AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY locally).
    pub fn s3(region: impl Into<String>, endpoint: Option<String>) -> Self {
        Self::with_backend(Backend::S3 {
            region: region.into(),
            endpoint,
        })
    }

    /// Local filesystem storage rooted at `root`
    pub fn fs(root: impl Into<PathBuf>) -> Self {
        Self::with_backend(Backend::Fs { root: root.into() })
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        match config.backend {
            StorageBackend::S3 => Self::s3(config.region.clone(), config.endpoint.clone()),
            StorageBackend::Fs => {
                let root = config
                    .fs
                    .as_ref()
                    .map(|fs| fs.path.clone())
                    .unwrap_or_else(|| "./data".to_string());
                Self::fs(root)
            }
        }
    }

    fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            operators: Mutex::new(HashMap::new()),
        }
    }

    fn operator(&self, bucket: &str) -> opendal::Result<Operator> {
        if let Some(op) = self.operators.lock().get(bucket) {
            return Ok(op.clone());
        }

        let op = self.build_operator(bucket)?;
        tracing::debug!(bucket, backend = self.backend_name(), "Storage operator initialized");

        self.operators
            .lock()
            .insert(bucket.to_string(), op.clone());
        Ok(op)
    }

    fn build_operator(&self, bucket: &str) -> opendal::Result<Operator> {
        let op = match &self.backend {
            Backend::S3 { region, endpoint } => {
                let mut builder = opendal::services::S3::default()
                    .bucket(bucket)
                    .region(region);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Operator::new(builder)?.finish()
            }
            Backend::Fs { root } => {
                let dir = root.join(bucket);
                let builder = opendal::services::Fs::default().root(&dir.to_string_lossy());
                Operator::new(builder)?.finish()
            }
        };
        Ok(op)
    }

    fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::S3 { .. } => "s3",
            Backend::Fs { .. } => "fs",
        }
    }
}

/// Keep fs writes inside `<root>/<bucket>`: no `.`, `..` or empty segments
fn check_fs_path(bucket: &str, key: &str) -> Result<(), StorageError> {
    let invalid = |path: &str| {
        path.split(['/', '\\'])
            .any(|segment| matches!(segment, "" | "." | ".."))
    };
    if invalid(bucket) || invalid(key) {
        return Err(StorageError::backend(
            bucket,
            key,
            "path escapes the storage root or has empty segments",
        ));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for OpendalStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if bucket.is_empty() {
            return Err(StorageError::MissingBucket);
        }

        if let Backend::Fs { .. } = self.backend {
            check_fs_path(bucket, key)?;
        }

        let op = self
            .operator(bucket)
            .map_err(|e| StorageError::backend(bucket, key, e.to_string()))?;
        let mut write = op.write_with(key, body);
        // The fs service has no notion of content type
        if op.info().full_capability().write_with_content_type {
            write = write.content_type(content_type);
        }
        write
            .await
            .map_err(|e| StorageError::backend(bucket, key, e.to_string()))?;
        Ok(())
    }
}
