// Object storage seam for diagram artifacts
//
// Implementations:
// - OpendalStore (archdiagram-storage: S3 and local filesystem)
// - MemoryStore (tests and dry runs)

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::StorageError;

/// Write-once object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key` in `bucket`, declaring `content_type`
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

/// An object captured by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory store that records every write
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<StoredObject>>,
    failure: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .iter()
            .rev()
            .find(|object| object.bucket == bucket && object.key == key)
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
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
        if let Some(message) = self.failure.lock().clone() {
            return Err(StorageError::backend(bucket, key, message));
        }

        self.objects.lock().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body,
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_writes() {
        let store = MemoryStore::new();
        store
            .put_object("bucket", "a/b.mmd", b"graph TB".to_vec(), "text/plain")
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let object = store.get("bucket", "a/b.mmd").unwrap();
        assert_eq!(object.body, b"graph TB");
        assert_eq!(object.content_type, "text/plain");
        assert!(store.get("other", "a/b.mmd").is_none());
    }

    #[tokio::test]
    async fn rejects_empty_bucket() {
        let store = MemoryStore::new();
        let err = store
            .put_object("", "a/b.mmd", Vec::new(), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::MissingBucket));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn injected_failure_prevents_write() {
        let store = MemoryStore::new();
        store.fail_with("SlowDown");
        let err = store
            .put_object("bucket", "k", Vec::new(), "text/plain")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SlowDown"));
        assert!(store.is_empty());
    }
}
