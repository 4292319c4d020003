//! Process-local object store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ObjectStore, StorageError, StoredObject};

#[derive(Default)]
struct Inner {
    buckets: HashMap<String, HashMap<String, StoredObject>>,
    failing: HashSet<String>,
}

/// In-memory [`ObjectStore`]. Only buckets that were created exist.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given buckets already created.
    pub fn with_buckets<I, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inner = Inner {
            buckets: buckets
                .into_iter()
                .map(|b| (b.into(), HashMap::new()))
                .collect(),
            failing: HashSet::new(),
        };
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Make every later operation on `bucket` fail with a backend error.
    pub async fn fail_bucket(&self, bucket: &str) {
        self.inner.write().await.failing.insert(bucket.to_string());
    }

    pub async fn contains(&self, bucket: &str, key: &str) -> bool {
        self.inner
            .read()
            .await
            .buckets
            .get(bucket)
            .is_some_and(|objects| objects.contains_key(key))
    }

    /// Number of objects across all buckets.
    pub async fn object_count(&self) -> usize {
        self.inner
            .read()
            .await
            .buckets
            .values()
            .map(HashMap::len)
            .sum()
    }
}

fn check(inner: &Inner, bucket: &str) -> Result<(), StorageError> {
    if inner.failing.contains(bucket) {
        return Err(StorageError::Backend(format!(
            "bucket '{}' is unavailable",
            bucket
        )));
    }
    if !inner.buckets.contains_key(bucket) {
        return Err(StorageError::BucketNotFound(bucket.to_string()));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        check(&inner, bucket)?;
        if let Some(objects) = inner.buckets.get_mut(bucket) {
            objects.insert(
                key.to_string(),
                StoredObject {
                    data,
                    content_type: Some(content_type.to_string()),
                },
            );
        }
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        let inner = self.inner.read().await;
        check(&inner, bucket)?;
        inner
            .buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound(key.to_string()))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        check(&inner, bucket)?;
        if let Some(objects) = inner.buckets.get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }

    async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.inner
            .write()
            .await
            .buckets
            .entry(bucket.to_string())
            .or_default();
        Ok(())
    }
}
