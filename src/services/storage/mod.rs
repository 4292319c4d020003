//! Object storage for shipment media and documents.
//!
//! [`ObjectStore`] is the backend seam (S3/MinIO or in-memory). [`Storage`]
//! layers the bucket fallback policy, key layout and public URLs on top.

mod memory;
mod s3;

pub use memory::MemoryStore;
pub use s3::S3Store;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::StorageSettings;
use crate::models::{DocumentType, Stage};

/// Errors raised by an object store backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("bucket '{0}' does not exist")]
    BucketNotFound(String),

    #[error("object '{0}' does not exist")]
    ObjectNotFound(String),

    #[error("{0}")]
    Backend(String),
}

/// An object read back from storage.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

/// Minimal bucket/key object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError>;

    /// Deleting a missing key succeeds; a missing bucket does not.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError>;

    /// Create `bucket` if it does not exist yet.
    async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError>;
}

/// Which candidate bucket list an upload draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKind {
    Media,
    Document,
}

impl std::fmt::Display for BucketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Media => write!(f, "media"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// Storage facade shared by handlers.
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn ObjectStore>,
    media_buckets: Vec<String>,
    document_buckets: Vec<String>,
    public_files_url: Option<String>,
}

impl Storage {
    pub fn new(store: Arc<dyn ObjectStore>, settings: &StorageSettings) -> Self {
        Self {
            store,
            media_buckets: settings.media_buckets.clone(),
            document_buckets: settings.document_buckets.clone(),
            public_files_url: settings
                .public_files_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Create the primary bucket of each candidate list when missing.
    pub async fn ensure_primary_buckets(&self) -> Result<(), StorageError> {
        for bucket in [self.media_buckets.first(), self.document_buckets.first()]
            .into_iter()
            .flatten()
        {
            self.store.ensure_bucket(bucket).await?;
            info!("Storage bucket '{}' is ready", bucket);
        }
        Ok(())
    }

    pub fn candidates(&self, kind: BucketKind) -> &[String] {
        match kind {
            BucketKind::Media => &self.media_buckets,
            BucketKind::Document => &self.document_buckets,
        }
    }

    /// Whether `bucket` is one the server writes to.
    pub fn is_known_bucket(&self, bucket: &str) -> bool {
        self.media_buckets
            .iter()
            .chain(self.document_buckets.iter())
            .any(|b| b == bucket)
    }

    /// Upload to the first candidate bucket that exists and return its name.
    ///
    /// A missing bucket moves on to the next candidate; any other failure
    /// stops immediately.
    pub async fn put_with_fallback(
        &self,
        kind: BucketKind,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let candidates = self.candidates(kind);
        for bucket in candidates {
            match self.store.put(bucket, key, data.clone(), content_type).await {
                Ok(()) => return Ok(bucket.clone()),
                Err(StorageError::BucketNotFound(_)) => {
                    warn!("Bucket '{}' not found for {} upload, trying next", bucket, kind);
                }
                Err(e) => return Err(e),
            }
        }

        Err(StorageError::Backend(format!(
            "no configured bucket is available for {} uploads (tried: {})",
            kind,
            candidates.join(", ")
        )))
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        self.store.get(bucket, key).await
    }

    pub async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.store.delete(bucket, key).await
    }

    /// Public URL of a stored object.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        let encoded_key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        match &self.public_files_url {
            Some(base) => format!("{}/{}/{}", base, bucket, encoded_key),
            None => format!("/api/v1/files/{}/{}", bucket, encoded_key),
        }
    }

    /// Randomized key for a stage media file.
    ///
    /// Format: `shipments/{shipment_id}/{stage}/{uuid}.{ext}`
    pub fn media_key(shipment_id: Uuid, stage: Stage, ext: &str) -> String {
        format!(
            "shipments/{}/{}/{}.{}",
            shipment_id,
            stage.as_str(),
            Uuid::new_v4(),
            ext
        )
    }

    /// Randomized key for a shipment document.
    ///
    /// Format: `documents/{shipment_id}/{document_type}/{uuid}.{ext}`
    pub fn document_key(shipment_id: Uuid, document_type: DocumentType, ext: &str) -> String {
        format!(
            "documents/{}/{}/{}.{}",
            shipment_id,
            document_type.as_str(),
            Uuid::new_v4(),
            ext
        )
    }

    /// Get the content type for a file based on its extension.
    pub fn content_type_for_extension(ext: &str) -> &'static str {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "pdf" => "application/pdf",
            "doc" => "application/msword",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "xls" => "application/vnd.ms-excel",
            "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "csv" => "text/csv",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        }
    }
}
