//! S3-compatible object store (AWS S3 or MinIO).

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use super::{ObjectStore, StorageError, StoredObject};
use crate::config::StorageSettings;

const NO_SUCH_BUCKET: &str = "NoSuchBucket";

/// S3 storage client wrapper.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Create a new S3 client from configuration.
    pub fn new(config: &StorageSettings) -> Self {
        let credentials =
            Credentials::new(&config.access_key, &config.secret_key, None, None, "shiptrack");

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true); // Required for MinIO

        if let Some(ref endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        let store = Self {
            client: Client::from_conf(builder.build()),
        };
        info!(
            "S3 storage initialized: endpoint={}",
            config.endpoint.as_deref().unwrap_or("aws")
        );
        store
    }
}

/// Map an SDK error, recognising a missing bucket by its error code.
fn map_sdk_error<E>(bucket: &str, action: &str, err: E) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    if err.code() == Some(NO_SUCH_BUCKET) {
        StorageError::BucketNotFound(bucket.to_string())
    } else {
        StorageError::Backend(format!(
            "Failed to {} in bucket '{}': {}",
            action,
            bucket,
            DisplayErrorContext(&err)
        ))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| map_sdk_error(bucket, "upload object", e))?;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    StorageError::ObjectNotFound(key.to_string())
                } else {
                    map_sdk_error(bucket, "read object", service_error)
                }
            })?;

        let content_type = response.content_type().map(String::from);
        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to read S3 response body: {}", e)))?
            .into_bytes()
            .to_vec();

        Ok(StoredObject { data, content_type })
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(bucket, "delete object", e))?;
        Ok(())
    }

    async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(()),
            Err(e) => {
                let service_error = e.into_service_error();
                if !service_error.is_not_found() {
                    return Err(StorageError::Backend(format!(
                        "Failed to access bucket '{}': {}",
                        bucket,
                        DisplayErrorContext(&service_error)
                    )));
                }
                info!("Creating S3 bucket '{}'", bucket);
                self.client
                    .create_bucket()
                    .bucket(bucket)
                    .send()
                    .await
                    .map_err(|e| {
                        StorageError::Backend(format!(
                            "Failed to create bucket '{}': {}",
                            bucket,
                            DisplayErrorContext(&e)
                        ))
                    })?;
                Ok(())
            }
        }
    }
}
