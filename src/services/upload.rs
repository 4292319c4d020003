//! Attachment upload flow.
//!
//! Files are handled one at a time in request order. Each file is validated,
//! stored under a randomized key in the first available candidate bucket, and
//! then recorded in the database. A failed insert removes the stored object
//! again.

use actix_multipart::Multipart;
use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::UploadSettings;
use crate::db::{DbPool, NewAttachment};
use crate::error::{AppError, AppResult};
use crate::models::{
    DocumentResponse, DocumentType, DocumentUploadResponse, MediaResponse, MediaUploadResponse,
    RejectedFile, Stage,
};
use crate::services::storage::{BucketKind, Storage};

/// Extensions accepted for media and documents.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "pdf", "doc", "docx", "xls", "xlsx", "csv", "txt",
];

/// A file read from a multipart body.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: String,
    /// Empty when the file exceeded the size limit.
    pub data: Vec<u8>,
    /// Bytes received.
    pub size: usize,
}

/// Read every file field of a multipart body.
///
/// Bytes beyond `max_file_size` are discarded so an oversized file is still
/// reported per file instead of failing the request. The request fails once
/// the whole body exceeds `max_request_size`.
pub async fn read_files(
    payload: &mut Multipart,
    limits: UploadSettings,
) -> AppResult<Vec<IncomingFile>> {
    let mut files = Vec::new();
    let max_total = limits.max_request_size();
    let mut total = 0usize;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        // Form fields without a filename carry no file
        let Some(file_name) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
        else {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            }
            continue;
        };

        if files.len() >= limits.max_files_per_request {
            return Err(AppError::InvalidInput(format!(
                "Too many files; at most {} per request",
                limits.max_files_per_request
            )));
        }

        let mut data = Vec::new();
        let mut size = 0usize;
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            size += chunk.len();
            total = total.saturating_add(chunk.len());
            if total > max_total {
                return Err(AppError::InvalidInput(format!(
                    "Request body exceeds {} bytes",
                    max_total
                )));
            }
            if size <= limits.max_file_size {
                data.extend_from_slice(&chunk);
            } else if !data.is_empty() {
                data = Vec::new();
            }
        }

        files.push(IncomingFile {
            file_name,
            data,
            size,
        });
    }

    if files.is_empty() {
        return Err(AppError::InvalidInput(
            "No files found in multipart body".to_string(),
        ));
    }

    Ok(files)
}

/// Validate a file and return its lower-cased extension, or the rejection reason.
pub fn validate_file(file: &IncomingFile, max_file_size: usize) -> Result<String, String> {
    let name = file.file_name.trim();

    if name.is_empty() {
        return Err("Empty file name".to_string());
    }

    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err("File name must not contain path separators or '..'".to_string());
    }

    let extension = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => return Err("File has no extension".to_string()),
    };
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "File extension '{}' not allowed. Allowed: {}",
            extension,
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }

    if file.size > max_file_size {
        return Err(format!(
            "File exceeds maximum size of {} bytes",
            max_file_size
        ));
    }

    Ok(extension)
}

/// Hex-encoded SHA-256 of `data`.
pub fn checksum_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Put a validated file into storage and describe the stored object.
async fn store_file(
    storage: &Storage,
    kind: BucketKind,
    shipment_id: Uuid,
    key: String,
    extension: &str,
    file: IncomingFile,
) -> AppResult<NewAttachment> {
    let content_type = Storage::content_type_for_extension(extension);
    let checksum = checksum_sha256(&file.data);
    let file_size = file.data.len() as i64;

    let bucket = storage
        .put_with_fallback(kind, &key, file.data, content_type)
        .await?;
    let public_url = storage.public_url(&bucket, &key);

    Ok(NewAttachment {
        id: Uuid::now_v7(),
        shipment_id,
        file_name: file.file_name.trim().to_string(),
        content_type: content_type.to_string(),
        file_size,
        bucket,
        object_key: key,
        public_url,
        checksum_sha256: checksum,
    })
}

/// Remove an object after its row could not be written.
async fn compensate(storage: &Storage, bucket: &str, key: &str) {
    if let Err(e) = storage.delete(bucket, key).await {
        warn!(
            "Failed to remove object after insert failure: bucket={}, key={}, error={}",
            bucket, key, e
        );
    }
}

/// Remove objects best effort; returns `bucket/key` of each one that failed.
pub async fn remove_objects<'a, I>(storage: &Storage, objects: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut orphaned = Vec::new();
    for (bucket, key) in objects {
        if let Err(e) = storage.delete(bucket, key).await {
            warn!(
                "Failed to remove stored object: bucket={}, key={}, error={}",
                bucket, key, e
            );
            orphaned.push(format!("{}/{}", bucket, key));
        }
    }
    orphaned
}

/// Store media files for one stage of a shipment.
pub async fn upload_media(
    pool: &DbPool,
    storage: &Storage,
    shipment_id: Uuid,
    stage: Stage,
    files: Vec<IncomingFile>,
    max_file_size: usize,
) -> AppResult<MediaUploadResponse> {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for file in files {
        let extension = match validate_file(&file, max_file_size) {
            Ok(ext) => ext,
            Err(reason) => {
                rejected.push(RejectedFile {
                    file_name: file.file_name,
                    reason,
                });
                continue;
            }
        };

        let key = Storage::media_key(shipment_id, stage, &extension);
        let new = store_file(storage, BucketKind::Media, shipment_id, key, &extension, file).await?;
        let (bucket, key) = (new.bucket.clone(), new.object_key.clone());

        match pool.insert_media(new, stage).await {
            Ok(row) => {
                info!(
                    "Media stored: shipment_id={}, stage={}, bucket={}, key={}",
                    shipment_id, stage, bucket, key
                );
                accepted.push(MediaResponse::from(row));
            }
            Err(e) => {
                compensate(storage, &bucket, &key).await;
                return Err(e);
            }
        }
    }

    Ok(MediaUploadResponse { accepted, rejected })
}

/// Store documents of one type for a shipment.
///
/// Single-slot types keep only the first valid file and replace the document
/// already on record.
pub async fn upload_documents(
    pool: &DbPool,
    storage: &Storage,
    shipment_id: Uuid,
    document_type: DocumentType,
    files: Vec<IncomingFile>,
    max_file_size: usize,
) -> AppResult<DocumentUploadResponse> {
    let mut accepted: Vec<DocumentResponse> = Vec::new();
    let mut rejected = Vec::new();

    for file in files {
        let extension = match validate_file(&file, max_file_size) {
            Ok(ext) => ext,
            Err(reason) => {
                rejected.push(RejectedFile {
                    file_name: file.file_name,
                    reason,
                });
                continue;
            }
        };

        if document_type.is_single_slot() && !accepted.is_empty() {
            rejected.push(RejectedFile {
                file_name: file.file_name,
                reason: format!("only one file allowed for {}", document_type),
            });
            continue;
        }

        let key = Storage::document_key(shipment_id, document_type, &extension);
        let new =
            store_file(storage, BucketKind::Document, shipment_id, key, &extension, file).await?;
        let (bucket, key) = (new.bucket.clone(), new.object_key.clone());

        let result = if document_type.is_single_slot() {
            pool.replace_document(new, document_type).await
        } else {
            pool.insert_document(new, document_type)
                .await
                .map(|row| (row, Vec::new()))
        };

        match result {
            Ok((row, replaced)) => {
                if !replaced.is_empty() {
                    info!(
                        "Replacing {} previous {} document(s) for shipment {}",
                        replaced.len(),
                        document_type,
                        shipment_id
                    );
                    remove_objects(
                        storage,
                        replaced
                            .iter()
                            .map(|d| (d.bucket.as_str(), d.object_key.as_str())),
                    )
                    .await;
                }
                info!(
                    "Document stored: shipment_id={}, type={}, bucket={}, key={}",
                    shipment_id, document_type, bucket, key
                );
                accepted.push(DocumentResponse::from(row));
            }
            Err(e) => {
                compensate(storage, &bucket, &key).await;
                return Err(e);
            }
        }
    }

    Ok(DocumentUploadResponse { accepted, rejected })
}
