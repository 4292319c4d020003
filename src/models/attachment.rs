//! Media and document attachment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{DocumentType, Stage};
use crate::entity::{shipment_document, shipment_media};

/// Stage photo or file attached to a shipment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaResponse {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub stage: Stage,
    pub file_name: String,
    pub content_type: String,
    pub file_size: i64,
    pub bucket: String,
    pub object_key: String,
    pub public_url: String,
    pub checksum_sha256: String,
    pub created_at: DateTime<Utc>,
}

impl From<shipment_media::Model> for MediaResponse {
    fn from(m: shipment_media::Model) -> Self {
        Self {
            id: m.id,
            shipment_id: m.shipment_id,
            stage: Stage::parse(&m.stage).unwrap_or(Stage::FIRST),
            file_name: m.file_name,
            content_type: m.content_type,
            file_size: m.file_size,
            bucket: m.bucket,
            object_key: m.object_key,
            public_url: m.public_url,
            checksum_sha256: m.checksum_sha256,
            created_at: m.created_at,
        }
    }
}

/// Shipping document attached to a shipment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub document_type: DocumentType,
    pub file_name: String,
    pub content_type: String,
    pub file_size: i64,
    pub bucket: String,
    pub object_key: String,
    pub public_url: String,
    pub checksum_sha256: String,
    pub created_at: DateTime<Utc>,
}

impl From<shipment_document::Model> for DocumentResponse {
    fn from(m: shipment_document::Model) -> Self {
        Self {
            id: m.id,
            shipment_id: m.shipment_id,
            document_type: DocumentType::parse(&m.document_type)
                .unwrap_or(DocumentType::OtherDocuments),
            file_name: m.file_name,
            content_type: m.content_type,
            file_size: m.file_size,
            bucket: m.bucket,
            object_key: m.object_key,
            public_url: m.public_url,
            checksum_sha256: m.checksum_sha256,
            created_at: m.created_at,
        }
    }
}

/// Documents of a shipment plus the required types still missing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentResponse>,
    pub missing_required: Vec<DocumentType>,
}

/// A file that was not stored, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: String,
}

/// Outcome of a media upload request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaUploadResponse {
    pub accepted: Vec<MediaResponse>,
    pub rejected: Vec<RejectedFile>,
}

/// Outcome of a document upload request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentUploadResponse {
    pub accepted: Vec<DocumentResponse>,
    pub rejected: Vec<RejectedFile>,
}

/// Query for media uploads.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MediaUploadQuery {
    /// Stage key or label; defaults to the shipment's current stage.
    #[serde(default)]
    pub stage: Option<String>,
}
