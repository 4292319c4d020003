//! Admin document API handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::config::UploadSettings;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AttachmentKind, DocumentListResponse, DocumentResponse, DocumentType, DocumentUploadResponse,
    WsEvent, missing_required,
};
use crate::services::{EventBroadcaster, Storage, upload};

/// List documents of a shipment with the required types still missing.
#[utoipa::path(
    get,
    path = "/api/v1/admin/shipments/{id}/documents",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    responses(
        (status = 200, description = "Document list", body = DocumentListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn list_documents(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.require_shipment(id).await?;

    let documents: Vec<DocumentResponse> = pool
        .list_documents(id)
        .await?
        .into_iter()
        .map(DocumentResponse::from)
        .collect();
    let present: Vec<DocumentType> = documents.iter().map(|d| d.document_type).collect();

    Ok(HttpResponse::Ok().json(DocumentListResponse {
        missing_required: missing_required(&present),
        documents,
    }))
}

/// Upload documents of one type.
///
/// Required types hold a single file; a new upload replaces the stored one.
#[utoipa::path(
    post,
    path = "/api/v1/admin/shipments/{id}/documents/{document_type}",
    tag = "Documents",
    params(
        ("id" = Uuid, Path, description = "Shipment UUID"),
        ("document_type" = DocumentType, Path, description = "Document type")
    ),
    request_body(content_type = "multipart/form-data", description = "One or more files"),
    responses(
        (status = 201, description = "Files stored", body = DocumentUploadResponse),
        (status = 400, description = "No file accepted or unknown type", body = DocumentUploadResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn upload_documents(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    broadcaster: web::Data<EventBroadcaster>,
    limits: web::Data<UploadSettings>,
    path: web::Path<(Uuid, String)>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let (id, raw_type) = path.into_inner();
    let document_type = DocumentType::parse(&raw_type)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown document type: {}", raw_type)))?;
    pool.require_shipment(id).await?;

    let files = upload::read_files(&mut payload, **limits).await?;
    let response = upload::upload_documents(
        &pool,
        &storage,
        id,
        document_type,
        files,
        limits.max_file_size,
    )
    .await?;

    for item in &response.accepted {
        broadcaster.publish(WsEvent::document_uploaded(id, item.id, document_type));
    }

    info!(
        "Document upload: shipment_id={}, type={}, accepted={}, rejected={}",
        id,
        document_type,
        response.accepted.len(),
        response.rejected.len()
    );

    if response.accepted.is_empty() {
        return Ok(HttpResponse::BadRequest().json(response));
    }
    Ok(HttpResponse::Created().json(response))
}

/// Delete one document.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/shipments/{id}/documents/{document_id}",
    tag = "Documents",
    params(
        ("id" = Uuid, Path, description = "Shipment UUID"),
        ("document_id" = Uuid, Path, description = "Document UUID")
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 400, description = "Invalid document id", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Document not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn delete_document(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<(Uuid, String)>,
) -> AppResult<HttpResponse> {
    let (id, raw_id) = path.into_inner();
    let document_id = Uuid::parse_str(&raw_id)?;

    let document = pool
        .get_document(id, document_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {}", document_id)))?;

    if !pool.delete_document(document.id).await? {
        return Err(AppError::NotFound(format!("Document {}", document_id)));
    }

    if let Err(e) = storage.delete(&document.bucket, &document.object_key).await {
        warn!(
            "Document row deleted but object removal failed: bucket={}, key={}, error={}",
            document.bucket, document.object_key, e
        );
    }

    broadcaster.publish(WsEvent::attachment_deleted(
        id,
        document_id,
        AttachmentKind::Document,
    ));

    Ok(HttpResponse::NoContent().finish())
}

/// Configure document routes (mounted under `/admin`).
///
/// Upload and delete share one path pattern; the segment is a document type
/// for uploads and a document id for deletes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/shipments/{id}/documents").route(web::get().to(list_documents)))
        .service(
            web::resource("/shipments/{id}/documents/{item}")
                .route(web::post().to(upload_documents))
                .route(web::delete().to(delete_document)),
        );
}
