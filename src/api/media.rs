//! Admin media API handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::config::UploadSettings;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AttachmentKind, MediaResponse, MediaUploadQuery, MediaUploadResponse, Stage, WsEvent,
};
use crate::services::{EventBroadcaster, Storage, upload};

/// List media of a shipment.
#[utoipa::path(
    get,
    path = "/api/v1/admin/shipments/{id}/media",
    tag = "Media",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    responses(
        (status = 200, description = "Media list", body = Vec<MediaResponse>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn list_media(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.require_shipment(id).await?;

    let media: Vec<MediaResponse> = pool
        .list_media(id)
        .await?
        .into_iter()
        .map(MediaResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(media))
}

/// Upload media files for one stage.
///
/// Files are processed in order. Rejected files are listed with a reason;
/// the request fails with 400 only when no file was accepted.
#[utoipa::path(
    post,
    path = "/api/v1/admin/shipments/{id}/media",
    tag = "Media",
    params(
        ("id" = Uuid, Path, description = "Shipment UUID"),
        ("stage" = Option<String>, Query, description = "Stage key or label; defaults to the current stage")
    ),
    request_body(content_type = "multipart/form-data", description = "One or more files"),
    responses(
        (status = 201, description = "Files stored", body = MediaUploadResponse),
        (status = 400, description = "No file accepted", body = MediaUploadResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn upload_media(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    broadcaster: web::Data<EventBroadcaster>,
    limits: web::Data<UploadSettings>,
    path: web::Path<Uuid>,
    query: web::Query<MediaUploadQuery>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let shipment = pool.require_shipment(id).await?;

    let stage = match query.into_inner().stage.filter(|s| !s.trim().is_empty()) {
        Some(raw) => Stage::parse(&raw)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown stage: {}", raw)))?,
        None => Stage::parse(&shipment.status).unwrap_or(Stage::FIRST),
    };

    let files = upload::read_files(&mut payload, **limits).await?;
    let response =
        upload::upload_media(&pool, &storage, id, stage, files, limits.max_file_size).await?;

    for item in &response.accepted {
        broadcaster.publish(WsEvent::media_uploaded(id, item.id, stage));
    }

    info!(
        "Media upload: shipment_id={}, stage={}, accepted={}, rejected={}",
        id,
        stage,
        response.accepted.len(),
        response.rejected.len()
    );

    if response.accepted.is_empty() {
        return Ok(HttpResponse::BadRequest().json(response));
    }
    Ok(HttpResponse::Created().json(response))
}

/// Delete one media file.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/shipments/{id}/media/{media_id}",
    tag = "Media",
    params(
        ("id" = Uuid, Path, description = "Shipment UUID"),
        ("media_id" = Uuid, Path, description = "Media UUID")
    ),
    responses(
        (status = 204, description = "Media deleted"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Media not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn delete_media(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (id, media_id) = path.into_inner();

    let media = pool
        .get_media(id, media_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Media {}", media_id)))?;

    if !pool.delete_media(media.id).await? {
        return Err(AppError::NotFound(format!("Media {}", media_id)));
    }

    if let Err(e) = storage.delete(&media.bucket, &media.object_key).await {
        warn!(
            "Media row deleted but object removal failed: bucket={}, key={}, error={}",
            media.bucket, media.object_key, e
        );
    }

    broadcaster.publish(WsEvent::attachment_deleted(id, media_id, AttachmentKind::Media));

    Ok(HttpResponse::NoContent().finish())
}

/// Configure media routes (mounted under `/admin`).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/shipments/{id}/media")
            .route(web::get().to(list_media))
            .route(web::post().to(upload_media)),
    )
    .service(
        web::resource("/shipments/{id}/media/{media_id}").route(web::delete().to(delete_media)),
    );
}
