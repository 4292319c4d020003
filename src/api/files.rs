//! File serving API handlers.
//!
//! Proxies stored objects for deployments without a public files URL.

use actix_web::{HttpResponse, web};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::Storage;

/// Serve a stored object with its content type.
#[utoipa::path(
    get,
    path = "/api/v1/files/{bucket}/{key}",
    tag = "Files",
    params(
        ("bucket" = String, Path, description = "Configured bucket name"),
        ("key" = String, Path, description = "Object key")
    ),
    responses(
        (status = 200, description = "File contents"),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn serve_file(
    storage: web::Data<Storage>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (bucket, key) = path.into_inner();

    if !storage.is_known_bucket(&bucket) || key.is_empty() || key.contains("..") {
        return Err(AppError::NotFound("File".to_string()));
    }

    debug!("Serving file: bucket={}, key={}", bucket, key);

    let object = storage.get(&bucket, &key).await?;

    let content_type = object.content_type.unwrap_or_else(|| {
        let ext = key.rsplit('.').next().unwrap_or("");
        Storage::content_type_for_extension(ext).to_string()
    });

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(("Cache-Control", "public, max-age=3600"))
        .body(object.data))
}

/// Configure file routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/files/{bucket}/{key:.*}").route(web::get().to(serve_file)));
}
