//! Public shipment tracking.

use actix_web::{HttpResponse, web};
use tracing::debug;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::TrackingResponse;
use crate::services::shipments;

/// Look up a shipment by tracking id.
///
/// Returns the shipment, its progress through the stage list, the per-stage
/// timeline with media of completed stages, and its documents.
#[utoipa::path(
    get,
    path = "/api/v1/track/{tracking_id}",
    tag = "Tracking",
    params(
        ("tracking_id" = String, Path, description = "Tracking id (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Tracking details", body = TrackingResponse),
        (status = 400, description = "Invalid tracking id", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn track_shipment(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let tracking_id = path.into_inner();
    debug!("Tracking lookup: {}", tracking_id);

    let view = shipments::track(&pool, &tracking_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/track/{tracking_id}").route(web::get().to(track_shipment)));
}
