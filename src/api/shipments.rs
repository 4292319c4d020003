//! Admin shipment API handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    ChangeStageRequest, DashboardResponse, DeleteShipmentResponse, ListShipmentsQuery,
    ShipmentListResponse, ShipmentRequest, ShipmentResponse, StageEventResponse, WsEvent,
};
use crate::services::{EventBroadcaster, Storage, shipments};

/// Number of shipments listed on the dashboard.
const DASHBOARD_RECENT: u64 = 5;

/// Admin session check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
}

/// Verify the admin key.
#[utoipa::path(
    get,
    path = "/api/v1/admin/session",
    tag = "Admin",
    responses(
        (status = 200, description = "Key is valid", body = SessionResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn session(_auth: AdminAuth) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        authenticated: true,
    })
}

/// Shipment counters and the newest shipments.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    tag = "Admin",
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn dashboard(_auth: AdminAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let (total, delivered) = pool.shipment_counts().await?;
    let recent = pool.recent_shipments(DASHBOARD_RECENT).await?;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        total,
        active: total.saturating_sub(delivered),
        delivered,
        recent: recent.into_iter().map(ShipmentResponse::from).collect(),
    }))
}

/// List shipments, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/shipments",
    tag = "Shipments",
    params(
        ("status" = Option<String>, Query, description = "Stage key or label"),
        ("q" = Option<String>, Query, description = "Tracking id substring"),
        ("limit" = Option<i32>, Query, description = "Maximum results (1-100, default 20)"),
        ("offset" = Option<i32>, Query, description = "Offset for pagination")
    ),
    responses(
        (status = 200, description = "Shipment list", body = ShipmentListResponse),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn list_shipments(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    query: web::Query<ListShipmentsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let stage = query.stage_filter()?;
    let search = query.search_term();
    let limit = query.clamped_limit();
    let offset = query.clamped_offset();

    let (shipments, total) = pool
        .list_shipments(stage, search.as_deref(), limit as u64, offset as u64)
        .await?;

    Ok(HttpResponse::Ok().json(ShipmentListResponse {
        shipments: shipments.into_iter().map(ShipmentResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// Create a shipment.
#[utoipa::path(
    post,
    path = "/api/v1/admin/shipments",
    tag = "Shipments",
    request_body = ShipmentRequest,
    responses(
        (status = 201, description = "Shipment created", body = ShipmentResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 409, description = "Tracking id already in use", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn create_shipment(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Json<ShipmentRequest>,
) -> AppResult<HttpResponse> {
    let fields = body.into_inner().validate()?;
    let shipment = pool.insert_shipment(&fields).await?;

    info!(
        "Shipment created: id={}, tracking_id={}, status={}",
        shipment.id, shipment.tracking_id, fields.status
    );
    broadcaster.publish(WsEvent::shipment_created(
        shipment.id,
        &shipment.tracking_id,
        fields.status,
    ));

    Ok(HttpResponse::Created().json(ShipmentResponse::from(shipment)))
}

/// Get a shipment by ID.
#[utoipa::path(
    get,
    path = "/api/v1/admin/shipments/{id}",
    tag = "Shipments",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    responses(
        (status = 200, description = "Shipment", body = ShipmentResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn get_shipment(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let shipment = pool.require_shipment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ShipmentResponse::from(shipment)))
}

/// Overwrite every editable field of a shipment.
#[utoipa::path(
    put,
    path = "/api/v1/admin/shipments/{id}",
    tag = "Shipments",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    request_body = ShipmentRequest,
    responses(
        (status = 200, description = "Shipment updated", body = ShipmentResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Tracking id already in use", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn update_shipment(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    body: web::Json<ShipmentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let fields = body.into_inner().validate()?;
    let (shipment, previous) = pool.update_shipment(id, &fields).await?;

    info!("Shipment updated: id={}, tracking_id={}", id, shipment.tracking_id);
    broadcaster.publish(WsEvent::shipment_updated(
        id,
        &shipment.tracking_id,
        fields.status,
    ));
    if let Some(previous) = previous {
        if fields.status.index() < previous.index() {
            warn!(
                "Shipment {} moved back from {} to {}",
                id, previous, fields.status
            );
        }
        broadcaster.publish(WsEvent::stage_changed(
            id,
            &shipment.tracking_id,
            Some(previous),
            fields.status,
        ));
    }

    Ok(HttpResponse::Ok().json(ShipmentResponse::from(shipment)))
}

/// Delete a shipment with its media, documents and history.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/shipments/{id}",
    tag = "Shipments",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    responses(
        (status = 200, description = "Shipment deleted", body = DeleteShipmentResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn delete_shipment(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let (shipment, response) = shipments::delete_shipment(&pool, &storage, id).await?;

    broadcaster.publish(WsEvent::shipment_deleted(id, &shipment.tracking_id));

    Ok(HttpResponse::Ok().json(response))
}

/// Move a shipment to another stage.
#[utoipa::path(
    post,
    path = "/api/v1/admin/shipments/{id}/stage",
    tag = "Shipments",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    request_body = ChangeStageRequest,
    responses(
        (status = 200, description = "Stage changed", body = ShipmentResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn change_stage(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    body: web::Json<ChangeStageRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let change = body.into_inner().validate()?;
    let (shipment, previous) = pool.change_shipment_stage(id, &change).await?;

    if change.stage.index() < previous.index() {
        warn!(
            "Shipment {} moved back from {} to {}",
            id, previous, change.stage
        );
    }
    info!(
        "Stage changed: id={}, tracking_id={}, {} -> {}",
        id, shipment.tracking_id, previous, change.stage
    );
    broadcaster.publish(WsEvent::stage_changed(
        id,
        &shipment.tracking_id,
        Some(previous),
        change.stage,
    ));

    Ok(HttpResponse::Ok().json(ShipmentResponse::from(shipment)))
}

/// Recorded stage changes, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/shipments/{id}/history",
    tag = "Shipments",
    params(("id" = Uuid, Path, description = "Shipment UUID")),
    responses(
        (status = 200, description = "Stage history", body = Vec<StageEventResponse>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn stage_history(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.require_shipment(id).await?;

    let events: Vec<StageEventResponse> = pool
        .list_stage_events(id)
        .await?
        .into_iter()
        .map(StageEventResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(events))
}

/// Configure admin shipment routes (mounted under `/admin`).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/session").route(web::get().to(session)))
        .service(web::resource("/dashboard").route(web::get().to(dashboard)))
        .service(
            web::resource("/shipments")
                .route(web::get().to(list_shipments))
                .route(web::post().to(create_shipment)),
        )
        .service(
            web::resource("/shipments/{id}")
                .route(web::get().to(get_shipment))
                .route(web::put().to(update_shipment))
                .route(web::delete().to(delete_shipment)),
        )
        .service(web::resource("/shipments/{id}/stage").route(web::post().to(change_stage)))
        .service(web::resource("/shipments/{id}/history").route(web::get().to(stage_history)));
}
