//! Stage catalogue.

use actix_web::{HttpResponse, web};

use crate::models::{Stage, StageInfo};

/// List every shipment stage in order.
#[utoipa::path(
    get,
    path = "/api/v1/stages",
    tag = "Tracking",
    responses(
        (status = 200, description = "Ordered stage list", body = Vec<StageInfo>)
    )
)]
pub async fn list_stages() -> HttpResponse {
    let stages: Vec<StageInfo> = Stage::ALL.into_iter().map(StageInfo::from).collect();
    HttpResponse::Ok().json(stages)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/stages").route(web::get().to(list_stages)));
}
