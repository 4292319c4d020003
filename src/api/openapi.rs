//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::config::ADMIN_KEY_HEADER;
use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shiptrack Server",
        version = "0.1.0",
        description = "Shipment tracking API: public tracking by tracking id and an admin console API for shipments, stage changes, media and documents"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Public endpoints
        api::stages::list_stages,
        api::tracking::track_shipment,
        api::files::serve_file,
        // Admin endpoints
        api::shipments::session,
        api::shipments::dashboard,
        api::shipments::list_shipments,
        api::shipments::create_shipment,
        api::shipments::get_shipment,
        api::shipments::update_shipment,
        api::shipments::delete_shipment,
        api::shipments::change_stage,
        api::shipments::stage_history,
        api::media::list_media,
        api::media::upload_media,
        api::media::delete_media,
        api::documents::list_documents,
        api::documents::upload_documents,
        api::documents::delete_document,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Stages
            models::Stage,
            models::StageInfo,
            models::StageProgress,
            models::TransportMode,
            models::DocumentType,
            // Shipments
            models::ShipmentRequest,
            models::ShipmentResponse,
            models::ShipmentListResponse,
            models::ListShipmentsQuery,
            models::ChangeStageRequest,
            models::StageEventResponse,
            models::DashboardResponse,
            models::DeleteShipmentResponse,
            api::shipments::SessionResponse,
            // Tracking
            models::TimelineEntry,
            models::TrackingResponse,
            // Attachments
            models::MediaResponse,
            models::DocumentResponse,
            models::DocumentListResponse,
            models::RejectedFile,
            models::MediaUploadResponse,
            models::DocumentUploadResponse,
            models::MediaUploadQuery,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Tracking", description = "Public shipment tracking"),
        (name = "Files", description = "Stored media and document files"),
        (name = "Admin", description = "Admin session and dashboard"),
        (name = "Shipments", description = "Shipment management"),
        (name = "Media", description = "Per-stage shipment media"),
        (name = "Documents", description = "Shipping documents")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add admin key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(ADMIN_KEY_HEADER),
                    ),
                ),
            );
        }
    }
}
