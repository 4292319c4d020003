//! API endpoint modules.

pub mod documents;
pub mod files;
pub mod health;
pub mod media;
pub mod openapi;
pub mod shipments;
pub mod stages;
pub mod tracking;
pub mod websocket;

use actix_web::web;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Routes reachable without credentials.
pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(stages::configure_routes)
        .configure(tracking::configure_routes)
        .configure(files::configure_routes);
}

/// Admin console routes under `/admin`; every handler requires the admin key.
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .configure(shipments::configure_routes)
            .configure(media::configure_routes)
            .configure(documents::configure_routes)
            .configure(websocket::configure_routes),
    );
}
