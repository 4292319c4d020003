//! Shipment tracking server entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::http::header::{self, HeaderName};
use actix_web::{App, HttpRequest, HttpServer, Result as ActixResult, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use shiptrack_lib::api::{self, ApiDoc};
use shiptrack_lib::auth::AdminKey;
use shiptrack_lib::config::{Config, StorageBackend};
use shiptrack_lib::db::DbPool;
use shiptrack_lib::middleware::RequestLogger;
use shiptrack_lib::services::{EventBroadcaster, MemoryStore, ObjectStore, S3Store, Storage};

/// SPA fallback handler - serves index.html for client-side routing.
async fn spa_fallback(req: HttpRequest) -> ActixResult<NamedFile> {
    let Some(static_dir) = req.app_data::<web::Data<PathBuf>>() else {
        return Err(actix_web::error::ErrorNotFound("Not found"));
    };
    Ok(NamedFile::open(static_dir.join("index.html"))?)
}

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and SHIPTRACK_ADMIN_KEY must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Shiptrack Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let pool = match DbPool::connect(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    info!("Database connection established");

    if let Err(e) = pool.run_migrations().await {
        error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }
    info!("Database migrations complete");

    let store: Arc<dyn ObjectStore> = match config.storage.backend {
        StorageBackend::S3 => Arc::new(S3Store::new(&config.storage)),
        StorageBackend::Memory => {
            warn!("Using in-memory object storage - files are lost on restart");
            Arc::new(MemoryStore::with_buckets(
                config.storage.known_buckets().cloned(),
            ))
        }
    };
    let storage = Storage::new(store, &config.storage);

    if config.storage.create_buckets {
        if let Err(e) = storage.ensure_primary_buckets().await {
            error!("Failed to prepare storage buckets: {}", e);
            std::process::exit(1);
        }
    }

    let admin_key = AdminKey::new(config.admin_key.clone());
    if !admin_key.is_configured() {
        warn!("No admin key configured - admin endpoints will reject every request");
    }

    let broadcaster = EventBroadcaster::new();
    let bind_address = config.bind_address();
    let upload = config.upload;
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();

    // Applies to plain payload extractors; multipart bodies are bounded in upload::read_files
    let max_request_size = upload.max_request_size();
    info!(
        "Upload limits: {}MB per file, {} files per request",
        upload.max_file_size / 1024 / 1024,
        upload.max_files_per_request
    );

    if static_dir.is_some() {
        info!("Static file serving enabled from {:?}", static_dir);
    }

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!("Starting server at http://{} ({} workers)", bind_address, cpus);
        cpus
    };

    let openapi = ApiDoc::openapi();

    let server = HttpServer::new(move || {
        let allowed_headers = vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-admin-key"),
        ];
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .max_age(3600)
        } else {
            // Same-origin only in production
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .max_age(3600)
        };

        let mut app = App::new()
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(broadcaster.clone()))
            .app_data(web::Data::new(admin_key.clone()))
            .app_data(web::Data::new(upload))
            .app_data(web::PayloadConfig::new(max_request_size))
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_public_routes)
                    .configure(api::configure_admin_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            );

        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(dir.clone()))
                .service(Files::new("/assets", dir.join("assets")).prefer_utf8(true))
                .default_service(web::route().to(spa_fallback));
        }

        app
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
