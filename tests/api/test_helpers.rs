//! Shared test helpers for API tests.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};
use serde_json::{Value, json};
use shiptrack_lib::auth::AdminKey;
use shiptrack_lib::config::{DatabaseSettings, StorageBackend, StorageSettings, UploadSettings};
use shiptrack_lib::db::DbPool;
use shiptrack_lib::services::{EventBroadcaster, MemoryStore, Storage};

/// Admin key used in tests.
pub const TEST_ADMIN_KEY: &str = "test-admin-key";

pub const MEDIA_BUCKET: &str = "shipment-media";
pub const DOCUMENT_BUCKETS: [&str; 3] = ["shipment-document", "shipment-documents", "documents"];

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "----shiptrack-test-boundary";

pub const MAX_FILE_SIZE: usize = 1024;

/// Everything a test needs to drive the app and inspect its state.
pub struct TestContext {
    pub pool: DbPool,
    pub store: Arc<MemoryStore>,
    pub storage: Storage,
    pub broadcaster: EventBroadcaster,
}

pub fn storage_settings() -> StorageSettings {
    StorageSettings {
        backend: StorageBackend::Memory,
        endpoint: None,
        region: "us-east-1".to_string(),
        access_key: String::new(),
        secret_key: String::new(),
        create_buckets: false,
        media_buckets: vec![MEDIA_BUCKET.to_string()],
        document_buckets: DOCUMENT_BUCKETS.iter().map(|b| b.to_string()).collect(),
        public_files_url: None,
    }
}

/// Fresh database and a store holding `buckets`.
pub async fn create_context(buckets: &[&str]) -> TestContext {
    let pool = DbPool::connect(&DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");

    let store = Arc::new(MemoryStore::with_buckets(buckets.iter().copied()));
    let storage = Storage::new(store.clone(), &storage_settings());

    TestContext {
        pool,
        store,
        storage,
        broadcaster: EventBroadcaster::new(),
    }
}

/// Context with every configured bucket present.
pub async fn default_context() -> TestContext {
    let mut buckets = vec![MEDIA_BUCKET];
    buckets.extend(DOCUMENT_BUCKETS);
    create_context(&buckets).await
}

/// Create a test app wired like the server.
pub async fn create_test_app(
    ctx: &TestContext,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.pool.clone()))
            .app_data(web::Data::new(ctx.storage.clone()))
            .app_data(web::Data::new(ctx.broadcaster.clone()))
            .app_data(web::Data::new(AdminKey::new(Some(TEST_ADMIN_KEY.to_string()))))
            .app_data(web::Data::new(UploadSettings {
                max_file_size: MAX_FILE_SIZE,
                max_files_per_request: 5,
            }))
            .service(
                web::scope("/api/v1")
                    .configure(shiptrack_lib::api::configure_public_routes)
                    .configure(shiptrack_lib::api::configure_admin_routes),
            ),
    )
    .await
}

/// Minimal valid shipment body.
pub fn shipment_body(tracking_id: &str) -> Value {
    json!({
        "tracking_id": tracking_id,
        "origin_country": "China",
        "origin_city": "Shenzhen",
        "destination_country": "India",
        "destination_city": "Mumbai",
        "current_location_country": "China",
        "current_location_city": "Shenzhen",
        "transport_mode": "Air Freight",
    })
}

/// Multipart body with one `files` field per `(name, bytes)` pair.
pub fn multipart_body(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, data) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n",
                name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Send a request with the admin key and return status and JSON body.
pub async fn admin_json<S>(
    app: &S,
    req: test::TestRequest,
) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = req
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Send an unauthenticated request and return status and JSON body.
pub async fn public_json<S>(app: &S, req: test::TestRequest) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Create a shipment via the admin API and return its JSON.
pub async fn create_shipment<S>(app: &S, body: Value) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = admin_json(
        app,
        test::TestRequest::post()
            .uri("/api/v1/admin/shipments")
            .set_json(body),
    )
    .await;
    assert_eq!(status, 201, "Failed to create shipment: {}", body);
    body
}

/// Upload files as multipart to `uri` with the admin key.
pub async fn upload_files<S>(app: &S, uri: &str, files: &[(&str, &[u8])]) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    admin_json(
        app,
        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(files)),
    )
    .await
}
