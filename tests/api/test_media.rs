//! Stage media uploads and deletes.

use actix_web::test;
use serde_json::json;
use shiptrack_lib::models::{DocumentType, Stage};
use shiptrack_lib::services::upload::{self, IncomingFile};
use uuid::Uuid;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_upload_defaults_to_current_stage() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let mut body = shipment_body("BF-MED");
    body["status"] = json!("pickup_completed_at_origin");
    let shipment = create_shipment(&app, body).await;
    let id = shipment["id"].as_str().unwrap();

    let (status, body) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/media", id),
        &[("Crate.JPG", b"jpeg-bytes")],
    )
    .await;
    assert_eq!(status, 201, "{}", body);

    let item = &body["accepted"][0];
    assert_eq!(item["stage"], "pickup_completed_at_origin");
    assert_eq!(item["file_name"], "Crate.JPG");
    assert_eq!(item["content_type"], "image/jpeg");
    assert_eq!(item["file_size"], 10);
    assert_eq!(item["bucket"], MEDIA_BUCKET);
    assert_eq!(item["checksum_sha256"].as_str().unwrap().len(), 64);
    let key = item["object_key"].as_str().unwrap();
    assert!(key.starts_with(&format!("shipments/{}/pickup_completed_at_origin/", id)));
    assert!(key.ends_with(".jpg"));
    assert!(ctx.store.contains(MEDIA_BUCKET, key).await);
}

#[actix_rt::test]
async fn test_upload_with_explicit_stage_and_partial_rejection() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-MIX")).await;
    let id = shipment["id"].as_str().unwrap();
    let too_big = vec![0u8; MAX_FILE_SIZE + 1];

    let (status, body) = upload_files(
        &app,
        &format!(
            "/api/v1/admin/shipments/{}/media?stage=in_transit_to_india",
            id
        ),
        &[
            ("ok.png", b"png"),
            ("script.exe", b"MZ"),
            ("huge.jpg", &too_big),
        ],
    )
    .await;
    assert_eq!(status, 201, "{}", body);
    assert_eq!(body["accepted"].as_array().unwrap().len(), 1);
    assert_eq!(body["accepted"][0]["stage"], "in_transit_to_india");

    let rejected = body["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 2);
    assert_eq!(rejected[0]["file_name"], "script.exe");
    assert_eq!(rejected[1]["file_name"], "huge.jpg");
    assert_eq!(ctx.store.object_count().await, 1);
}

#[actix_rt::test]
async fn test_upload_all_rejected_is_bad_request() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-REJ")).await;
    let (status, body) = upload_files(
        &app,
        &format!(
            "/api/v1/admin/shipments/{}/media",
            shipment["id"].as_str().unwrap()
        ),
        &[("notes", b"no extension")],
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["accepted"].as_array().unwrap().len(), 0);
    assert_eq!(body["rejected"][0]["reason"], "File has no extension");
}

#[actix_rt::test]
async fn test_upload_to_unknown_shipment_or_stage() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let (status, _) = upload_files(
        &app,
        "/api/v1/admin/shipments/0191c4b2-0000-7000-8000-000000000000/media",
        &[("a.png", b"a")],
    )
    .await;
    assert_eq!(status, 404);

    let shipment = create_shipment(&app, shipment_body("BF-STAGE")).await;
    let (status, _) = upload_files(
        &app,
        &format!(
            "/api/v1/admin/shipments/{}/media?stage=moon_landing",
            shipment["id"].as_str().unwrap()
        ),
        &[("a.png", b"a")],
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(ctx.store.object_count().await, 0);
}

#[actix_rt::test]
async fn test_upload_fails_when_no_bucket_exists() {
    let ctx = create_context(&DOCUMENT_BUCKETS).await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-NOBKT")).await;
    let (status, body) = upload_files(
        &app,
        &format!(
            "/api/v1/admin/shipments/{}/media",
            shipment["id"].as_str().unwrap()
        ),
        &[("a.png", b"a")],
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "STORAGE_ERROR");
    let id = shipment["id"].as_str().unwrap().parse().unwrap();
    assert!(ctx.pool.list_media(id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_list_and_delete_media() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-LST")).await;
    let id = shipment["id"].as_str().unwrap();
    let (_, uploaded) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/media", id),
        &[("a.png", b"a"), ("b.png", b"b")],
    )
    .await;
    let media_id = uploaded["accepted"][0]["id"].as_str().unwrap();
    let key = uploaded["accepted"][0]["object_key"].as_str().unwrap();

    let (status, listed) = admin_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/admin/shipments/{}/media", id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let (status, _) = admin_json(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/shipments/{}/media/{}", id, media_id)),
    )
    .await;
    assert_eq!(status, 204);
    assert!(!ctx.store.contains(MEDIA_BUCKET, key).await);

    let (_, listed) = admin_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/admin/shipments/{}/media", id)),
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = admin_json(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/shipments/{}/media/{}", id, media_id)),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_too_many_files_is_bad_request() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-MANY")).await;
    let id = shipment["id"].as_str().unwrap();

    let files: Vec<(&str, &[u8])> = vec![
        ("a.png", &b"1"[..]),
        ("b.png", &b"2"[..]),
        ("c.png", &b"3"[..]),
        ("d.png", &b"4"[..]),
        ("e.png", &b"5"[..]),
        ("f.png", &b"6"[..]),
    ];
    let (status, body) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/media", id),
        &files,
    )
    .await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(body["error"], "INVALID_INPUT");
    assert_eq!(ctx.store.object_count().await, 0);

    let (status, _) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/media", id),
        &files[..5],
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(ctx.store.object_count().await, 5);
}

#[actix_rt::test]
async fn test_failed_insert_removes_stored_object() {
    let ctx = default_context().await;
    let missing = Uuid::new_v4();

    let file = || IncomingFile {
        file_name: "crate.png".to_string(),
        data: b"png-bytes".to_vec(),
        size: 9,
    };

    let result = upload::upload_media(
        &ctx.pool,
        &ctx.storage,
        missing,
        Stage::PickupCompletedAtOrigin,
        vec![file()],
        MAX_FILE_SIZE,
    )
    .await;
    assert!(result.is_err(), "insert must fail without a shipment row");
    assert_eq!(ctx.store.object_count().await, 0);

    let result = upload::upload_documents(
        &ctx.pool,
        &ctx.storage,
        missing,
        DocumentType::OtherDocuments,
        vec![file()],
        MAX_FILE_SIZE,
    )
    .await;
    assert!(result.is_err());
    assert_eq!(ctx.store.object_count().await, 0);
}

#[actix_rt::test]
async fn test_request_body_over_total_limit_is_rejected() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-BIG")).await;
    let id = shipment["id"].as_str().unwrap();

    // Each file is oversized; together they pass max_file_size * max_files_per_request
    let big = vec![0u8; MAX_FILE_SIZE * 3];
    let (status, body) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/media", id),
        &[("a.png", &big[..]), ("b.png", &big[..])],
    )
    .await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(body["error"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("Request body exceeds"));
    assert_eq!(ctx.store.object_count().await, 0);
}
