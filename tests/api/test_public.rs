//! Public endpoints: health, stage list and file serving.

use actix_web::test;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_health_and_ready() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = public_json(&app, test::TestRequest::get().uri("/api/v1/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) = public_json(&app, test::TestRequest::get().uri("/api/v1/ready")).await;
    assert_eq!(status, 200);
    assert_eq!(body["database"], "connected");
}

#[actix_rt::test]
async fn test_stages_are_ordered() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let (status, body) = public_json(&app, test::TestRequest::get().uri("/api/v1/stages")).await;
    assert_eq!(status, 200);

    let stages = body.as_array().unwrap();
    assert_eq!(stages.len(), 9);
    assert_eq!(stages[0]["key"], "product_insurance_completed");
    assert_eq!(stages[0]["index"], 0);
    assert_eq!(stages[8]["key"], "dispatched_to_customer_warehouse");
}

#[actix_rt::test]
async fn test_serve_uploaded_file() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-FILE")).await;
    let id = shipment["id"].as_str().unwrap();
    let (status, body) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/media", id),
        &[("photo.png", b"png-bytes")],
    )
    .await;
    assert_eq!(status, 201, "{}", body);

    let url = body["accepted"][0]["public_url"].as_str().unwrap();
    assert!(url.starts_with("/api/v1/files/shipment-media/shipments/"));

    let resp = test::call_service(&app, test::TestRequest::get().uri(url).to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "image/png"
    );
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"png-bytes");
}

#[actix_rt::test]
async fn test_serve_file_rejects_unknown_bucket_and_missing_key() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let (status, _) = public_json(
        &app,
        test::TestRequest::get().uri("/api/v1/files/private-bucket/secret.txt"),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _) = public_json(
        &app,
        test::TestRequest::get().uri("/api/v1/files/shipment-media/missing.png"),
    )
    .await;
    assert_eq!(status, 404);
}
