//! Shipping document uploads, replacement and bucket fallback.

use actix_web::test;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_missing_required_documents() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-DOC")).await;
    let id = shipment["id"].as_str().unwrap();

    let (status, body) = admin_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/admin/shipments/{}/documents", id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["documents"].as_array().unwrap().len(), 0);
    let missing: Vec<&str> = body["missing_required"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        missing,
        vec!["commercial_invoice", "bill_of_lading", "packing_list"]
    );

    let (status, _) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/documents/commercial_invoice", id),
        &[("invoice.pdf", b"inv")],
    )
    .await;
    assert_eq!(status, 201);

    let (_, body) = admin_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/admin/shipments/{}/documents", id)),
    )
    .await;
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);
    assert_eq!(body["missing_required"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_single_slot_document_is_replaced() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-BOL")).await;
    let id = shipment["id"].as_str().unwrap();
    let uri = format!("/api/v1/admin/shipments/{}/documents/bill_of_lading", id);

    let (_, first) = upload_files(&app, &uri, &[("bol-v1.pdf", b"v1")]).await;
    let first_key = first["accepted"][0]["object_key"].as_str().unwrap().to_string();

    let (status, second) = upload_files(
        &app,
        &uri,
        &[("bol-v2.pdf", b"v2"), ("bol-v3.pdf", b"v3")],
    )
    .await;
    assert_eq!(status, 201, "{}", second);
    assert_eq!(second["accepted"].as_array().unwrap().len(), 1);
    assert_eq!(second["accepted"][0]["file_name"], "bol-v2.pdf");
    assert_eq!(second["rejected"][0]["file_name"], "bol-v3.pdf");

    let (_, listed) = admin_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/admin/shipments/{}/documents", id)),
    )
    .await;
    let documents = listed["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["file_name"], "bol-v2.pdf");
    assert!(!ctx.store.contains(DOCUMENT_BUCKETS[0], &first_key).await);
    assert_eq!(ctx.store.object_count().await, 1);
}

#[actix_rt::test]
async fn test_multi_slot_documents_accumulate() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-OTH")).await;
    let uri = format!(
        "/api/v1/admin/shipments/{}/documents/other_documents",
        shipment["id"].as_str().unwrap()
    );

    upload_files(&app, &uri, &[("a.pdf", b"a"), ("b.xlsx", b"b")]).await;
    let (status, body) = upload_files(&app, &uri, &[("c.csv", b"c")]).await;
    assert_eq!(status, 201);
    assert_eq!(body["accepted"][0]["document_type"], "other_documents");
    assert_eq!(ctx.store.object_count().await, 3);
}

#[actix_rt::test]
async fn test_document_falls_back_to_next_bucket() {
    let ctx = create_context(&[MEDIA_BUCKET, DOCUMENT_BUCKETS[1]]).await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-FALL")).await;
    let (status, body) = upload_files(
        &app,
        &format!(
            "/api/v1/admin/shipments/{}/documents/packing_list",
            shipment["id"].as_str().unwrap()
        ),
        &[("list.pdf", b"pdf")],
    )
    .await;

    assert_eq!(status, 201, "{}", body);
    let item = &body["accepted"][0];
    assert_eq!(item["bucket"], DOCUMENT_BUCKETS[1]);
    assert!(
        item["public_url"]
            .as_str()
            .unwrap()
            .starts_with(&format!("/api/v1/files/{}/documents/", DOCUMENT_BUCKETS[1]))
    );
}

#[actix_rt::test]
async fn test_document_stops_on_backend_error() {
    let ctx = default_context().await;
    ctx.store.fail_bucket(DOCUMENT_BUCKETS[0]).await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-DOWN")).await;
    let (status, _) = upload_files(
        &app,
        &format!(
            "/api/v1/admin/shipments/{}/documents/packing_list",
            shipment["id"].as_str().unwrap()
        ),
        &[("list.pdf", b"pdf")],
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(ctx.store.object_count().await, 0);
}

#[actix_rt::test]
async fn test_unknown_document_type() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-TYPE")).await;
    let (status, body) = upload_files(
        &app,
        &format!(
            "/api/v1/admin/shipments/{}/documents/passport",
            shipment["id"].as_str().unwrap()
        ),
        &[("p.pdf", b"p")],
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_delete_document() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let shipment = create_shipment(&app, shipment_body("BF-DDEL")).await;
    let id = shipment["id"].as_str().unwrap();
    let (_, uploaded) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/documents/packing_list", id),
        &[("list.pdf", b"pdf")],
    )
    .await;
    let doc_id = uploaded["accepted"][0]["id"].as_str().unwrap();

    let (status, _) = admin_json(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/shipments/{}/documents/{}", id, doc_id)),
    )
    .await;
    assert_eq!(status, 204);
    assert_eq!(ctx.store.object_count().await, 0);

    let (status, _) = admin_json(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/shipments/{}/documents/{}", id, doc_id)),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _) = admin_json(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/shipments/{}/documents/not-a-uuid", id)),
    )
    .await;
    assert_eq!(status, 400);
}
