//! Admin shipment management.

use actix_web::test;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde_json::json;
use shiptrack_lib::models::WsEvent;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_normalizes_and_defaults() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let body = create_shipment(&app, shipment_body("  bf-1001 ")).await;

    assert_eq!(body["tracking_id"], "BF-1001");
    assert_eq!(body["status"], "product_insurance_completed");
    assert_eq!(body["transport_mode"], "air");
    assert_eq!(body["package_count"], 1);
    assert!(
        body["estimated_delivery"].is_string(),
        "ETA is computed from the transport mode"
    );
}

#[actix_rt::test]
async fn test_create_rejects_missing_fields_and_bad_stage() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let mut body = shipment_body("BF-1");
    body["origin_city"] = json!("   ");
    let (status, resp) = admin_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/shipments")
            .set_json(body),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(resp["error"], "INVALID_INPUT");

    let mut body = shipment_body("BF-1");
    body["status"] = json!("teleported");
    let (status, _) = admin_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/shipments")
            .set_json(body),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_duplicate_tracking_id_conflicts() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    create_shipment(&app, shipment_body("BF-DUP")).await;

    let (status, body) = admin_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/shipments")
            .set_json(shipment_body("bf-dup")),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "CONFLICT");
}

#[actix_rt::test]
async fn test_create_publishes_event() {
    let ctx = default_context().await;
    let mut rx = ctx.broadcaster.subscribe();
    let app = create_test_app(&ctx).await;

    let body = create_shipment(&app, shipment_body("BF-EVT")).await;

    let message = rx.try_recv().expect("event published");
    match message.event {
        WsEvent::ShipmentCreated(payload) => {
            assert_eq!(payload.tracking_id, "BF-EVT");
            assert_eq!(payload.shipment_id.to_string(), body["id"].as_str().unwrap());
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[actix_rt::test]
async fn test_get_update_and_not_found() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let created = create_shipment(&app, shipment_body("BF-UPD")).await;
    let id = created["id"].as_str().unwrap();
    let created_on = created["created_at"]
        .as_str()
        .unwrap()
        .parse::<DateTime<Utc>>()
        .unwrap()
        .date_naive();
    let eta = |v: &serde_json::Value| {
        NaiveDate::parse_from_str(v["estimated_delivery"].as_str().unwrap(), "%Y-%m-%d").unwrap()
    };
    assert_eq!(eta(&created), created_on + Days::new(15), "Air ETA");

    let mut body = shipment_body("BF-UPD");
    body["transport_mode"] = json!("Sea Freight");
    body["status"] = json!("In Transit to India");
    body["shipper_name"] = json!("Acme Exports");
    let (status, updated) = admin_json(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/admin/shipments/{}", id))
            .set_json(body),
    )
    .await;
    assert_eq!(status, 200, "{}", updated);
    assert_eq!(updated["transport_mode"], "sea");
    assert_eq!(updated["status"], "in_transit_to_india");
    assert_eq!(updated["shipper_name"], "Acme Exports");
    // No explicit ETA: recomputed from the new mode and the original creation date
    assert_eq!(eta(&updated), created_on + Days::new(45), "Sea ETA");

    let (status, fetched) = admin_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/admin/shipments/{}", id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(fetched["shipper_name"], "Acme Exports");

    // Status change through update is recorded in the history
    let (_, history) = admin_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/admin/shipments/{}/history", id)),
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 2);

    let (status, _) = admin_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/shipments/0191c4b2-0000-7000-8000-000000000000"),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_update_to_taken_tracking_id_conflicts() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    create_shipment(&app, shipment_body("BF-A")).await;
    let b = create_shipment(&app, shipment_body("BF-B")).await;

    let (status, _) = admin_json(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/admin/shipments/{}", b["id"].as_str().unwrap()))
            .set_json(shipment_body("BF-A")),
    )
    .await;
    assert_eq!(status, 409);
}

#[actix_rt::test]
async fn test_list_filters_and_paginates() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    for i in 0..3 {
        create_shipment(&app, shipment_body(&format!("AIR-{}", i))).await;
    }
    let mut body = shipment_body("SEA-1");
    body["status"] = json!("pickup_completed_at_origin");
    create_shipment(&app, body).await;

    let (status, all) = admin_json(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/shipments"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(all["total"], 4);
    assert_eq!(all["limit"], 20);
    assert_eq!(all["shipments"][0]["tracking_id"], "SEA-1", "Newest first");

    let (_, searched) = admin_json(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/shipments?q=air"),
    )
    .await;
    assert_eq!(searched["total"], 3);

    let (_, by_stage) = admin_json(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/shipments?status=pickup_completed_at_origin"),
    )
    .await;
    assert_eq!(by_stage["total"], 1);
    assert_eq!(by_stage["shipments"][0]["tracking_id"], "SEA-1");

    let (_, page) = admin_json(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/shipments?limit=2&offset=3"),
    )
    .await;
    assert_eq!(page["total"], 4);
    assert_eq!(page["shipments"].as_array().unwrap().len(), 1);

    let (status, _) = admin_json(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/shipments?status=nowhere"),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_search_matches_wildcard_characters_literally() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    create_shipment(&app, shipment_body("BF-1")).await;
    create_shipment(&app, shipment_body("BFX1")).await;

    let (status, none) = admin_json(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/shipments?q=BF_1"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(none["total"], 0, "{}", none);

    let (_, none) = admin_json(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/shipments?q=BF%251"),
    )
    .await;
    assert_eq!(none["total"], 0, "{}", none);

    create_shipment(&app, shipment_body("BF_1")).await;
    let (_, exact) = admin_json(
        &app,
        test::TestRequest::get().uri("/api/v1/admin/shipments?q=bf_1"),
    )
    .await;
    assert_eq!(exact["total"], 1);
    assert_eq!(exact["shipments"][0]["tracking_id"], "BF_1");
}

#[actix_rt::test]
async fn test_change_stage_records_history_and_location() {
    let ctx = default_context().await;
    let mut rx = ctx.broadcaster.subscribe();
    let app = create_test_app(&ctx).await;

    let created = create_shipment(&app, shipment_body("BF-STG")).await;
    let id = created["id"].as_str().unwrap();
    let _ = rx.try_recv();

    let (status, updated) = admin_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/admin/shipments/{}/stage", id))
            .set_json(json!({
                "stage": "Pickup Completed at Origin",
                "location_city": "Guangzhou",
                "location_country": "China",
                "note": "Picked up by carrier",
            })),
    )
    .await;
    assert_eq!(status, 200, "{}", updated);
    assert_eq!(updated["status"], "pickup_completed_at_origin");
    assert_eq!(updated["current_location_city"], "Guangzhou");

    let message = rx.try_recv().expect("stage event published");
    match message.event {
        WsEvent::StageChanged(payload) => {
            assert_eq!(
                payload.previous_stage.map(|s| s.as_str()),
                Some("product_insurance_completed")
            );
            assert_eq!(payload.stage.as_str(), "pickup_completed_at_origin");
        }
        other => panic!("unexpected event: {:?}", other),
    }

    let (_, history) = admin_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/admin/shipments/{}/history", id)),
    )
    .await;
    let events = history.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["stage"], "product_insurance_completed");
    assert_eq!(events[1]["stage"], "pickup_completed_at_origin");
    assert_eq!(events[1]["previous_stage"], "product_insurance_completed");
    assert_eq!(events[1]["note"], "Picked up by carrier");

    // Moving backwards is allowed
    let (status, back) = admin_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/admin/shipments/{}/stage", id))
            .set_json(json!({ "stage": "supplier_payment_processed" })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(back["status"], "supplier_payment_processed");
    assert_eq!(back["current_location_city"], "Guangzhou");
}

#[actix_rt::test]
async fn test_change_stage_rejects_unknown_stage() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let created = create_shipment(&app, shipment_body("BF-BAD")).await;
    let (status, _) = admin_json(
        &app,
        test::TestRequest::post()
            .uri(&format!(
                "/api/v1/admin/shipments/{}/stage",
                created["id"].as_str().unwrap()
            ))
            .set_json(json!({ "stage": "lost_at_sea" })),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_dashboard_counts() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    create_shipment(&app, shipment_body("BF-D1")).await;
    let mut done = shipment_body("BF-D2");
    done["status"] = json!("dispatched_to_customer_warehouse");
    create_shipment(&app, done).await;

    let (status, body) =
        admin_json(&app, test::TestRequest::get().uri("/api/v1/admin/dashboard")).await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 2);
    assert_eq!(body["active"], 1);
    assert_eq!(body["delivered"], 1);
    assert_eq!(body["recent"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_delete_removes_rows_and_objects() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let created = create_shipment(&app, shipment_body("BF-DEL")).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/media", id),
        &[("a.jpg", b"a"), ("b.jpg", b"b")],
    )
    .await;
    assert_eq!(status, 201);
    let (status, _) = upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/documents/packing_list", id),
        &[("list.pdf", b"pdf")],
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(ctx.store.object_count().await, 3);

    let (status, body) = admin_json(
        &app,
        test::TestRequest::delete().uri(&format!("/api/v1/admin/shipments/{}", id)),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["deleted_media"], 2);
    assert_eq!(body["deleted_documents"], 1);
    assert_eq!(body["orphaned_objects"].as_array().unwrap().len(), 0);
    assert_eq!(ctx.store.object_count().await, 0);

    let (status, _) = admin_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/admin/shipments/{}", id)),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _) = admin_json(
        &app,
        test::TestRequest::delete().uri(&format!("/api/v1/admin/shipments/{}", id)),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_delete_reports_orphaned_objects() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let created = create_shipment(&app, shipment_body("BF-ORPH")).await;
    let id = created["id"].as_str().unwrap();
    upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/media", id),
        &[("a.jpg", b"a")],
    )
    .await;

    ctx.store.fail_bucket(MEDIA_BUCKET).await;

    let (status, body) = admin_json(
        &app,
        test::TestRequest::delete().uri(&format!("/api/v1/admin/shipments/{}", id)),
    )
    .await;
    assert_eq!(status, 200);
    let orphaned = body["orphaned_objects"].as_array().unwrap();
    assert_eq!(orphaned.len(), 1);
    assert!(orphaned[0].as_str().unwrap().starts_with("shipment-media/"));

    let (_, total) = ctx.pool.shipment_counts().await.unwrap();
    assert_eq!(total, 0, "Rows are gone even when storage cleanup fails");
}
