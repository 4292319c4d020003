//! Public tracking view.

use actix_web::test;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_track_is_case_insensitive_and_public() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    create_shipment(&app, shipment_body("BF-TRK-1")).await;

    let (status, body) =
        public_json(&app, test::TestRequest::get().uri("/api/v1/track/bf-trk-1")).await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["shipment"]["tracking_id"], "BF-TRK-1");
    assert_eq!(body["current_stage"]["key"], "product_insurance_completed");
    assert_eq!(body["stage_progress"]["completed"], 1);
    assert_eq!(body["stage_progress"]["total"], 9);
    assert_eq!(body["stage_progress"]["percent"], 11);
    assert_eq!(body["timeline"].as_array().unwrap().len(), 9);
}

#[actix_rt::test]
async fn test_track_unknown_id() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let (status, body) =
        public_json(&app, test::TestRequest::get().uri("/api/v1/track/NOPE-1")).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) =
        public_json(&app, test::TestRequest::get().uri("/api/v1/track/bad%20id!")).await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_track_rejects_non_ascii_lookalikes() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    create_shipment(&app, shipment_body("BF-S1")).await;

    // "bf-\u{17f}1": the long s upper-cases to 'S' under Unicode rules
    let (status, body) =
        public_json(&app, test::TestRequest::get().uri("/api/v1/track/bf-%C5%BF1")).await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_timeline_uses_recorded_events_and_completed_media() {
    let ctx = default_context().await;
    let app = create_test_app(&ctx).await;

    let mut body = shipment_body("BF-TL");
    body["pickup_dispatched_through"] = json!("DHL");
    let shipment = create_shipment(&app, body).await;
    let id = shipment["id"].as_str().unwrap();

    // Jump straight to pickup; stages 1 and 2 are never recorded
    let (status, _) = admin_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/admin/shipments/{}/stage", id))
            .set_json(json!({ "stage": "pickup_completed_at_origin" })),
    )
    .await;
    assert_eq!(status, 200);

    upload_files(
        &app,
        &format!(
            "/api/v1/admin/shipments/{}/media?stage=pickup_completed_at_origin",
            id
        ),
        &[("pickup.jpg", b"p")],
    )
    .await;
    // Media for a stage that is not reached yet stays hidden
    upload_files(
        &app,
        &format!(
            "/api/v1/admin/shipments/{}/media?stage=in_transit_to_india",
            id
        ),
        &[("ship.jpg", b"s")],
    )
    .await;
    upload_files(
        &app,
        &format!("/api/v1/admin/shipments/{}/documents/packing_list", id),
        &[("list.pdf", b"l")],
    )
    .await;

    let (status, view) =
        public_json(&app, test::TestRequest::get().uri("/api/v1/track/BF-TL")).await;
    assert_eq!(status, 200, "{}", view);

    let timeline = view["timeline"].as_array().unwrap();
    assert_eq!(timeline[0]["completed"], true);
    assert!(timeline[0]["reached_at"].is_string());
    assert_eq!(timeline[1]["completed"], true);
    assert!(timeline[1]["reached_at"].is_null(), "Skipped stage has no timestamp");

    let pickup = &timeline[3];
    assert_eq!(pickup["current"], true);
    assert!(pickup["reached_at"].is_string());
    assert_eq!(pickup["dispatched_through"], "DHL");
    assert_eq!(pickup["media"].as_array().unwrap().len(), 1);

    let transit = &timeline[4];
    assert_eq!(transit["completed"], false);
    assert_eq!(transit["media"].as_array().unwrap().len(), 0);

    assert_eq!(view["stage_progress"]["completed"], 4);
    assert_eq!(view["documents"].as_array().unwrap().len(), 1);
}
