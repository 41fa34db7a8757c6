//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use energy_audit::api::{AppState, router};
use energy_audit::catalog::LocationCatalog;
use energy_audit::report::AuditReport;
use energy_audit::sections::SectionRecord;

fn make_state() -> Arc<AppState> {
    Arc::new(AppState::new(LocationCatalog::demo()))
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn full_report_submitted_over_http() {
    let state = make_state();

    for record in AuditReport::sample().sections() {
        let app = router(Arc::clone(&state));
        let req = json_post("/sections", serde_json::to_value(&record).unwrap());
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED, "section {}", record.id());
    }

    let app = router(state);
    let req = Request::builder()
        .uri("/report")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["state"], "complete");
    for key in [
        "building_profile",
        "energy_sources",
        "baseline_analysis",
        "savings_opportunities",
        "implemented_measures",
    ] {
        assert!(json["report"][key].is_object(), "missing {key}");
    }
}

#[tokio::test]
async fn catalog_chain_matches_submitted_profile() {
    let state = make_state();
    let sample = AuditReport::sample();
    let profile = sample.building_profile.unwrap();

    let app = router(Arc::clone(&state));
    let uri = format!(
        "/catalog/entities?department={}&city=Medell%C3%ADn&subsector={}",
        profile.department, profile.subsector
    );
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let entities: Vec<String> = serde_json::from_value(json).unwrap();
    assert!(entities.contains(&profile.entity_name));
}

#[tokio::test]
async fn submission_after_completion_conflicts() {
    let state = make_state();

    for record in AuditReport::sample().sections() {
        let app = router(Arc::clone(&state));
        let req = json_post("/sections", serde_json::to_value(&record).unwrap());
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let extra = SectionRecord::ImplementedMeasures(
        AuditReport::sample().implemented_measures.unwrap(),
    );
    let app = router(state);
    let req = json_post("/sections", serde_json::to_value(&extra).unwrap());
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn averages_round_trip_over_http() {
    let sample = AuditReport::sample();
    let sources = sample.energy_sources.unwrap();
    let grid = sources.consumption(energy_audit::form::types::Carrier::NaturalGas);

    let app = router(make_state());
    let req = json_post("/consumption/averages", serde_json::to_value(grid).unwrap());
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    // Gas grid: year1 = 800 + 20 * month index, years 2 and 3 untouched.
    // January row: (800 + 0 + 0) / 3.
    assert_eq!(json["rows"][0], "266.67");
    // Column 1: mean of 800..1020 stepping by 20.
    assert_eq!(json["year1"], "910.00");
    assert_eq!(json["year2"], "0.00");
}
