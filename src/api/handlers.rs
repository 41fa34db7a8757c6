//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{
    CatalogQuery, ErrorResponse, ReportResponse, SubmitRejection, SubmitResponse,
};
use crate::form::averages::GridAverages;
use crate::form::types::ConsumptionGrid;
use crate::report::SubmitError;
use crate::sections::SectionRecord;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn missing_param(name: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: format!("query parameter `{name}` is required"),
        }),
    )
}

/// `GET /catalog/departments` → 200 + sorted unique department list.
pub async fn get_departments(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.departments())
}

/// `GET /catalog/cities?department=X` → 200 + sorted unique city list.
pub async fn get_cities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let department = query.department.ok_or_else(|| missing_param("department"))?;
    Ok(Json(state.catalog.cities(&department)))
}

/// `GET /catalog/subsectors?department=X&city=Y` → 200 + subsector list.
pub async fn get_subsectors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let department = query.department.ok_or_else(|| missing_param("department"))?;
    let city = query.city.ok_or_else(|| missing_param("city"))?;
    Ok(Json(state.catalog.subsectors(&department, &city)))
}

/// `GET /catalog/entities?department=X&city=Y&subsector=Z` → 200 + entity list.
pub async fn get_entities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let department = query.department.ok_or_else(|| missing_param("department"))?;
    let city = query.city.ok_or_else(|| missing_param("city"))?;
    let subsector = query.subsector.ok_or_else(|| missing_param("subsector"))?;
    Ok(Json(state.catalog.entities(&department, &city, &subsector)))
}

/// Submits the next report section.
///
/// `POST /sections` with a tagged `SectionRecord` body:
/// - 201 + `SubmitResponse` on success
/// - 422 + `SubmitRejection` when section validation fails
/// - 409 when the section is out of order
pub async fn post_section(
    State(state): State<Arc<AppState>>,
    Json(record): Json<SectionRecord>,
) -> Result<(StatusCode, Json<SubmitResponse>), (StatusCode, Json<SubmitRejection>)> {
    let accepted = record.id();
    let mut submissions = state
        .submissions
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let inner = &mut *submissions;
    match inner.flow.submit(&mut inner.store, record) {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(SubmitResponse {
                accepted,
                next: inner.flow.current(),
            }),
        )),
        Err(SubmitError::Validation { section, errors }) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(SubmitRejection {
                error: format!("{section} failed validation"),
                details: errors,
            }),
        )),
        Err(err @ SubmitError::OutOfOrder { .. }) => Err((
            StatusCode::CONFLICT,
            Json(SubmitRejection {
                error: err.to_string(),
                details: Vec::new(),
            }),
        )),
        Err(SubmitError::Store(e)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SubmitRejection {
                error: e.to_string(),
                details: Vec::new(),
            }),
        )),
    }
}

/// `GET /report` → 200 + flow state and the assembled report.
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<ReportResponse> {
    let submissions = state
        .submissions
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let flow_state = match submissions.flow.current() {
        Some(id) => crate::report::FlowState::InProgress(id),
        None => crate::report::FlowState::Complete,
    };
    Json(ReportResponse {
        state: flow_state,
        report: submissions.store.report(),
    })
}

/// Pure averaging endpoint.
///
/// `POST /consumption/averages` with a `ConsumptionGrid` body:
/// - 200 + `GridAverages`
/// - 422 when the twelve rows are not in calendar order
pub async fn post_averages(
    Json(grid): Json<ConsumptionGrid>,
) -> Result<Json<GridAverages>, ApiError> {
    if !grid.in_calendar_order() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "monthly rows must list the 12 calendar months in order".to_string(),
            }),
        ));
    }
    Ok(Json(GridAverages::from_grid(&grid)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::catalog::LocationCatalog;
    use crate::report::AuditReport;

    fn make_state() -> Arc<AppState> {
        Arc::new(AppState::new(LocationCatalog::demo()))
    }

    fn json_request(uri: &str, method: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method(method)
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
    async fn departments_sorted() {
        let app = router(make_state());
        let req = Request::builder()
            .uri("/catalog/departments")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(
            json,
            serde_json::json!(["Antioquia", "Cundinamarca", "Valle del Cauca"])
        );
    }

    #[tokio::test]
    async fn cities_require_department() {
        let app = router(make_state());
        let req = Request::builder()
            .uri("/catalog/cities")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap_or("").contains("department"));
    }

    #[tokio::test]
    async fn entities_filtered_by_chain() {
        let app = router(make_state());
        let req = Request::builder()
            .uri("/catalog/entities?department=Antioquia&city=Medell%C3%ADn&subsector=Health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(
            json,
            serde_json::json!(["Clínica del Norte", "Hospital San Rafael"])
        );
    }

    #[tokio::test]
    async fn submit_first_section_advances() {
        let state = make_state();
        let app = router(Arc::clone(&state));

        let sample = AuditReport::sample();
        let record = SectionRecord::BuildingProfile(sample.building_profile.unwrap());
        let req = json_request("/sections", "POST", serde_json::to_value(&record).unwrap());
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let json = body_json(resp).await;
        assert_eq!(json["accepted"], "building_profile");
        assert_eq!(json["next"], "energy_sources");
    }

    #[tokio::test]
    async fn out_of_order_submission_conflicts() {
        let app = router(make_state());
        let sample = AuditReport::sample();
        let record = SectionRecord::EnergySources(sample.energy_sources.unwrap());
        let req = json_request("/sections", "POST", serde_json::to_value(&record).unwrap());
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_section_gets_details() {
        let app = router(make_state());
        let record =
            SectionRecord::BuildingProfile(crate::sections::BuildingProfile::default());
        let req = json_request("/sections", "POST", serde_json::to_value(&record).unwrap());
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(resp).await;
        let details = json["details"].as_array().unwrap();
        assert!(!details.is_empty());
        assert!(details.iter().any(|d| d["field"] == "department"));
    }

    #[tokio::test]
    async fn report_reflects_submissions() {
        let state = make_state();
        let sample = AuditReport::sample();
        {
            let mut submissions = state.submissions.lock().unwrap();
            let inner = &mut *submissions;
            for record in sample.sections() {
                inner.flow.submit(&mut inner.store, record).unwrap();
            }
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
        assert!(json["report"]["building_profile"].is_object());
    }

    #[tokio::test]
    async fn averages_endpoint_is_pure() {
        let app = router(make_state());
        let mut grid = ConsumptionGrid::empty();
        grid.row_mut(crate::form::types::Month::January).year1 = Some("30".to_string());

        let req = json_request(
            "/consumption/averages",
            "POST",
            serde_json::to_value(&grid).unwrap(),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["rows"][0], "10.00");
        assert_eq!(json["year1"], "2.50");
    }

    #[tokio::test]
    async fn shuffled_grid_rejected() {
        let app = router(make_state());
        let mut grid = ConsumptionGrid::empty();
        grid.monthly.swap(0, 1);

        let req = json_request(
            "/consumption/averages",
            "POST",
            serde_json::to_value(&grid).unwrap(),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
