//! REST API for catalog lookups and section submission.
//!
//! Endpoints:
//! - `GET /catalog/departments|cities|subsectors|entities` — cascading
//!   location lookups
//! - `POST /sections` — submit the next report section
//! - `GET /report` — flow state and the report assembled so far
//! - `POST /consumption/averages` — pure grid averaging

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::routing::{get, post};

use crate::catalog::LocationCatalog;
use crate::report::{MemoryStore, ReportFlow};

/// Mutable submission state: the flow position and the record store.
///
/// Grouped under one lock since every submission touches both.
#[derive(Debug, Default)]
pub struct Submissions {
    pub flow: ReportFlow,
    pub store: MemoryStore,
}

/// Application state shared across all request handlers.
///
/// The catalog is read-only; submissions arrive after startup and sit
/// behind a `Mutex`.
pub struct AppState {
    /// Location catalog backing the section A selectors.
    pub catalog: LocationCatalog,
    /// Submission flow and store.
    pub submissions: Mutex<Submissions>,
}

impl AppState {
    /// Fresh state with an empty report flow.
    pub fn new(catalog: LocationCatalog) -> Self {
        Self {
            catalog,
            submissions: Mutex::new(Submissions::default()),
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/catalog/departments", get(handlers::get_departments))
        .route("/catalog/cities", get(handlers::get_cities))
        .route("/catalog/subsectors", get(handlers::get_subsectors))
        .route("/catalog/entities", get(handlers::get_entities))
        .route("/sections", post(handlers::post_section))
        .route("/report", get(handlers::get_report))
        .route("/consumption/averages", post(handlers::post_averages))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
