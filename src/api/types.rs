//! Request and response payloads for the API.

use serde::{Deserialize, Serialize};

use crate::report::{AuditReport, FlowState};
use crate::sections::{SectionId, ValidationError};

/// Generic error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters for the cascading catalog lookups.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub department: Option<String>,
    pub city: Option<String>,
    pub subsector: Option<String>,
}

/// Accepted submission: which section comes next, if any.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub accepted: SectionId,
    /// `None` once the report is complete.
    pub next: Option<SectionId>,
}

/// Rejected submission with per-field details.
#[derive(Debug, Serialize)]
pub struct SubmitRejection {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationError>,
}

/// Flow state plus the report assembled from stored records.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub state: FlowState,
    pub report: AuditReport,
}
