//! Image relocation API handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use relocator_core::{JobId, JobStatusReport, UploadedList};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for starting a relocation job
#[derive(Debug, Deserialize)]
pub struct StartJobBody {
    /// Source URLs; duplicates are relocated once
    pub urls: Vec<String>,
}

/// Response for a started job
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartJobResponse {
    pub job_id: JobId,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Start relocating a set of URLs
pub async fn start_job(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartJobBody>, JsonRejection>,
) -> Result<Json<StartJobResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        debug!(error = %e, "Rejected upload request body");
        api_error(StatusCode::BAD_REQUEST, e.body_text())
    })?;

    let job_id = state.relocator().start(body.urls);
    Ok(Json(StartJobResponse { job_id }))
}

/// Get the status of one job
pub async fn get_job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusReport>, ApiError> {
    let id: JobId = job_id.parse().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid job id: {}", job_id),
        )
    })?;

    match state.relocator().query_job(id) {
        Ok(job) => Ok(Json(JobStatusReport::from(&job))),
        Err(e) if e.is_not_found() => Err(api_error(StatusCode::NOT_FOUND, e.to_string())),
        Err(e) => {
            error!(job_id = %id, error = %e, "Failed to query job");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// List every new location produced so far
pub async fn list_uploaded(State(state): State<Arc<AppState>>) -> Json<UploadedList> {
    Json(UploadedList::from_jobs(&state.relocator().jobs()))
}
