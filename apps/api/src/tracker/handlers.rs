//! Axum route handlers for the job board.

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tracker::models::JobRecord;
use crate::tracker::store::TrackerError;

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<JobRecord>> {
    Json(state.job_store.load().await)
}

/// PUT /api/v1/jobs
///
/// Replaces the whole board. Ids must be non-blank and unique.
pub async fn handle_replace_jobs(
    State(state): State<AppState>,
    Json(jobs): Json<Vec<JobRecord>>,
) -> Result<Json<Vec<JobRecord>>, AppError> {
    check_ids(&jobs)?;
    let saved = state.job_store.replace(jobs).await?;
    Ok(Json(saved))
}

fn check_ids(jobs: &[JobRecord]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for (i, job) in jobs.iter().enumerate() {
        if job.id.trim().is_empty() {
            return Err(AppError::Validation(format!("jobs[{i}].id must not be blank")));
        }
        if !seen.insert(job.id.as_str()) {
            return Err(AppError::Validation(format!("Duplicate job id '{}'", job.id)));
        }
    }
    Ok(())
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.job_store.remove(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Job '{id}' not found")))
    }
}
