//! Axum route handlers for the patch pipeline.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::patch::applicator::{apply_patch, ApplyOutcome};
use crate::patch::generator::generate_patch;
use crate::patch::schema::{validate_patch, Patch};
use crate::state::AppState;
use crate::template::{extract_regions, unclosed_block_ids, Region};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Missing fields deserialize as empty and are rejected by `generate_patch`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default, alias = "jobDescription")]
    pub guidance_text: String,
    #[serde(default, alias = "latexSource")]
    pub document: String,
}

#[derive(Debug, Deserialize)]
pub struct RegionsRequest {
    #[serde(default, alias = "latexSource")]
    pub document: String,
}

#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub regions: Vec<Region>,
    /// Start markers that do not open a region (unclosed or swallowed by an outer region).
    pub warnings: Vec<String>,
}

/// Missing fields deserialize as empty and are rejected in `handle_apply`.
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    #[serde(default, alias = "latexSource")]
    pub document: String,
    /// Raw so schema violations report a field path.
    #[serde(default)]
    pub patch: Value,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    #[serde(flatten)]
    pub outcome: ApplyOutcome,
    pub warnings: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/generate
///
/// Returns a patch for every region, from whichever strategy is configured.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Patch>, AppError> {
    let patch = generate_patch(
        &request.guidance_text,
        &request.document,
        &state.config.limits,
        state.patch_strategy.as_ref(),
    )
    .await?;

    Ok(Json(patch))
}

/// POST /api/v1/resume/regions
pub async fn handle_regions(Json(request): Json<RegionsRequest>) -> Json<RegionsResponse> {
    let regions = extract_regions(&request.document);
    let warnings = unclosed_block_ids(&request.document)
        .into_iter()
        .map(|id| format!("Block '{id}' has no matching %</BLOCK>"))
        .collect();

    Json(RegionsResponse { regions, warnings })
}

/// POST /api/v1/resume/apply
///
/// Validates the patch, then applies it. Unknown ids come back as warnings.
pub async fn handle_apply(
    Json(request): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, AppError> {
    if request.document.trim().is_empty() {
        return Err(AppError::Validation("No document provided".to_string()));
    }
    let patch = validate_patch(&request.patch)
        .map_err(|e| AppError::Validation(format!("Invalid patch at {e}")))?;

    let outcome = apply_patch(&request.document, &patch);
    let warnings = outcome.missing_warning().into_iter().collect();

    Ok(Json(ApplyResponse { outcome, warnings }))
}
