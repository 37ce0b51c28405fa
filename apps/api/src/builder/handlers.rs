//! Axum route handlers for the structured-form builder.

use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::builder::document::render_resume_pdf;
use crate::builder::models::{EntrySection, ResumeData};
use crate::errors::AppError;
use crate::layout::StandardFonts;

/// GET /api/v1/resume/seed
pub async fn handle_seed() -> Json<ResumeData> {
    Json(ResumeData::seed())
}

/// GET /api/v1/resume/blank
pub async fn handle_blank() -> Json<ResumeData> {
    Json(ResumeData::new_empty())
}

#[derive(Debug, Serialize)]
pub struct AddEntryResponse {
    pub id: String,
    pub data: ResumeData,
}

/// POST /api/v1/resume/entries/:section
///
/// Appends a blank entry to the posted form and returns it with the new id.
pub async fn handle_add_entry(
    Path(section): Path<EntrySection>,
    Json(mut data): Json<ResumeData>,
) -> Json<AddEntryResponse> {
    let id = data.add_entry(section);
    Json(AddEntryResponse { id, data })
}

/// POST /api/v1/resume/entries/:section/:id/remove
pub async fn handle_remove_entry(
    Path((section, id)): Path<(EntrySection, String)>,
    Json(mut data): Json<ResumeData>,
) -> Result<Json<ResumeData>, AppError> {
    if !data.remove_entry(section, &id) {
        return Err(AppError::NotFound(format!("No {section:?} entry with id '{id}'")));
    }
    Ok(Json(data))
}

/// POST /api/v1/resume/build
///
/// Renders the form data to a downloadable PDF. Layout runs on the blocking pool.
pub async fn handle_build(Json(data): Json<ResumeData>) -> Result<Response, AppError> {
    let bytes = tokio::task::spawn_blocking(move || render_resume_pdf(&data, &StandardFonts))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume build: {e}")))?
        .map_err(|e| AppError::Render(e.to_string()))?;

    info!(bytes = bytes.len(), "Resume PDF built");

    Ok(pdf_response(bytes, DOWNLOAD_DISPOSITION))
}

pub const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"resume.pdf\"";
pub const INLINE_DISPOSITION: &str = "inline; filename=\"resume.pdf\"";

pub fn pdf_response(bytes: Vec<u8>, disposition: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
