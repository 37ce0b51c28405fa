//! Axum route handler for compiling raw LaTeX.

use axum::{extract::State, response::Response, Json};
use serde::Deserialize;

use crate::builder::handlers::{pdf_response, INLINE_DISPOSITION};
use crate::compile::chain::{compile_latex, CompileError};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    #[serde(default, alias = "document")]
    pub latex_source: String,
}

impl From<CompileError> for AppError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Workspace(e) => AppError::Internal(anyhow::Error::new(e)),
            exhausted @ CompileError::Exhausted { .. } => AppError::Upstream(exhausted.to_string()),
        }
    }
}

/// POST /api/v1/resume/compile
///
/// Runs the configured compiler chain and returns the PDF for inline viewing.
pub async fn handle_compile(
    State(state): State<AppState>,
    Json(request): Json<CompileRequest>,
) -> Result<Response, AppError> {
    if request.latex_source.trim().is_empty() {
        return Err(AppError::Validation("No LaTeX source provided".to_string()));
    }

    let bytes = compile_latex(&request.latex_source, &state.compilers).await?;
    Ok(pdf_response(bytes, INLINE_DISPOSITION))
}
