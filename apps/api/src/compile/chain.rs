//! Compile-to-PDF fallback chain.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::compile::backend::{AttemptError, CompilerBackend};

pub const INSTALL_HINT: &str = "No PDF produced. Install a TeX distribution (e.g., TeX Live) \
     or install \"tectonic\" for a lightweight compiler, then retry.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub backend: String,
    pub reason: AttemptError,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Could not prepare compile workspace: {0}")]
    Workspace(#[from] std::io::Error),

    #[error("{} ({})", INSTALL_HINT, describe(.attempts))]
    Exhausted { attempts: Vec<AttemptFailure> },
}

fn describe(attempts: &[AttemptFailure]) -> String {
    if attempts.is_empty() {
        return "no compilers configured".to_string();
    }
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.backend, a.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Tries each backend in order inside a fresh temporary directory and returns
/// the first non-empty `main.pdf`. The directory is removed when this returns.
pub async fn compile_latex(
    source: &str,
    backends: &[Arc<dyn CompilerBackend>],
) -> Result<Vec<u8>, CompileError> {
    let workdir = tempfile::Builder::new().prefix("latex-").tempdir()?;
    let tex_path = workdir.path().join("main.tex");
    let pdf_path = workdir.path().join("main.pdf");
    tokio::fs::write(&tex_path, source).await?;

    let mut attempts = Vec::with_capacity(backends.len());

    for backend in backends {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(
            backend.timeout(),
            backend.compile(workdir.path(), &tex_path),
        )
        .await
        {
            Ok(Ok(())) => read_output(&pdf_path).await,
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AttemptError::TimedOut(backend.timeout())),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(bytes) => {
                info!(
                    backend = backend.name(),
                    elapsed_ms,
                    bytes = bytes.len(),
                    "LaTeX compiled"
                );
                return Ok(bytes);
            }
            Err(reason) => {
                warn!(backend = backend.name(), elapsed_ms, %reason, "Compiler attempt failed");
                attempts.push(AttemptFailure {
                    backend: backend.name().to_string(),
                    reason,
                });
            }
        }
    }

    Err(CompileError::Exhausted { attempts })
}

async fn read_output(pdf_path: &Path) -> Result<Vec<u8>, AttemptError> {
    match tokio::fs::read(pdf_path).await {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(AttemptError::NoOutput),
    }
}
