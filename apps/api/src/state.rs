use std::sync::Arc;

use crate::compile::backend::CompilerBackend;
use crate::config::Config;
use crate::patch::generator::PatchStrategy;
use crate::tracker::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Remote when an API key is configured, otherwise the local heuristic.
    pub patch_strategy: Arc<dyn PatchStrategy>,
    /// Tried in order by the compile endpoint.
    pub compilers: Arc<[Arc<dyn CompilerBackend>]>,
    pub job_store: Arc<JobStore>,
}
