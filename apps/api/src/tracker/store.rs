//! Single-user persistence for the job board: one JSON blob on disk.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::tracker::models::{normalize_orders, seed_jobs, JobRecord};

pub const STORE_FILE: &str = "job-tracker.jobs.json";

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Job store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Job store encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct JobStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JobStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORE_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved records, normalized. A missing or unreadable blob yields the seed board.
    pub async fn load(&self) -> Vec<JobRecord> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Replaces the whole collection and returns what was stored.
    pub async fn replace(&self, jobs: Vec<JobRecord>) -> Result<Vec<JobRecord>, TrackerError> {
        let _guard = self.lock.lock().await;
        self.write(jobs).await
    }

    /// Removes the record with `id`. `Ok(false)` when no such record exists.
    pub async fn remove(&self, id: &str) -> Result<bool, TrackerError> {
        let _guard = self.lock.lock().await;
        let mut jobs = self.read().await;
        let before = jobs.len();
        jobs.retain(|job| job.id != id);
        if jobs.len() == before {
            return Ok(false);
        }
        self.write(jobs).await?;
        Ok(true)
    }

    async fn read(&self) -> Vec<JobRecord> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return normalize_orders(seed_jobs(Utc::now()));
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Job store unreadable, using seed: {e}");
                return normalize_orders(seed_jobs(Utc::now()));
            }
        };

        match serde_json::from_slice::<Vec<JobRecord>>(&raw) {
            Ok(jobs) => normalize_orders(jobs),
            Err(e) => {
                warn!(path = %self.path.display(), "Job store corrupt, using seed: {e}");
                normalize_orders(seed_jobs(Utc::now()))
            }
        }
    }

    /// Writes to a sibling temp file, then renames over the blob.
    async fn write(&self, jobs: Vec<JobRecord>) -> Result<Vec<JobRecord>, TrackerError> {
        let jobs = normalize_orders(jobs);
        let encoded = serde_json::to_vec_pretty(&jobs)?;

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, &encoded).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        info!(jobs = jobs.len(), "Job store saved");
        Ok(jobs)
    }
}
