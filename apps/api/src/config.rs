use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::MODEL;

/// Application configuration loaded from environment variables.
/// Nothing is required: without `ANTHROPIC_API_KEY` the local heuristic patcher is used.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub limits: InputLimits,
    pub primary_compile_timeout: Duration,
    pub secondary_compile_timeout: Duration,
    pub data_dir: PathBuf,
}

/// Size limits applied to patch-generation input, counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    pub max_guidance_chars: usize,
    pub max_document_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_guidance_chars: 12_000,
            max_document_chars: 50_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = InputLimits::default();

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| MODEL.to_string()),
            limits: InputLimits {
                max_guidance_chars: parse_env("MAX_GUIDANCE_CHARS", defaults.max_guidance_chars)?,
                max_document_chars: parse_env("MAX_DOCUMENT_CHARS", defaults.max_document_chars)?,
            },
            primary_compile_timeout: Duration::from_secs(parse_env(
                "PRIMARY_COMPILE_TIMEOUT_SECS",
                10,
            )?),
            secondary_compile_timeout: Duration::from_secs(parse_env(
                "SECONDARY_COMPILE_TIMEOUT_SECS",
                15,
            )?),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
        })
    }
}

/// Reads an optional env var, falling back to `default` when unset.
/// A set-but-malformed value is an error rather than a silent default.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
