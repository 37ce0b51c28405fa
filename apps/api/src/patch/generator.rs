//! Patch Generator: produces a validated patch for every region in a document.
//!
//! Two interchangeable backends behind `PatchStrategy`:
//! - `HeuristicPatchGenerator`: deterministic keyword-frequency rewrite, no network.
//! - `RemotePatchGenerator`: one call to the text-generation service, output
//!   schema-validated before it is trusted.
//!
//! `AppState` holds an `Arc<dyn PatchStrategy>`, picked at startup from config.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::config::InputLimits;
use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::patch::keywords::{pick_top_keywords, MAX_KEYWORDS};
use crate::patch::prompts::{patch_system_prompt, BULLETS_HINT, PATCH_CONSTRAINTS, PLAIN_HINT};
use crate::patch::schema::{check_patch, patch_json_schema, validate_patch, BlockPatch, Patch};
use crate::template::{extract_regions, Region};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A patch backend. Receives already-validated input and at least one region.
#[async_trait]
pub trait PatchStrategy: Send + Sync {
    /// Short label for logs ("heuristic" | "remote").
    fn name(&self) -> &'static str;

    async fn generate(&self, guidance: &str, regions: &[Region]) -> Result<Patch, AppError>;
}

/// Validates input, extracts regions and delegates to `strategy`.
///
/// No backend is called when the document has no regions.
pub async fn generate_patch(
    guidance: &str,
    document: &str,
    limits: &InputLimits,
    strategy: &dyn PatchStrategy,
) -> Result<Patch, AppError> {
    if guidance.trim().is_empty() {
        return Err(AppError::Validation("guidanceText is required".to_string()));
    }
    if document.trim().is_empty() {
        return Err(AppError::Validation("document is required".to_string()));
    }
    if guidance.chars().count() > limits.max_guidance_chars {
        return Err(AppError::PayloadTooLarge(format!(
            "guidanceText too long (max {} chars)",
            limits.max_guidance_chars
        )));
    }
    if document.chars().count() > limits.max_document_chars {
        return Err(AppError::PayloadTooLarge(format!(
            "document too long (max {} chars)",
            limits.max_document_chars
        )));
    }

    let regions = extract_regions(document);
    if regions.is_empty() {
        return Err(AppError::NoRegions);
    }

    info!(
        strategy = strategy.name(),
        regions = regions.len(),
        "Generating patch"
    );

    let patch = strategy.generate(guidance, &regions).await?;
    check_patch(&patch).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "{} strategy built an invalid patch: {e}",
            strategy.name()
        ))
    })?;

    Ok(patch)
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicPatchGenerator: default when no credential is configured
// ────────────────────────────────────────────────────────────────────────────

/// Keyword-frequency rewrite. Same input, same output.
pub struct HeuristicPatchGenerator;

const FALLBACK_KEYWORD: &str = "impact";
const MAX_SKILL_EXTRAS: usize = 6;
const MAX_BULLET_FOCUS: usize = 5;

#[async_trait]
impl PatchStrategy for HeuristicPatchGenerator {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn generate(&self, guidance: &str, regions: &[Region]) -> Result<Patch, AppError> {
        Ok(heuristic_patch(guidance, regions))
    }
}

/// Builds the fallback patch synchronously.
pub fn heuristic_patch(guidance: &str, regions: &[Region]) -> Patch {
    let keywords = pick_top_keywords(guidance, MAX_KEYWORDS);

    let blocks = regions
        .iter()
        .map(|region| BlockPatch {
            id: region.id.clone(),
            replace_with: heuristic_lines(region, &keywords),
        })
        .collect();

    let detected = if keywords.is_empty() {
        "(none)".to_string()
    } else {
        keywords.join(", ")
    };

    Patch {
        blocks,
        notes: vec![
            "ANTHROPIC_API_KEY not set, so this is a local heuristic patch (no AI call).".to_string(),
            format!("Keywords detected from guidance: {detected}"),
            "Set ANTHROPIC_API_KEY in .env to enable real AI suggestions.".to_string(),
        ],
    }
}

fn heuristic_lines(region: &Region, keywords: &[String]) -> Vec<String> {
    let id = region.id.as_str();

    if id.contains("summary") {
        let top: Vec<&str> = keywords.iter().take(3).map(String::as_str).collect();
        let line = if top.is_empty() {
            "Tailored candidate with software engineering experience, focused on delivering measurable impact.".to_string()
        } else {
            format!(
                "Tailored candidate with software engineering experience, focused on {} and delivering measurable impact.",
                top.join(", ")
            )
        };
        return vec![line];
    }

    if id.contains("skills") {
        let extras: Vec<String> = keywords
            .iter()
            .take(MAX_SKILL_EXTRAS)
            .map(|k| k.replace('_', " "))
            .collect();
        return vec![
            r"\textbf{Languages:} Python, TypeScript, SQL\\".to_string(),
            r"\textbf{Frameworks:} Next.js, React, FastAPI\\".to_string(),
            format!(r"\textbf{{Focus:}} {}", extras.join(", ")),
        ];
    }

    let default_count = if id.contains("bullets") { 3 } else { 1 };
    let current = if region.lines.is_empty() {
        default_count
    } else {
        region.lines.len()
    };
    let target = current.clamp(1, 5);

    let focus: Vec<&str> = keywords
        .iter()
        .take(MAX_BULLET_FOCUS)
        .map(String::as_str)
        .collect();

    (0..target)
        .map(|i| {
            let keyword = focus
                .get(i % focus.len().max(1))
                .copied()
                .unwrap_or(FALLBACK_KEYWORD);
            format!(
                r"\item Delivered {keyword} improvements by aligning projects to the job requirements, improving quality and speed."
            )
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// RemotePatchGenerator: used when ANTHROPIC_API_KEY is configured
// ────────────────────────────────────────────────────────────────────────────

/// Sends regions plus guidance to the text-generation service. Single attempt.
pub struct RemotePatchGenerator {
    llm: LlmClient,
}

impl RemotePatchGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm: llm.with_max_attempts(1),
        }
    }
}

#[async_trait]
impl PatchStrategy for RemotePatchGenerator {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn generate(&self, guidance: &str, regions: &[Region]) -> Result<Patch, AppError> {
        let prompt = build_remote_prompt(guidance, regions).to_string();
        let system = patch_system_prompt(&patch_json_schema());

        let output = self.llm.call_json::<Value>(&prompt, &system).await;
        interpret_model_output(output)
    }
}

/// The user message: guidance, every region with its current lines and a hint,
/// and the fixed constraint list.
pub fn build_remote_prompt(guidance: &str, regions: &[Region]) -> Value {
    let blocks: Vec<Value> = regions
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "currentLines": r.lines,
                "hint": if r.id.contains("bullets") { BULLETS_HINT } else { PLAIN_HINT },
            })
        })
        .collect();

    json!({
        "guidanceText": guidance,
        "blocks": blocks,
        "constraints": PATCH_CONSTRAINTS,
    })
}

/// Turns the raw model result into a patch. Every failure is an upstream failure.
fn interpret_model_output(output: Result<Value, LlmError>) -> Result<Patch, AppError> {
    let value = output.map_err(|e| match e {
        LlmError::EmptyContent => AppError::Upstream("Empty model response.".to_string()),
        LlmError::Parse(_) => AppError::Upstream("Model returned non-JSON output.".to_string()),
        other => AppError::Upstream(format!("Patch generation call failed: {other}")),
    })?;

    validate_patch(&value)
        .map_err(|e| AppError::Upstream(format!("Model output violates the patch schema at {e}")))
}
