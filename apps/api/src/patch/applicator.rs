//! Patch Applicator: merges a validated patch into a document.
//!
//! Only the text strictly between a start marker and its end marker is replaced.
//! Markers are kept verbatim, so each later block is located by a fresh search
//! against the updated document. Missing ids are data, never an error.

use serde::Serialize;
use tracing::debug;

use crate::patch::schema::Patch;
use crate::template::{end_marker, start_marker};

/// Result of applying a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub next: String,
    pub applied_ids: Vec<String>,
    pub missing_ids: Vec<String>,
}

impl ApplyOutcome {
    /// Human-readable warning for missing blocks, if any.
    pub fn missing_warning(&self) -> Option<String> {
        if self.missing_ids.is_empty() {
            None
        } else {
            Some(format!(
                "Warning: could not find blocks: {}",
                self.missing_ids.join(", ")
            ))
        }
    }
}

/// Applies every block of `patch` to `document`, in patch order.
pub fn apply_patch(document: &str, patch: &Patch) -> ApplyOutcome {
    let mut next = document.to_string();
    let mut applied_ids = Vec::new();
    let mut missing_ids = Vec::new();

    for block in &patch.blocks {
        let start = start_marker(&block.id);
        let Some(start_idx) = next.find(&start) else {
            missing_ids.push(block.id.clone());
            continue;
        };
        let content_start = start_idx + start.len();
        let Some(end_offset) = next[content_start..].find(end_marker()) else {
            missing_ids.push(block.id.clone());
            continue;
        };
        let content_end = content_start + end_offset;

        let replacement = format!("\n{}\n", block.replace_with.join("\n"));
        next.replace_range(content_start..content_end, &replacement);
        applied_ids.push(block.id.clone());
    }

    debug!(
        applied = applied_ids.len(),
        missing = missing_ids.len(),
        "Patch applied"
    );

    ApplyOutcome {
        next,
        applied_ids,
        missing_ids,
    }
}
