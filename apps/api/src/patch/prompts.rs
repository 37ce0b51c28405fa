// Prompt constants for remote patch generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};

/// Role line for the rewrite system prompt.
pub const PATCH_SYSTEM_ROLE: &str = "You are a resume tailoring assistant. \
    Produce a JSON patch that updates ONLY the provided LaTeX blocks.";

/// Hint for regions whose id contains "bullets".
pub const BULLETS_HINT: &str = "Return LaTeX bullet lines starting with \\item";

/// Hint for every other region.
pub const PLAIN_HINT: &str = "Return plain LaTeX lines";

/// Hard rules sent with every request.
pub const PATCH_CONSTRAINTS: &[&str] = &[
    "Return ONLY JSON matching the provided schema.",
    "Only modify existing blocks by id; do not invent new ids.",
    "Keep LaTeX valid (escape % as \\%, etc.).",
    "Prefer measurable impact + keywords that match the guidance text.",
    "Do not add any \"\\begin{document}\" or similar; only block content lines.",
];

/// Full system prompt: role, JSON-only rule, grounding rule, then the schema.
pub fn patch_system_prompt(schema: &serde_json::Value) -> String {
    format!(
        "{PATCH_SYSTEM_ROLE}\n{JSON_ONLY_SYSTEM}\n{GROUNDING_INSTRUCTION}\n\n\
         The JSON MUST validate against this schema (additional properties are rejected):\n{schema}"
    )
}
