// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every rewrite prompt to keep output grounded.
pub const GROUNDING_INSTRUCTION: &str = "\
    Do NOT invent employers, dates, degrees, or metrics that are not implied by the \
    current lines. Rephrase and re-prioritize what is there.";
