// Shared prompt fragments.
// Each stage defines its own prompts alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction against filling gaps with invented facts.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only use information that is present in the input. \
    If a value is not stated, use null for single values and [] for lists. \
    Never guess names, dates, or contact details.";
