// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to all report-writing prompts.
pub const AUDIENCE_INSTRUCTION: &str = "\
    The reader is a secondary or early university student and their parents. \
    Write in clear, encouraging, second-person English. \
    Base every statement on the trait scores and answers provided. \
    Do NOT invent grades, test results, awards, or personal details that are not in the context.";
