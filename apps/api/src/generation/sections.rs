//! Report-Section Generator: one JSON-mode LLM call that writes every report topic.

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::generation::prompts::{SECTIONS_PROMPT_TEMPLATE, SECTIONS_SYSTEM};
use crate::llm_client::prompts::{AUDIENCE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::report::ReportSection;

/// Topics every report covers, in report order.
pub const REPORT_TOPICS: &[&str] = &[
    "Personality Profile",
    "Key Strengths",
    "Areas for Growth",
    "Career Goal Analysis",
    "Recommended Career Paths",
    "Education Pathway",
    "Skill Development Plan",
    "Next Steps",
];

/// Generates the report sections. Returns an empty list when the LLM call fails or its
/// reply holds no usable section.
pub async fn generate_topic_reports(
    context: &str,
    career_goal: &str,
    student_name: &str,
    llm: &LlmClient,
) -> Vec<ReportSection> {
    let prompt = build_sections_prompt(context, career_goal, student_name);
    let system = format!("{SECTIONS_SYSTEM} {JSON_ONLY_SYSTEM}");

    let reply: Map<String, Value> = match llm.call_json(&prompt, &system).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Report section generation failed: {e}");
            return Vec::new();
        }
    };

    let sections = collect_sections(&reply);
    if sections.len() < REPORT_TOPICS.len() {
        let missing: Vec<&str> = REPORT_TOPICS
            .iter()
            .copied()
            .filter(|t| !sections.iter().any(|s| s.topic == *t))
            .collect();
        warn!("LLM omitted {} report topics: {:?}", missing.len(), missing);
    }
    info!("Generated {} report sections", sections.len());
    sections
}

fn build_sections_prompt(context: &str, career_goal: &str, student_name: &str) -> String {
    let topics_json = serde_json::to_string(REPORT_TOPICS).unwrap_or_default();
    SECTIONS_PROMPT_TEMPLATE
        .replace("{audience_instruction}", AUDIENCE_INSTRUCTION)
        .replace("{student_name}", student_name)
        .replace("{career_goal}", career_goal)
        .replace("{context}", context)
        .replace("{topics_json}", &topics_json)
}

/// Picks the known topics out of the LLM reply, in `REPORT_TOPICS` order.
///
/// Keys match exactly first, then case-insensitively. Unknown keys and blank bodies are
/// dropped. A list of strings is accepted and rendered as `- ` lines.
fn collect_sections(reply: &Map<String, Value>) -> Vec<ReportSection> {
    REPORT_TOPICS
        .iter()
        .filter_map(|topic| {
            let value = reply.get(*topic).or_else(|| {
                reply
                    .iter()
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case(topic))
                    .map(|(_, v)| v)
            })?;
            let body = section_body(value)?;
            Some(ReportSection {
                topic: topic.to_string(),
                body,
            })
        })
        .collect()
}

fn section_body(value: &Value) -> Option<String> {
    let body = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    };
    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}
