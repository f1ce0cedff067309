//! Career-Goal Extractor: asks the LLM for a short career label from the raw answers.

use serde_json::Value;
use tracing::{info, warn};

use crate::assessment::models::display_value;
use crate::generation::prompts::{CAREER_GOAL_PROMPT_TEMPLATE, CAREER_GOAL_SYSTEM};
use crate::llm_client::LlmClient;

/// Returns the career goal, or `None` when the LLM fails or answers with nothing usable.
pub async fn extract_career_goal(answers: &[Value], llm: &LlmClient) -> Option<String> {
    let prompt = build_career_goal_prompt(answers);

    let raw = match llm.call_text(&prompt, CAREER_GOAL_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Career goal extraction failed: {e}");
            return None;
        }
    };

    let goal = normalise_label(&raw);
    match &goal {
        Some(goal) => info!("Extracted career goal: {goal}"),
        None => warn!("Career goal extraction returned no usable label: {raw:?}"),
    }
    goal
}

fn build_career_goal_prompt(answers: &[Value]) -> String {
    let numbered = answers
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{}. {}", i + 1, display_value(Some(v), "(no answer)")))
        .collect::<Vec<_>>()
        .join("\n");
    CAREER_GOAL_PROMPT_TEMPLATE.replace("{answers}", &numbered)
}

/// Cleans an LLM label: first non-empty line, without a `Career goal:` prefix,
/// wrapping quotes, emphasis, or a trailing period.
fn normalise_label(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;

    let line = ["career goal:", "goal:"]
        .iter()
        .find_map(|prefix| {
            line.get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(prefix))
                .map(|_| &line[prefix.len()..])
        })
        .unwrap_or(line);

    let label = line
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '*' | '`' | '\u{201C}' | '\u{201D}'))
        .trim_end_matches('.')
        .trim();

    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::tests::{client_for, fake_gemini, text_reply};
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_prompt_numbers_answers_in_order() {
        let prompt = build_career_goal_prompt(&[json!("I want to design robots"), json!(4)]);
        assert!(prompt.contains("1. I want to design robots\n2. 4"));
    }

    #[test]
    fn test_normalise_strips_decoration() {
        assert_eq!(normalise_label("\"Data Scientist.\"").as_deref(), Some("Data Scientist"));
        assert_eq!(normalise_label("**Architect**").as_deref(), Some("Architect"));
        assert_eq!(
            normalise_label("Career Goal: Marine Biologist\nBecause...").as_deref(),
            Some("Marine Biologist")
        );
    }

    #[test]
    fn test_normalise_empty_is_none() {
        assert_eq!(normalise_label("  \n \"\" "), None);
    }

    #[tokio::test]
    async fn test_extract_returns_label_from_llm() {
        let (url, hits) = fake_gemini(StatusCode::OK, text_reply("Civil Engineer\n")).await;
        let goal = extract_career_goal(&[json!("bridges")], &client_for(url)).await;
        assert_eq!(goal.as_deref(), Some("Civil Engineer"));
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_extract_swallows_llm_failure() {
        let (url, _) = fake_gemini(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": {"message": "backend error"}}),
        )
        .await;
        assert_eq!(extract_career_goal(&[json!("x")], &client_for(url)).await, None);
    }
}
