//! Trait Scoring: pluggable scorer that turns questionnaire answers into trait scores.
//!
//! Default: `LikertTraitScorer` (pure-Rust, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn TraitScorer>`, built once in `main`.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::assessment::models::Answers;
use crate::errors::AppError;

/// Trait name → score in 0–100.
pub type TraitScores = BTreeMap<String, f64>;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("missing answer for {0}")]
    MissingAnswer(String),

    #[error("answer to {question} is not a 1-5 rating: {value}")]
    UnreadableAnswer { question: String, value: String },
}

impl From<ScoringError> for AppError {
    fn from(e: ScoringError) -> Self {
        AppError::Scoring(e.to_string())
    }
}

/// The trait scorer seam. Implement this to swap scoring models without touching the
/// handler.
pub trait TraitScorer: Send + Sync {
    fn calculate_scores(&self, answers: &Answers) -> Result<TraitScores, ScoringError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Question bank
// ────────────────────────────────────────────────────────────────────────────

/// Scored questions, grouped by the trait they measure. Every listed question is
/// required. Other question ids (free-text prompts such as `question13` and
/// `question30`) are not scored.
pub const QUESTION_BANK: &[(&str, &[&str])] = &[
    ("Analytical", &["question1", "question7", "question14", "question19"]),
    ("Creative", &["question2", "question8", "question15", "question20"]),
    ("Social", &["question3", "question9", "question16", "question21"]),
    ("Leadership", &["question4", "question10", "question17", "question22"]),
    ("Practical", &["question5", "question11", "question18", "question23"]),
    ("Organisational", &["question6", "question12", "question24", "question26"]),
];

const MIN_RATING: f64 = 1.0;
const MAX_RATING: f64 = 5.0;

/// Mean-of-ratings scorer over `QUESTION_BANK`.
///
/// Algorithm:
/// 1. Read each scored answer as a 1–5 rating (number, numeric string, or Likert phrase).
/// 2. Trait score = (mean rating − 1) / 4 × 100, rounded to one decimal.
pub struct LikertTraitScorer;

impl TraitScorer for LikertTraitScorer {
    fn calculate_scores(&self, answers: &Answers) -> Result<TraitScores, ScoringError> {
        let mut scores = TraitScores::new();

        for (trait_name, questions) in QUESTION_BANK {
            let mut total = 0.0;
            for question in *questions {
                let value = answers
                    .get(*question)
                    .filter(|v| !v.is_null())
                    .ok_or_else(|| ScoringError::MissingAnswer(question.to_string()))?;
                total += read_rating(question, value)?;
            }
            let mean = total / questions.len() as f64;
            scores.insert(trait_name.to_string(), normalise(mean));
        }

        Ok(scores)
    }
}

fn normalise(mean: f64) -> f64 {
    let fraction = (mean - MIN_RATING) / (MAX_RATING - MIN_RATING);
    (fraction * 1000.0).round() / 10.0
}

fn read_rating(question: &str, value: &Value) -> Result<f64, ScoringError> {
    let unreadable = || ScoringError::UnreadableAnswer {
        question: question.to_string(),
        value: value.to_string(),
    };

    let rating = match value {
        Value::Number(n) => n.as_f64().ok_or_else(unreadable)?,
        Value::String(s) => parse_rating_text(s).ok_or_else(unreadable)?,
        _ => return Err(unreadable()),
    };

    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(unreadable())
    }
}

fn parse_rating_text(text: &str) -> Option<f64> {
    let normalised = text.trim().to_lowercase().replace(['_', '-'], " ");
    if let Ok(n) = normalised.parse::<f64>() {
        return Some(n);
    }
    let rating = match normalised.as_str() {
        "strongly disagree" => 1.0,
        "disagree" => 2.0,
        "neutral" | "neither agree nor disagree" | "not sure" => 3.0,
        "agree" => 4.0,
        "strongly agree" => 5.0,
        _ => return None,
    };
    Some(rating)
}
