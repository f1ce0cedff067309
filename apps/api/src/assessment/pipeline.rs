//! Submission pipeline: turns one validated submission into a published report URL.
//!
//! Flow: calculate_scores → StudentInfo → extract_career_goal → generate_sections →
//!       build_report_data → render_pdf → upload → URL.
//!
//! Strictly sequential. Nothing is persisted locally; the only lasting artefact is the
//! release asset.

use tracing::info;

use crate::assessment::models::{AssessmentSubmission, StudentInfo};
use crate::assessment::scoring::TraitScores;
use crate::errors::AppError;
use crate::release::asset_filename;
use crate::render::render_pdf_blocking;
use crate::report::build_report_data;
use crate::state::AppState;

/// Runs the full pipeline and returns the public report URL.
///
/// Steps:
/// 1. scorer.calculate_scores() → TraitScores
/// 2. StudentInfo from the submission metadata
/// 3. writer.extract_career_goal() → label (nothing → 500)
/// 4. writer.generate_sections() → sections (nothing → 500)
/// 5. build_report_data() → ReportData
/// 6. render_pdf_blocking() → PDF bytes
/// 7. store.upload() → download URL
pub async fn process_submission(
    state: &AppState,
    submission: AssessmentSubmission,
) -> Result<String, AppError> {
    // Step 1: Trait scores
    let trait_scores = state.scorer.calculate_scores(&submission.answers)?;
    info!("Calculated {} trait scores", trait_scores.len());

    // Step 2: Student info
    let student_info = StudentInfo::from_submission(&submission);

    // Step 3: Career goal
    let career_goal = state
        .writer
        .extract_career_goal(&submission.answer_values())
        .await
        .filter(|goal| !goal.trim().is_empty())
        .ok_or_else(|| AppError::Generation("Failed to extract career goal".to_string()))?;

    // Step 4: Report sections
    let context = build_context(&trait_scores, &student_info)?;
    let sections = state
        .writer
        .generate_sections(&context, &career_goal, &student_info.name)
        .await;
    if sections.is_empty() {
        return Err(AppError::Generation(
            "Failed to generate report sections".to_string(),
        ));
    }

    // Step 5: Report document
    let report = build_report_data(&student_info.name, &career_goal, sections);

    // Step 6: PDF
    let filename = asset_filename(&student_info.name);
    let pdf = render_pdf_blocking(report).await?;

    // Step 7: Publish
    let report_url = state.store.upload(&filename, pdf).await?;
    info!("Report {filename} published");

    Ok(report_url)
}

/// The context block handed to the section generator.
fn build_context(
    trait_scores: &TraitScores,
    student_info: &StudentInfo,
) -> Result<String, AppError> {
    let scores_json = serde_json::to_string(trait_scores)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize trait scores: {e}")))?;
    let info_json = serde_json::to_string(student_info)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize student info: {e}")))?;

    Ok(format!(
        "Trait Scores: {scores_json}\nStudent Info: {info_json}"
    ))
}
