//! Axum route handlers for the Assessment API.

use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::assessment::models::AssessmentSubmission;
use crate::assessment::pipeline::process_submission;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmitAssessmentResponse {
    pub message: String,
    pub report_url: String,
}

/// POST /api/submit-assessment
///
/// Scores the questionnaire, has the LLM write the report, renders it to PDF and
/// publishes it as a release asset. Every call publishes a new asset.
///
/// The body is parsed as JSON whatever its `Content-Type` says.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitAssessmentResponse>, AppError> {
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;
    let submission = AssessmentSubmission::from_body(body)?;

    let submission_id = Uuid::new_v4();
    let span = info_span!("submission", id = %submission_id);
    async move {
        info!(
            "Received assessment with {} answers",
            submission.answers.len()
        );
        let report_url = process_submission(&state, submission).await?;

        Ok::<_, AppError>(Json(SubmitAssessmentResponse {
            message: "Report generated successfully".to_string(),
            report_url,
        }))
    }
    .instrument(span)
    .await
}

/// GET /api/download-report/:filename
///
/// Not implemented: reports live only as release assets and nothing maps filenames back
/// to URLs. Clients use the `report_url` from the submission response.
pub async fn handle_download_report(Path(filename): Path<String>) -> Result<(), AppError> {
    info!("Download requested for {filename}; not served");
    Err(AppError::NotFound(
        "File not found, use report_url from submission".to_string(),
    ))
}
