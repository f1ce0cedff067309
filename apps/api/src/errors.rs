use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{"error": "<message>"}`; the variant only picks the status
/// code and whether the message is wrapped as an unclassified processing failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// A generation step returned nothing usable.
    #[error("{0}")]
    Generation(String),

    /// A credential or setting needed for this request is missing.
    #[error("{0}")]
    Configuration(String),

    /// The release asset upload answered with something other than 201.
    #[error("Failed to upload PDF to GitHub: {0}")]
    Upload(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("GitHub error: {0}")]
    GitHub(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::GitHub(format!("request failed: {e}"))
    }
}

impl From<lopdf::Error> for AppError {
    fn from(e: lopdf::Error) -> Self {
        AppError::Pdf(e.to_string())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    fn client_message(&self) -> String {
        match self {
            AppError::NotFound(_)
            | AppError::Validation(_)
            | AppError::Generation(_)
            | AppError::Configuration(_)
            | AppError::Upload(_) => self.to_string(),
            other => format!("Assessment processing failed: {other}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.client_message();

        match &self {
            AppError::NotFound(_) => {}
            AppError::Validation(msg) => tracing::warn!("Rejected submission: {msg}"),
            AppError::Internal(e) => tracing::error!("Assessment submission error: {e:?}"),
            other => tracing::error!("Assessment submission error: {other:?}"),
        }

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}
