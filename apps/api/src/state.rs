use std::sync::Arc;

use crate::assessment::scoring::TraitScorer;
use crate::generation::ReportWriter;
use crate::release::ReportStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every collaborator is built once in `main` and held behind a trait object so tests
/// can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    /// Default: LikertTraitScorer.
    pub scorer: Arc<dyn TraitScorer>,
    /// Default: LlmReportWriter over the process-wide Gemini client.
    pub writer: Arc<dyn ReportWriter>,
    /// Default: GithubReleaseStore.
    pub store: Arc<dyn ReportStore>,
}
