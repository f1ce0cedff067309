// Report generation: career-goal extraction and report-section writing.
// All LLM calls go through llm_client; no direct Gemini HTTP calls here.

pub mod career_goal;
pub mod prompts;
pub mod sections;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm_client::LlmClient;
use crate::report::ReportSection;

/// The report-writing seam used by the submission pipeline.
///
/// Both steps signal failure with an empty result rather than an error; the pipeline
/// turns that into the matching 500 response.
///
/// Carried in `AppState` as `Arc<dyn ReportWriter>`.
#[async_trait]
pub trait ReportWriter: Send + Sync {
    async fn extract_career_goal(&self, answers: &[Value]) -> Option<String>;

    async fn generate_sections(
        &self,
        context: &str,
        career_goal: &str,
        student_name: &str,
    ) -> Vec<ReportSection>;
}

/// Gemini-backed writer.
pub struct LlmReportWriter(pub LlmClient);

#[async_trait]
impl ReportWriter for LlmReportWriter {
    async fn extract_career_goal(&self, answers: &[Value]) -> Option<String> {
        career_goal::extract_career_goal(answers, &self.0).await
    }

    async fn generate_sections(
        &self,
        context: &str,
        career_goal: &str,
        student_name: &str,
    ) -> Vec<ReportSection> {
        sections::generate_topic_reports(context, career_goal, student_name, &self.0).await
    }
}
