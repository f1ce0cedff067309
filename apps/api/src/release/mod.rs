// Release Uploader: publishes rendered reports as GitHub release assets.

pub mod github;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;

pub use github::GithubReleaseStore;

/// Where finished reports are published.
///
/// Carried in `AppState` as `Arc<dyn ReportStore>`.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Uploads `pdf` under `filename` and returns its public download URL.
    async fn upload(&self, filename: &str, pdf: Bytes) -> Result<String, AppError>;
}

/// Asset name for a student's report: `{Name}_Career_Report_{suffix}.pdf`.
///
/// Whitespace runs become `_`, characters outside `[A-Za-z0-9._-]` are dropped, and an
/// 8-hex random suffix keeps repeated submissions from colliding on the release.
pub fn asset_filename(student_name: &str) -> String {
    let stem = student_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let stem = if stem.is_empty() { "Student" } else { stem.as_str() };

    let suffix = Uuid::new_v4().simple().to_string();
    format!("{stem}_Career_Report_{}.pdf", &suffix[..8])
}
