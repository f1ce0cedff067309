// PDF Renderer: ReportData -> laid-out pages -> PDF bytes.
// Layout and serialisation are CPU-bound; async callers go through `render_pdf_blocking`.

pub mod font_metrics;
pub mod layout;
pub mod pdf;

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;
use crate::report::ReportData;

/// Renders the report to PDF bytes.
pub fn render_pdf(report: &ReportData) -> Result<Bytes, AppError> {
    let pages = layout::layout_report(report);
    let bytes = pdf::write_pdf(&pages, &report.title)?;
    debug!(
        "Rendered report for {} to {} pages ({} bytes)",
        report.student_name,
        pages.len(),
        bytes.len()
    );
    Ok(Bytes::from(bytes))
}

/// Runs `render_pdf` on the blocking thread pool.
pub async fn render_pdf_blocking(report: ReportData) -> Result<Bytes, AppError> {
    tokio::task::spawn_blocking(move || render_pdf(&report))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF render task failed: {e}")))?
}
