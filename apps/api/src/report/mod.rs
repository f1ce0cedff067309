//! Report Builder: assembles generated sections and student metadata into the
//! canonical document handed to the PDF renderer.

use chrono::{NaiveDate, Utc};

pub const REPORT_TITLE: &str = "Career Assessment Report";

/// One titled block of generated narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub topic: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ReportData {
    pub title: String,
    pub student_name: String,
    pub career_goal: String,
    pub generated_on: NaiveDate,
    pub sections: Vec<ReportSection>,
}

/// Builds the report document, dated today (UTC).
pub fn build_report_data(
    student_name: &str,
    career_goal: &str,
    sections: Vec<ReportSection>,
) -> ReportData {
    ReportData {
        title: REPORT_TITLE.to_string(),
        student_name: student_name.to_string(),
        career_goal: career_goal.to_string(),
        generated_on: Utc::now().date_naive(),
        sections,
    }
}
