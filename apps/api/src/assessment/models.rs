use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Ordered question id → answer mapping, in submission order.
pub type Answers = Map<String, Value>;

const DEFAULT_STUDENT_NAME: &str = "Student";
const NOT_PROVIDED: &str = "Not provided";
/// Answer slots quoted verbatim as the student's achievements.
pub const ACHIEVEMENT_QUESTIONS: [&str; 2] = ["question13", "question30"];
const NO_ACHIEVEMENT: &str = "None";

/// A validated questionnaire submission.
///
/// Metadata fields are kept as raw JSON so that scalars such as `"age": 17` survive
/// until they are rendered as text.
#[derive(Debug, Clone)]
pub struct AssessmentSubmission {
    pub answers: Answers,
    pub student_name: Option<Value>,
    pub age: Option<Value>,
    pub academic_info: Option<Value>,
    pub interests: Option<Value>,
}

impl AssessmentSubmission {
    /// Validates a raw request body.
    ///
    /// `answers` must be present and must be a JSON object; everything else is optional.
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let Value::Object(mut body) = body else {
            return Err(AppError::Validation("Missing answers data".to_string()));
        };

        let answers = match body.remove("answers") {
            None | Some(Value::Null) => {
                return Err(AppError::Validation("Missing answers data".to_string()))
            }
            Some(Value::Object(answers)) => answers,
            Some(_) => return Err(AppError::Validation("Invalid answers format".to_string())),
        };

        Ok(Self {
            answers,
            student_name: body.remove("studentName"),
            age: body.remove("age"),
            academic_info: body.remove("academicInfo"),
            interests: body.remove("interests"),
        })
    }

    /// Student name, trimmed; `"Student"` when absent or blank.
    pub fn student_name(&self) -> String {
        let name = display_value(self.student_name.as_ref(), DEFAULT_STUDENT_NAME);
        let name = name.trim();
        if name.is_empty() {
            DEFAULT_STUDENT_NAME.to_string()
        } else {
            name.to_string()
        }
    }

    /// All answer values in submission order.
    pub fn answer_values(&self) -> Vec<Value> {
        self.answers.values().cloned().collect()
    }
}

/// Student metadata as it is handed to the report-writing prompts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentInfo {
    pub name: String,
    pub age: String,
    pub academic_info: String,
    pub interests: String,
    pub achievements: [String; 2],
}

impl StudentInfo {
    pub fn from_submission(submission: &AssessmentSubmission) -> Self {
        let achievements = ACHIEVEMENT_QUESTIONS
            .map(|question| display_value(submission.answers.get(question), NO_ACHIEVEMENT));

        Self {
            name: submission.student_name(),
            age: display_value(submission.age.as_ref(), NOT_PROVIDED),
            academic_info: display_value(submission.academic_info.as_ref(), NOT_PROVIDED),
            interests: display_value(submission.interests.as_ref(), NOT_PROVIDED),
            achievements,
        }
    }
}

/// Renders a JSON value as plain text: strings unquoted, scalars as written,
/// `null`/absent as `default`, arrays and objects as compact JSON.
pub fn display_value(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validation_message(body: Value) -> String {
        match AssessmentSubmission::from_body(body) {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_answers_is_rejected() {
        assert_eq!(validation_message(json!({"studentName": "A"})), "Missing answers data");
        assert_eq!(validation_message(json!({"answers": null})), "Missing answers data");
        assert_eq!(validation_message(json!([1, 2])), "Missing answers data");
    }

    #[test]
    fn test_non_object_answers_is_rejected() {
        assert_eq!(validation_message(json!({"answers": [1, 2]})), "Invalid answers format");
        assert_eq!(validation_message(json!({"answers": "yes"})), "Invalid answers format");
    }

    #[test]
    fn test_answer_values_keep_submission_order() {
        let body: Value = serde_json::from_str(
            r#"{"answers": {"question3": "c", "question1": "a", "question2": "b"}}"#,
        )
        .unwrap();
        let submission = AssessmentSubmission::from_body(body).unwrap();
        assert_eq!(submission.answer_values(), vec![json!("c"), json!("a"), json!("b")]);
    }

    #[test]
    fn test_student_info_defaults() {
        let submission = AssessmentSubmission::from_body(json!({"answers": {}})).unwrap();
        let info = StudentInfo::from_submission(&submission);
        assert_eq!(
            info,
            StudentInfo {
                name: "Student".into(),
                age: "Not provided".into(),
                academic_info: "Not provided".into(),
                interests: "Not provided".into(),
                achievements: ["None".into(), "None".into()],
            }
        );
    }

    #[test]
    fn test_student_info_renders_scalars_and_achievements() {
        let submission = AssessmentSubmission::from_body(json!({
            "answers": {"question13": "Won the science fair", "question30": 3},
            "studentName": "  Asha Rao ",
            "age": 17,
            "academicInfo": "Grade 11, PCM",
            "interests": "robotics"
        }))
        .unwrap();
        let info = StudentInfo::from_submission(&submission);
        assert_eq!(info.name, "Asha Rao");
        assert_eq!(info.age, "17");
        assert_eq!(info.academic_info, "Grade 11, PCM");
        assert_eq!(info.achievements, ["Won the science fair".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_blank_name_falls_back_to_default() {
        let submission =
            AssessmentSubmission::from_body(json!({"answers": {}, "studentName": "   "})).unwrap();
        assert_eq!(submission.student_name(), "Student");
    }

    #[test]
    fn test_student_info_serializes_with_snake_case_keys() {
        let submission = AssessmentSubmission::from_body(json!({"answers": {}})).unwrap();
        let value = serde_json::to_value(StudentInfo::from_submission(&submission)).unwrap();
        assert!(value.get("academic_info").is_some());
        assert_eq!(value["achievements"].as_array().unwrap().len(), 2);
    }
}
