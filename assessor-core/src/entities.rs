//! Core entity structures
//!
//! The shapes here are the transport schema as well: persisted tests come back
//! from the store as [`AssessmentTest`], and the authoring form produces
//! [`TestPayload`] for create and [`UpdateTestPayload`] for update.

use crate::{Subject, TestId, Timestamp};
use serde::{Deserialize, Serialize};

// ============================================================================
// LIMITS
// ============================================================================

/// Maximum length of a test name.
pub const NAME_MAX_LEN: usize = 160;
/// Maximum length of a question prompt.
pub const QUESTION_MAX_LEN: usize = 1000;
/// Maximum length of a single choice.
pub const CHOICE_MAX_LEN: usize = 400;
/// Maximum length of correct/incorrect feedback text.
pub const RESPONSE_MAX_LEN: usize = 1000;
/// Lowest valid level.
pub const MIN_LEVEL: i64 = 1;
/// Structural floor: questions per test.
pub const MIN_QUESTIONS: usize = 1;
/// Structural floor: choices per question.
pub const MIN_CHOICES: usize = 2;

/// Values seeded into a question that has no choices yet.
pub const DEFAULT_CHOICES: [&str; 2] = ["Choice A", "Choice B"];

// ============================================================================
// ENTITIES
// ============================================================================

/// One selectable option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
}

impl Choice {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A prompt with ordered choices, the correct answer and feedback text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Value of the correct choice.
    pub answer: String,
    pub correct_response: String,
    pub incorrect_response: String,
}

/// A persisted assessment test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentTest {
    #[serde(rename = "_id")]
    pub id: TestId,
    pub name: String,
    pub subject: Subject,
    pub level: i64,
    #[serde(default)]
    pub test_questions: Vec<Question>,
    pub last_updated: Timestamp,
}

impl AssessmentTest {
    pub fn question_count(&self) -> usize {
        self.test_questions.len()
    }

    /// Prompt of the first question, if any.
    pub fn sample_question(&self) -> Option<&str> {
        self.test_questions
            .first()
            .map(|q| q.question.as_str())
            .filter(|q| !q.is_empty())
    }

    /// Strip server-owned fields.
    pub fn to_payload(&self) -> TestPayload {
        TestPayload {
            name: self.name.clone(),
            subject: self.subject,
            level: self.level,
            test_questions: self.test_questions.clone(),
        }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPayload {
    pub name: String,
    pub subject: Subject,
    pub level: i64,
    pub test_questions: Vec<Question>,
}

impl TestPayload {
    pub fn question_count(&self) -> usize {
        self.test_questions.len()
    }
}

/// Body of an update request: the payload plus the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTestPayload {
    #[serde(rename = "_id")]
    pub id: TestId,
    #[serde(flatten)]
    pub payload: TestPayload,
}

impl UpdateTestPayload {
    pub fn new(id: TestId, payload: TestPayload) -> Self {
        Self { id, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> AssessmentTest {
        AssessmentTest {
            id: TestId::new("t-1"),
            name: "Signals".to_string(),
            subject: Subject::Angular,
            level: 2,
            test_questions: vec![Question {
                question: "What does computed() return?".to_string(),
                choices: vec![Choice::new("A signal"), Choice::new("An observable")],
                answer: "A signal".to_string(),
                correct_response: "Yes".to_string(),
                incorrect_response: "No".to_string(),
            }],
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_question_count() {
        let mut test = sample();
        assert_eq!(test.question_count(), 1);
        test.test_questions.clear();
        assert_eq!(test.question_count(), 0);
        assert_eq!(test.sample_question(), None);
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["_id"], "t-1");
        assert_eq!(value["subject"], "ANGULAR");
        assert!(value["testQuestions"][0]["correctResponse"].is_string());
        assert!(value["lastUpdated"].is_string());
    }

    #[test]
    fn test_update_payload_flattens_with_id() {
        let update = UpdateTestPayload::new(TestId::new("abc"), sample().to_payload());
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["_id"], "abc");
        assert_eq!(value["name"], "Signals");
        assert_eq!(value["level"], 2);
    }

    #[test]
    fn test_missing_questions_deserialize_as_empty() {
        let json = r#"{"_id":"x","name":"n","subject":"RXJS","level":1,"lastUpdated":"2025-01-02T03:04:05Z"}"#;
        let test: AssessmentTest = serde_json::from_str(json).unwrap();
        assert!(test.test_questions.is_empty());
        assert_eq!(test.subject, Subject::RxJs);
    }
}
