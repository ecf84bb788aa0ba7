//! Assessor Test Utilities
//!
//! Shared test infrastructure for the assessor workspace:
//! - Proptest generators for every entity type
//! - In-memory persistence collaborator with failure injection
//! - Test fixtures for common scenarios
//! - Custom assertions for assessor-specific results

// Re-export core types for convenience
pub use assessor_core::{
    AssessmentStore, AssessmentTest, Choice, EditableTest, FieldPath, ListQuery, Question,
    SessionError, SortKey, StoreError, Subject, SubjectFacet, TestId, TestPayload, Timestamp,
    UpdateTestPayload, ValidationError,
};

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

// ============================================================================
// MOCK STORE
// ============================================================================

/// In-memory [`AssessmentStore`].
///
/// Assigns ids and `last_updated` the way the server does. While failing is
/// switched on every call returns `StoreError::Transport` and leaves the
/// stored data alone.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    tests: Arc<RwLock<HashMap<TestId, AssessmentTest>>>,
    failing: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `tests`, ids kept as given.
    pub fn with_tests(tests: impl IntoIterator<Item = AssessmentTest>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.tests.write() {
            for test in tests {
                map.insert(test.id.clone(), test);
            }
        }
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of store calls made so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn test_count(&self) -> usize {
        self.tests.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn contains(&self, id: &TestId) -> bool {
        self.tests
            .read()
            .map(|m| m.contains_key(id))
            .unwrap_or(false)
    }

    pub fn snapshot(&self, id: &TestId) -> Option<AssessmentTest> {
        self.tests.read().ok().and_then(|m| m.get(id).cloned())
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::transport("injected failure"));
        }
        Ok(())
    }

    fn poisoned() -> StoreError {
        StoreError::transport("Lock poisoned: tests")
    }
}

#[async_trait]
impl AssessmentStore for MockStore {
    async fn list(&self) -> Result<Vec<AssessmentTest>, StoreError> {
        self.enter()?;
        let map = self.tests.read().map_err(|_| Self::poisoned())?;
        let mut tests: Vec<AssessmentTest> = map.values().cloned().collect();
        tests.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tests)
    }

    async fn get(&self, id: &TestId) -> Result<AssessmentTest, StoreError> {
        self.enter()?;
        let map = self.tests.read().map_err(|_| Self::poisoned())?;
        map.get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }

    async fn create(&self, payload: &TestPayload) -> Result<AssessmentTest, StoreError> {
        self.enter()?;
        let test = AssessmentTest {
            id: TestId::generate(),
            name: payload.name.clone(),
            subject: payload.subject,
            level: payload.level,
            test_questions: payload.test_questions.clone(),
            last_updated: Utc::now(),
        };
        let mut map = self.tests.write().map_err(|_| Self::poisoned())?;
        map.insert(test.id.clone(), test.clone());
        Ok(test)
    }

    async fn update(&self, payload: &UpdateTestPayload) -> Result<AssessmentTest, StoreError> {
        self.enter()?;
        let mut map = self.tests.write().map_err(|_| Self::poisoned())?;
        let existing = map.get_mut(&payload.id).ok_or_else(|| StoreError::NotFound {
            id: payload.id.clone(),
        })?;
        existing.name = payload.payload.name.clone();
        existing.subject = payload.payload.subject;
        existing.level = payload.payload.level;
        existing.test_questions = payload.payload.test_questions.clone();
        existing.last_updated = Utc::now();
        Ok(existing.clone())
    }

    async fn delete(&self, id: &TestId) -> Result<(), StoreError> {
        self.enter()?;
        let mut map = self.tests.write().map_err(|_| Self::poisoned())?;
        map.remove(id);
        Ok(())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating assessor entity types.

    use super::*;
    use proptest::prelude::*;
    use proptest::sample::Index;

    // === Identity and enum generators ===

    pub fn arb_test_id() -> impl Strategy<Value = TestId> {
        "[0-9a-f]{24}".prop_map(TestId::new)
    }

    /// Generate a Timestamp within 2020-2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    pub fn arb_subject() -> impl Strategy<Value = Subject> {
        prop_oneof![
            Just(Subject::Angular),
            Just(Subject::NestJs),
            Just(Subject::RxJs),
        ]
    }

    pub fn arb_subject_facet() -> impl Strategy<Value = SubjectFacet> {
        prop_oneof![
            Just(SubjectFacet::All),
            arb_subject().prop_map(SubjectFacet::Only),
        ]
    }

    pub fn arb_sort_key() -> impl Strategy<Value = SortKey> {
        prop_oneof![
            Just(SortKey::Updated),
            Just(SortKey::Name),
            Just(SortKey::Level),
        ]
    }

    pub fn arb_level() -> impl Strategy<Value = i64> {
        1i64..=10
    }

    // === Entity generators ===

    /// Non-blank text with no surrounding whitespace.
    pub fn arb_text(max: usize) -> impl Strategy<Value = String> {
        (
            "[A-Za-z0-9]",
            prop::collection::vec("[A-Za-z0-9 ?]", 0..=max.saturating_sub(2)),
            "[A-Za-z0-9?]",
        )
            .prop_map(|(first, middle, last)| format!("{}{}{}", first, middle.concat(), last))
    }

    /// A question that satisfies every rule: distinct choices and an answer
    /// naming one of them.
    pub fn arb_question() -> impl Strategy<Value = Question> {
        (
            arb_text(80),
            prop::collection::hash_set("[a-z]{1,12}", 2..6),
            any::<Index>(),
            arb_text(40),
            arb_text(40),
        )
            .prop_map(|(question, choices, answer, correct, incorrect)| {
                let mut choices: Vec<String> = choices.into_iter().collect();
                choices.sort();
                let answer = answer.get(&choices).clone();
                Question {
                    question,
                    choices: choices.into_iter().map(Choice::new).collect(),
                    answer,
                    correct_response: correct,
                    incorrect_response: incorrect,
                }
            })
    }

    /// A persisted test that satisfies every rule.
    pub fn arb_test() -> impl Strategy<Value = AssessmentTest> {
        (
            arb_test_id(),
            arb_text(40),
            arb_subject(),
            arb_level(),
            prop::collection::vec(arb_question(), 1..4),
            arb_timestamp(),
        )
            .prop_map(|(id, name, subject, level, test_questions, last_updated)| {
                AssessmentTest {
                    id,
                    name,
                    subject,
                    level,
                    test_questions,
                    last_updated,
                }
            })
    }

    /// A browse snapshot with unique ids.
    pub fn arb_tests(max: usize) -> impl Strategy<Value = Vec<AssessmentTest>> {
        prop::collection::vec(arb_test(), 0..max).prop_map(|tests| {
            tests
                .into_iter()
                .enumerate()
                .map(|(i, mut t)| {
                    t.id = TestId::new(format!("{}-{}", t.id, i));
                    t
                })
                .collect()
        })
    }

    pub fn arb_payload() -> impl Strategy<Value = TestPayload> {
        arb_test().prop_map(|t| t.to_payload())
    }

    pub fn arb_list_query() -> impl Strategy<Value = ListQuery> {
        (
            prop::option::of("[a-z0-9 ]{0,4}"),
            arb_subject_facet(),
            prop::option::of(1i64..=10),
            arb_sort_key(),
        )
            .prop_map(|(text, subject, level_ceiling, sort)| ListQuery {
                text: text.unwrap_or_default(),
                subject,
                level_ceiling,
                sort,
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;
    use chrono::{Duration, TimeZone};

    /// Fixed reference time so ordering assertions are deterministic.
    pub fn reference_time() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    pub fn complete_question(prompt: &str) -> Question {
        Question {
            question: prompt.to_string(),
            choices: vec![Choice::new("Yes"), Choice::new("No")],
            answer: "Yes".to_string(),
            correct_response: "Correct!".to_string(),
            incorrect_response: "Try again.".to_string(),
        }
    }

    /// A persisted test with one complete question, updated `age_days` before
    /// the reference time.
    pub fn test_with(
        id: &str,
        name: &str,
        subject: Subject,
        level: i64,
        age_days: i64,
    ) -> AssessmentTest {
        AssessmentTest {
            id: TestId::new(id),
            name: name.to_string(),
            subject,
            level,
            test_questions: vec![complete_question(&format!("{} question", name))],
            last_updated: reference_time() - Duration::days(age_days),
        }
    }

    /// `A` (Angular, level 1, older) and `B` (NestJS, level 3, newer).
    pub fn pair() -> Vec<AssessmentTest> {
        vec![
            test_with("a", "A", Subject::Angular, 1, 2),
            test_with("b", "B", Subject::NestJs, 3, 1),
        ]
    }

    /// A small catalogue covering every subject.
    pub fn catalogue() -> Vec<AssessmentTest> {
        vec![
            test_with("1", "Signals", Subject::Angular, 2, 5),
            test_with("2", "Dependency injection", Subject::Angular, 4, 1),
            test_with("3", "Guards and pipes", Subject::NestJs, 3, 3),
            test_with("4", "Operators", Subject::RxJs, 1, 0),
            test_with("5", "Schedulers", Subject::RxJs, 5, 8),
        ]
    }

    /// Blank template with every field filled in so it validates.
    pub fn completed_form(name: &str) -> EditableTest {
        let mut form = EditableTest::new();
        form.set_name(name);
        if let Some(q) = form.question_mut(0) {
            q.set_prompt("What is a pipe?");
            q.select_answer(0);
            q.set_correct_response("Correct!");
            q.set_incorrect_response("Try again.");
        }
        form
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for assessor-specific validation.

    use super::*;

    /// Assert that a store result is a NotFound error for `id`.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &Result<T, StoreError>, id: &TestId) {
        match result {
            Err(StoreError::NotFound { id: got }) => {
                assert_eq!(got, id, "Wrong id in NotFound error");
            }
            other => panic!("Expected NotFound for {}, got: {:?}", id, other),
        }
    }

    /// Assert that a store result is a transport failure.
    #[track_caller]
    pub fn assert_transport<T: std::fmt::Debug>(result: &Result<T, StoreError>) {
        match result {
            Err(StoreError::Transport { .. }) => {}
            other => panic!("Expected Transport error, got: {:?}", other),
        }
    }

    /// Assert that a session result wraps a store transport failure.
    #[track_caller]
    pub fn assert_session_transport<T: std::fmt::Debug>(result: &Result<T, SessionError>) {
        match result {
            Err(SessionError::Store(StoreError::Transport { .. })) => {}
            other => panic!("Expected Store transport error, got: {:?}", other),
        }
    }

    /// Assert that `path` currently fails with `expected`.
    #[track_caller]
    pub fn assert_field_error(form: &EditableTest, path: FieldPath, expected: ValidationError) {
        assert_eq!(
            form.error_for(&path),
            Some(expected),
            "Unexpected validation state for {}",
            path.label()
        );
    }

    /// Assert the ids of a derived view, in order.
    #[track_caller]
    pub fn assert_view_ids(view: &[&AssessmentTest], expected: &[&str]) {
        let ids: Vec<&str> = view.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, expected, "Unexpected view order");
    }
}
