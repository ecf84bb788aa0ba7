//! Authoring form model.
//!
//! [`EditableTest`] is the working copy of one authoring session. It is built
//! from a blank template or from an existing test, mutated through the
//! methods below, validated on demand, and turned into a [`TestPayload`].
//!
//! Structural floors (one question, two choices per question) are enforced by
//! the remove operations: a removal that would breach a floor is refused and
//! reported as `false`, not as an error. Validation re-asserts the floors anyway.

use crate::{
    AssessmentTest, Choice, Question, Subject, TestPayload, ValidationError,
    CHOICE_MAX_LEN, DEFAULT_CHOICES, MIN_CHOICES, MIN_LEVEL, MIN_QUESTIONS, NAME_MAX_LEN,
    QUESTION_MAX_LEN, RESPONSE_MAX_LEN,
};

// ============================================================================
// FIELDS
// ============================================================================

/// An editable value plus its "touched" flag.
///
/// The flag lives with the value so it follows a question or choice when the
/// surrounding collection shifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<T> {
    value: T,
    touched: bool,
}

impl<T> Field<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            touched: false,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Replace the value and mark the field touched.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.touched = true;
    }

    pub fn touch(&mut self) {
        self.touched = true;
    }
}

/// Address of a validated field or collection in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Name,
    Subject,
    Level,
    /// The question collection itself.
    Questions,
    Prompt { question: usize },
    /// The choice collection of one question.
    Choices { question: usize },
    Choice { question: usize, choice: usize },
    Answer { question: usize },
    CorrectResponse { question: usize },
    IncorrectResponse { question: usize },
}

impl FieldPath {
    /// Whether the path belongs to the Basics step.
    pub fn is_basics(&self) -> bool {
        matches!(self, FieldPath::Name | FieldPath::Subject | FieldPath::Level)
    }

    pub fn question_index(&self) -> Option<usize> {
        match self {
            FieldPath::Prompt { question }
            | FieldPath::Choices { question }
            | FieldPath::Choice { question, .. }
            | FieldPath::Answer { question }
            | FieldPath::CorrectResponse { question }
            | FieldPath::IncorrectResponse { question } => Some(*question),
            FieldPath::Name | FieldPath::Subject | FieldPath::Level | FieldPath::Questions => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            FieldPath::Name => "Name".to_string(),
            FieldPath::Subject => "Subject".to_string(),
            FieldPath::Level => "Level".to_string(),
            FieldPath::Questions => "Questions".to_string(),
            FieldPath::Prompt { question } => format!("Question {} prompt", question + 1),
            FieldPath::Choices { question } => format!("Question {} choices", question + 1),
            FieldPath::Choice { question, choice } => {
                format!("Question {} choice {}", question + 1, choice + 1)
            }
            FieldPath::Answer { question } => format!("Question {} answer", question + 1),
            FieldPath::CorrectResponse { question } => {
                format!("Question {} correct response", question + 1)
            }
            FieldPath::IncorrectResponse { question } => {
                format!("Question {} incorrect response", question + 1)
            }
        }
    }
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: FieldPath,
    pub error: ValidationError,
}

// ============================================================================
// EDITABLE QUESTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableQuestion {
    prompt: Field<String>,
    choices: Vec<Field<String>>,
    answer: Field<String>,
    correct_response: Field<String>,
    incorrect_response: Field<String>,
}

impl Default for EditableQuestion {
    fn default() -> Self {
        Self::new()
    }
}

impl EditableQuestion {
    /// Blank question seeded with the default choices.
    pub fn new() -> Self {
        Self {
            prompt: Field::new(String::new()),
            choices: default_choices(),
            answer: Field::new(String::new()),
            correct_response: Field::new(String::new()),
            incorrect_response: Field::new(String::new()),
        }
    }

    /// Copy an existing question. Choices are copied verbatim; an empty choice
    /// list is seeded with the defaults so the floor holds.
    pub fn from_question(question: &Question) -> Self {
        let choices = if question.choices.is_empty() {
            default_choices()
        } else {
            question
                .choices
                .iter()
                .map(|c| Field::new(c.value.clone()))
                .collect()
        };
        Self {
            prompt: Field::new(question.question.clone()),
            choices,
            answer: Field::new(question.answer.clone()),
            correct_response: Field::new(question.correct_response.clone()),
            incorrect_response: Field::new(question.incorrect_response.clone()),
        }
    }

    pub fn prompt(&self) -> &str {
        self.prompt.value()
    }

    pub fn answer(&self) -> &str {
        self.answer.value()
    }

    pub fn correct_response(&self) -> &str {
        self.correct_response.value()
    }

    pub fn incorrect_response(&self) -> &str {
        self.incorrect_response.value()
    }

    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(|c| c.value().as_str())
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    /// Candidate answers: the live choice values, in order.
    pub fn answer_options(&self) -> Vec<&str> {
        self.choices.iter().map(|c| c.value().as_str()).collect()
    }

    /// Index of the choice the answer currently points at.
    pub fn answer_index(&self) -> Option<usize> {
        let answer = self.answer.value();
        if answer.is_empty() {
            return None;
        }
        self.choices.iter().position(|c| c.value() == answer)
    }

    pub fn set_prompt(&mut self, value: impl Into<String>) {
        self.prompt.set(value.into());
    }

    pub fn set_correct_response(&mut self, value: impl Into<String>) {
        self.correct_response.set(value.into());
    }

    pub fn set_incorrect_response(&mut self, value: impl Into<String>) {
        self.incorrect_response.set(value.into());
    }

    pub fn set_choice(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.choices.get_mut(index) {
            Some(choice) => {
                choice.set(value.into());
                true
            }
            None => false,
        }
    }

    /// Point the answer at the choice at `index`, copying its current value.
    pub fn select_answer(&mut self, index: usize) -> bool {
        match self.choices.get(index) {
            Some(choice) => {
                let value = choice.value().clone();
                self.answer.set(value);
                true
            }
            None => false,
        }
    }

    /// Append one empty choice.
    pub fn add_choice(&mut self) {
        self.choices.push(Field::new(String::new()));
    }

    /// Remove the choice at `index`. Refused at the two-choice floor.
    pub fn remove_choice(&mut self, index: usize) -> bool {
        if self.choices.len() <= MIN_CHOICES || index >= self.choices.len() {
            return false;
        }
        self.choices.remove(index);
        true
    }

    fn is_touched(&self, path: &FieldPath) -> bool {
        match path {
            FieldPath::Prompt { .. } => self.prompt.is_touched(),
            FieldPath::Choices { .. } => self.choices.iter().any(Field::is_touched),
            FieldPath::Choice { choice, .. } => self
                .choices
                .get(*choice)
                .map(Field::is_touched)
                .unwrap_or(false),
            FieldPath::Answer { .. } => self.answer.is_touched(),
            FieldPath::CorrectResponse { .. } => self.correct_response.is_touched(),
            FieldPath::IncorrectResponse { .. } => self.incorrect_response.is_touched(),
            FieldPath::Name | FieldPath::Subject | FieldPath::Level | FieldPath::Questions => false,
        }
    }

    fn touch_all(&mut self) {
        self.prompt.touch();
        for choice in &mut self.choices {
            choice.touch();
        }
        self.answer.touch();
        self.correct_response.touch();
        self.incorrect_response.touch();
    }

    fn validate(&self, question: usize, out: &mut Vec<FieldError>) {
        if let Some(error) = check_text(self.prompt.value(), QUESTION_MAX_LEN) {
            out.push(FieldError {
                path: FieldPath::Prompt { question },
                error,
            });
        }
        if self.choices.len() < MIN_CHOICES {
            out.push(FieldError {
                path: FieldPath::Choices { question },
                error: ValidationError::TooFewItems {
                    min: MIN_CHOICES,
                    actual: self.choices.len(),
                },
            });
        }
        for (choice, field) in self.choices.iter().enumerate() {
            if let Some(error) = check_text(field.value(), CHOICE_MAX_LEN) {
                out.push(FieldError {
                    path: FieldPath::Choice { question, choice },
                    error,
                });
            }
        }
        if let Some(error) = self.check_answer() {
            out.push(FieldError {
                path: FieldPath::Answer { question },
                error,
            });
        }
        if let Some(error) = check_text(self.correct_response.value(), RESPONSE_MAX_LEN) {
            out.push(FieldError {
                path: FieldPath::CorrectResponse { question },
                error,
            });
        }
        if let Some(error) = check_text(self.incorrect_response.value(), RESPONSE_MAX_LEN) {
            out.push(FieldError {
                path: FieldPath::IncorrectResponse { question },
                error,
            });
        }
    }

    // Cross-field rule: the answer must name exactly one live choice.
    fn check_answer(&self) -> Option<ValidationError> {
        let answer = self.answer.value();
        if answer.is_empty() {
            return Some(ValidationError::Required);
        }
        let matches = self.choices.iter().filter(|c| c.value() == answer).count();
        match matches {
            0 => Some(ValidationError::AnswerNotAChoice),
            1 => None,
            matches => Some(ValidationError::AmbiguousAnswer { matches }),
        }
    }

    fn to_question(&self) -> Question {
        Question {
            question: self.prompt.value().trim().to_string(),
            choices: self
                .choices
                .iter()
                .map(|c| c.value().trim())
                .filter(|v| !v.is_empty())
                .map(Choice::new)
                .collect(),
            answer: self.answer.value().trim().to_string(),
            correct_response: self.correct_response.value().trim().to_string(),
            incorrect_response: self.incorrect_response.value().trim().to_string(),
        }
    }
}

// ============================================================================
// EDITABLE TEST
// ============================================================================

/// Working copy of a test for one authoring session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableTest {
    name: Field<String>,
    subject: Field<Subject>,
    /// `None` when the level input is blank or not a number.
    level: Field<Option<i64>>,
    questions: Vec<EditableQuestion>,
}

impl Default for EditableTest {
    fn default() -> Self {
        Self::new()
    }
}

impl EditableTest {
    /// Blank template: one default question with the two default choices.
    pub fn new() -> Self {
        Self {
            name: Field::new(String::new()),
            subject: Field::new(Subject::default()),
            level: Field::new(Some(MIN_LEVEL)),
            questions: vec![EditableQuestion::new()],
        }
    }

    /// Working copy of a persisted test.
    pub fn from_test(test: &AssessmentTest) -> Self {
        Self::from_parts(&test.name, test.subject, test.level, &test.test_questions)
    }

    /// Working copy of an unpersisted payload.
    pub fn from_payload(payload: &TestPayload) -> Self {
        Self::from_parts(
            &payload.name,
            payload.subject,
            payload.level,
            &payload.test_questions,
        )
    }

    fn from_parts(name: &str, subject: Subject, level: i64, questions: &[Question]) -> Self {
        let questions = if questions.is_empty() {
            vec![EditableQuestion::new()]
        } else {
            questions.iter().map(EditableQuestion::from_question).collect()
        };
        Self {
            name: Field::new(name.to_string()),
            subject: Field::new(subject),
            level: Field::new(Some(level)),
            questions,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        self.name.value()
    }

    pub fn subject(&self) -> Subject {
        *self.subject.value()
    }

    pub fn level(&self) -> Option<i64> {
        *self.level.value()
    }

    pub fn questions(&self) -> &[EditableQuestion] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&EditableQuestion> {
        self.questions.get(index)
    }

    pub fn question_mut(&mut self, index: usize) -> Option<&mut EditableQuestion> {
        self.questions.get_mut(index)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name.set(value.into());
    }

    pub fn set_subject(&mut self, subject: Subject) {
        self.subject.set(subject);
    }

    pub fn set_level(&mut self, level: Option<i64>) {
        self.level.set(level);
    }

    /// Parse raw level input; blank or non-numeric text clears the level.
    pub fn set_level_text(&mut self, text: &str) {
        let parsed = text.trim().parse::<i64>().ok();
        self.level.set(parsed);
    }

    /// Append one default question.
    pub fn add_question(&mut self) {
        self.questions.push(EditableQuestion::new());
    }

    /// Remove the question at `index`. Refused at the one-question floor.
    pub fn remove_question(&mut self, index: usize) -> bool {
        if self.questions.len() <= MIN_QUESTIONS || index >= self.questions.len() {
            return false;
        }
        self.questions.remove(index);
        true
    }

    pub fn add_choice(&mut self, question: usize) -> bool {
        match self.questions.get_mut(question) {
            Some(q) => {
                q.add_choice();
                true
            }
            None => false,
        }
    }

    pub fn remove_choice(&mut self, question: usize, choice: usize) -> bool {
        self.questions
            .get_mut(question)
            .map(|q| q.remove_choice(choice))
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------------
    // Touched state
    // ------------------------------------------------------------------------

    pub fn is_touched(&self, path: &FieldPath) -> bool {
        match path {
            FieldPath::Name => self.name.is_touched(),
            FieldPath::Subject => self.subject.is_touched(),
            FieldPath::Level => self.level.is_touched(),
            FieldPath::Questions => self
                .questions
                .iter()
                .enumerate()
                .any(|(i, q)| q.is_touched(&FieldPath::Prompt { question: i })),
            other => other
                .question_index()
                .and_then(|i| self.questions.get(i))
                .map(|q| q.is_touched(other))
                .unwrap_or(false),
        }
    }

    pub fn mark_basics_touched(&mut self) {
        self.name.touch();
        self.subject.touch();
        self.level.touch();
    }

    pub fn mark_questions_touched(&mut self) {
        for question in &mut self.questions {
            question.touch_all();
        }
    }

    pub fn mark_all_touched(&mut self) {
        self.mark_basics_touched();
        self.mark_questions_touched();
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Every failed rule, basics first, then questions in order.
    pub fn errors(&self) -> Vec<FieldError> {
        let mut out = Vec::new();
        if let Some(error) = check_text(self.name.value(), NAME_MAX_LEN) {
            out.push(FieldError {
                path: FieldPath::Name,
                error,
            });
        }
        match self.level.value() {
            None => out.push(FieldError {
                path: FieldPath::Level,
                error: ValidationError::Required,
            }),
            Some(level) if *level < MIN_LEVEL => out.push(FieldError {
                path: FieldPath::Level,
                error: ValidationError::BelowMinimum {
                    min: MIN_LEVEL,
                    actual: *level,
                },
            }),
            Some(_) => {}
        }
        if self.questions.len() < MIN_QUESTIONS {
            out.push(FieldError {
                path: FieldPath::Questions,
                error: ValidationError::TooFewItems {
                    min: MIN_QUESTIONS,
                    actual: self.questions.len(),
                },
            });
        }
        for (index, question) in self.questions.iter().enumerate() {
            question.validate(index, &mut out);
        }
        out
    }

    /// Errors on fields the user has touched.
    pub fn visible_errors(&self) -> Vec<FieldError> {
        self.errors()
            .into_iter()
            .filter(|e| self.is_touched(&e.path))
            .collect()
    }

    pub fn error_for(&self, path: &FieldPath) -> Option<ValidationError> {
        self.errors()
            .into_iter()
            .find(|e| e.path == *path)
            .map(|e| e.error)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Name, subject and level rules all pass.
    pub fn basics_valid(&self) -> bool {
        self.errors().iter().all(|e| !e.path.is_basics())
    }

    /// The whole question collection passes.
    pub fn questions_valid(&self) -> bool {
        self.errors().iter().all(|e| e.path.is_basics())
    }

    // ------------------------------------------------------------------------
    // Payload
    // ------------------------------------------------------------------------

    /// Assemble the transport payload.
    ///
    /// Text is trimmed, blank choices are pruned and questions whose prompt is
    /// blank after trimming are dropped, so the payload can hold fewer
    /// questions than the form when a required field held only whitespace.
    /// A blank level is sent as 0.
    pub fn to_payload(&self) -> TestPayload {
        TestPayload {
            name: self.name.value().trim().to_string(),
            subject: *self.subject.value(),
            level: self.level.value().unwrap_or(0),
            test_questions: self
                .questions
                .iter()
                .map(EditableQuestion::to_question)
                .filter(|q| !q.question.is_empty())
                .collect(),
        }
    }
}

fn default_choices() -> Vec<Field<String>> {
    DEFAULT_CHOICES
        .iter()
        .map(|c| Field::new((*c).to_string()))
        .collect()
}

// Required means non-empty as typed; whitespace satisfies it.
fn check_text(value: &str, max: usize) -> Option<ValidationError> {
    if value.is_empty() {
        return Some(ValidationError::Required);
    }
    let actual = value.chars().count();
    if actual > max {
        return Some(ValidationError::TooLong { max, actual });
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        AddQuestion,
        RemoveQuestion(usize),
        AddChoice(usize),
        RemoveChoice(usize, usize),
        SetPrompt(usize, String),
        SetChoice(usize, usize, String),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::AddQuestion),
            (0usize..6).prop_map(Op::RemoveQuestion),
            (0usize..6).prop_map(Op::AddChoice),
            (0usize..6, 0usize..6).prop_map(|(q, c)| Op::RemoveChoice(q, c)),
            (0usize..6, "[ a-z]{0,8}").prop_map(|(q, s)| Op::SetPrompt(q, s)),
            (0usize..6, 0usize..6, "[ a-z]{0,8}").prop_map(|(q, c, s)| Op::SetChoice(q, c, s)),
        ]
    }

    fn apply(form: &mut EditableTest, op: Op) {
        match op {
            Op::AddQuestion => form.add_question(),
            Op::RemoveQuestion(i) => {
                form.remove_question(i);
            }
            Op::AddChoice(q) => {
                form.add_choice(q);
            }
            Op::RemoveChoice(q, c) => {
                form.remove_choice(q, c);
            }
            Op::SetPrompt(q, s) => {
                if let Some(question) = form.question_mut(q) {
                    question.set_prompt(s);
                }
            }
            Op::SetChoice(q, c, s) => {
                if let Some(question) = form.question_mut(q) {
                    question.set_choice(c, s);
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_structural_floors_hold(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut form = EditableTest::new();
            for op in ops {
                apply(&mut form, op);
                prop_assert!(form.question_count() >= MIN_QUESTIONS);
                for q in form.questions() {
                    prop_assert!(q.choice_count() >= MIN_CHOICES);
                }
            }
        }

        #[test]
        fn prop_add_then_remove_question_restores(ops in prop::collection::vec(arb_op(), 0..20)) {
            let mut form = EditableTest::new();
            for op in ops {
                apply(&mut form, op);
            }
            let before = form.questions().to_vec();
            form.add_question();
            let added = form.question_count() - 1;
            prop_assert!(form.remove_question(added));
            prop_assert_eq!(form.questions(), before.as_slice());
        }

        #[test]
        fn prop_payload_never_contains_blank_text(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut form = EditableTest::new();
            for op in ops {
                apply(&mut form, op);
            }
            let payload = form.to_payload();
            prop_assert!(payload.question_count() <= form.question_count());
            for q in &payload.test_questions {
                prop_assert!(!q.question.trim().is_empty());
                for c in &q.choices {
                    prop_assert!(!c.value.trim().is_empty());
                }
            }
        }
    }
}
