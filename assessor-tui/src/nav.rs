//! Screens and wizard field focus.

use assessor_core::{EditableTest, FieldPath, WizardStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Wizard,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Browse => "Assessment Tests",
            Screen::Wizard => "Authoring",
        }
    }
}

/// A focusable control on the wizard screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardField {
    Name,
    Subject,
    Level,
    Prompt { question: usize },
    Choice { question: usize, choice: usize },
    Answer { question: usize },
    CorrectResponse { question: usize },
    IncorrectResponse { question: usize },
}

impl WizardField {
    pub fn path(&self) -> FieldPath {
        match *self {
            WizardField::Name => FieldPath::Name,
            WizardField::Subject => FieldPath::Subject,
            WizardField::Level => FieldPath::Level,
            WizardField::Prompt { question } => FieldPath::Prompt { question },
            WizardField::Choice { question, choice } => FieldPath::Choice { question, choice },
            WizardField::Answer { question } => FieldPath::Answer { question },
            WizardField::CorrectResponse { question } => FieldPath::CorrectResponse { question },
            WizardField::IncorrectResponse { question } => {
                FieldPath::IncorrectResponse { question }
            }
        }
    }

    /// Subject and answer are pickers; everything else takes typed text.
    pub fn is_text(&self) -> bool {
        !matches!(self, WizardField::Subject | WizardField::Answer { .. })
    }

    pub fn question_index(&self) -> Option<usize> {
        self.path().question_index()
    }

    pub fn label(&self) -> String {
        match self {
            WizardField::Name => "Name".to_string(),
            WizardField::Subject => "Subject".to_string(),
            WizardField::Level => "Level".to_string(),
            WizardField::Prompt { .. } => "Question".to_string(),
            WizardField::Choice { choice, .. } => format!("Choice {}", choice + 1),
            WizardField::Answer { .. } => "Answer".to_string(),
            WizardField::CorrectResponse { .. } => "Correct response".to_string(),
            WizardField::IncorrectResponse { .. } => "Incorrect response".to_string(),
        }
    }

    /// Current text of the field, for seeding an edit buffer.
    pub fn current_text(&self, form: &EditableTest) -> String {
        match *self {
            WizardField::Name => form.name().to_string(),
            WizardField::Subject => form.subject().label().to_string(),
            WizardField::Level => form.level().map(|l| l.to_string()).unwrap_or_default(),
            WizardField::Prompt { question } => form
                .question(question)
                .map(|q| q.prompt().to_string())
                .unwrap_or_default(),
            WizardField::Choice { question, choice } => form
                .question(question)
                .and_then(|q| q.choice(choice))
                .map(str::to_string)
                .unwrap_or_default(),
            WizardField::Answer { question } => form
                .question(question)
                .map(|q| q.answer().to_string())
                .unwrap_or_default(),
            WizardField::CorrectResponse { question } => form
                .question(question)
                .map(|q| q.correct_response().to_string())
                .unwrap_or_default(),
            WizardField::IncorrectResponse { question } => form
                .question(question)
                .map(|q| q.incorrect_response().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Focus order of the controls on `step`.
pub fn wizard_fields(step: WizardStep, form: &EditableTest) -> Vec<WizardField> {
    match step {
        WizardStep::Basics => vec![WizardField::Name, WizardField::Subject, WizardField::Level],
        WizardStep::Questions => {
            let mut fields = Vec::new();
            for (question, q) in form.questions().iter().enumerate() {
                fields.push(WizardField::Prompt { question });
                for choice in 0..q.choice_count() {
                    fields.push(WizardField::Choice { question, choice });
                }
                fields.push(WizardField::Answer { question });
                fields.push(WizardField::CorrectResponse { question });
                fields.push(WizardField::IncorrectResponse { question });
            }
            fields
        }
        WizardStep::Review => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_step_field_order() {
        let form = EditableTest::new();
        let fields = wizard_fields(WizardStep::Questions, &form);
        assert_eq!(
            fields,
            vec![
                WizardField::Prompt { question: 0 },
                WizardField::Choice {
                    question: 0,
                    choice: 0
                },
                WizardField::Choice {
                    question: 0,
                    choice: 1
                },
                WizardField::Answer { question: 0 },
                WizardField::CorrectResponse { question: 0 },
                WizardField::IncorrectResponse { question: 0 },
            ]
        );
        assert!(wizard_fields(WizardStep::Review, &form).is_empty());
    }

    #[test]
    fn test_pickers_are_not_text() {
        assert!(!WizardField::Subject.is_text());
        assert!(!WizardField::Answer { question: 0 }.is_text());
        assert!(WizardField::Level.is_text());
    }
}
