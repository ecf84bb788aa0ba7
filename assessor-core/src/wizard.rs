//! Three-step authoring wizard: Basics, Questions, Review.
//!
//! Forward moves are gated on the validity of the step being left. A failed
//! gate marks that step's fields touched so their errors become visible.

use crate::{EditableTest, TestPayload, WizardError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    Basics,
    Questions,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Basics, WizardStep::Questions, WizardStep::Review];

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Basics => 0,
            WizardStep::Questions => 1,
            WizardStep::Review => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<WizardStep> {
        Self::ALL.get(index).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Basics => "Basics",
            WizardStep::Questions => "Questions",
            WizardStep::Review => "Review",
        }
    }

    fn following(&self) -> WizardStep {
        match self {
            WizardStep::Basics => WizardStep::Questions,
            WizardStep::Questions | WizardStep::Review => WizardStep::Review,
        }
    }

    fn preceding(&self) -> WizardStep {
        match self {
            WizardStep::Basics | WizardStep::Questions => WizardStep::Basics,
            WizardStep::Review => WizardStep::Questions,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Step sequencer that exclusively owns the working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    form: EditableTest,
    step: WizardStep,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(EditableTest::new())
    }
}

impl Wizard {
    pub fn new(form: EditableTest) -> Self {
        Self {
            form,
            step: WizardStep::Basics,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &EditableTest {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditableTest {
        &mut self.form
    }

    /// Whether `step` would let the user move past it.
    pub fn step_valid(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Basics => self.form.basics_valid(),
            WizardStep::Questions => self.form.questions_valid(),
            WizardStep::Review => true,
        }
    }

    fn touch_step(&mut self, step: WizardStep) {
        match step {
            WizardStep::Basics => self.form.mark_basics_touched(),
            WizardStep::Questions => self.form.mark_questions_touched(),
            WizardStep::Review => {}
        }
    }

    /// Advance one step if the current one is valid. Returns whether it moved
    /// or was already on Review.
    pub fn next(&mut self) -> bool {
        if !self.step_valid(self.step) {
            self.touch_step(self.step);
            return false;
        }
        self.step = self.step.following();
        true
    }

    /// Step back; never gated.
    pub fn prev(&mut self) {
        self.step = self.step.preceding();
    }

    /// Jump to `target`. Backward jumps always land; forward jumps pass
    /// through every gate on the way and stop at the first invalid step.
    pub fn go_to(&mut self, target: WizardStep) -> WizardStep {
        if target <= self.step {
            self.step = target;
            return self.step;
        }
        while self.step < target {
            if !self.next() {
                break;
            }
        }
        self.step
    }

    /// Produce the payload. Only valid from Review and only for a valid form;
    /// an invalid form gets every field touched.
    pub fn submit(&mut self) -> Result<TestPayload, WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::NotOnReview { step: self.step });
        }
        let errors = self.form.errors().len();
        if errors > 0 {
            self.form.mark_all_touched();
            return Err(WizardError::Invalid { errors });
        }
        Ok(self.form.to_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldPath;

    fn valid_basics() -> Wizard {
        let mut wizard = Wizard::default();
        wizard.form_mut().set_name("Observables 101");
        wizard
    }

    fn fill_questions(wizard: &mut Wizard) {
        if let Some(q) = wizard.form_mut().question_mut(0) {
            q.set_prompt("What does pipe() do?");
            q.select_answer(1);
            q.set_correct_response("Yes");
            q.set_incorrect_response("No");
        }
    }

    #[test]
    fn test_step_indices() {
        for (i, step) in WizardStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(WizardStep::from_index(i), Some(*step));
        }
        assert_eq!(WizardStep::from_index(3), None);
    }

    #[test]
    fn test_next_blocked_on_blank_name_touches_it() {
        let mut wizard = Wizard::default();
        assert!(!wizard.next());
        assert_eq!(wizard.step(), WizardStep::Basics);
        assert!(wizard.form().is_touched(&FieldPath::Name));
        assert!(!wizard.form().is_touched(&FieldPath::Prompt { question: 0 }));
    }

    #[test]
    fn test_next_advances_and_caps_at_review() {
        let mut wizard = valid_basics();
        fill_questions(&mut wizard);
        assert!(wizard.next());
        assert!(wizard.next());
        assert_eq!(wizard.step(), WizardStep::Review);
        assert!(wizard.next());
        assert_eq!(wizard.step(), WizardStep::Review);
    }

    #[test]
    fn test_prev_never_gated_and_floors_at_basics() {
        let mut wizard = valid_basics();
        wizard.next();
        wizard.form_mut().set_name("");
        wizard.prev();
        assert_eq!(wizard.step(), WizardStep::Basics);
        wizard.prev();
        assert_eq!(wizard.step(), WizardStep::Basics);
    }

    #[test]
    fn test_go_to_review_stops_at_invalid_questions() {
        let mut wizard = valid_basics();
        assert_eq!(wizard.go_to(WizardStep::Review), WizardStep::Questions);
        assert!(wizard.form().is_touched(&FieldPath::Prompt { question: 0 }));
    }

    #[test]
    fn test_go_to_blocked_at_basics() {
        let mut wizard = Wizard::default();
        assert_eq!(wizard.go_to(WizardStep::Review), WizardStep::Basics);
    }

    #[test]
    fn test_go_to_backward_always_allowed() {
        let mut wizard = valid_basics();
        fill_questions(&mut wizard);
        wizard.go_to(WizardStep::Review);
        wizard.form_mut().set_name("");
        assert_eq!(wizard.go_to(WizardStep::Basics), WizardStep::Basics);
        assert_eq!(wizard.go_to(WizardStep::Basics), WizardStep::Basics);
    }

    #[test]
    fn test_submit_requires_review() {
        let mut wizard = valid_basics();
        assert_eq!(
            wizard.submit(),
            Err(WizardError::NotOnReview {
                step: WizardStep::Basics
            })
        );
    }

    #[test]
    fn test_submit_invalid_form_touches_everything() {
        let mut wizard = valid_basics();
        fill_questions(&mut wizard);
        wizard.go_to(WizardStep::Review);
        wizard.form_mut().set_name("");
        let result = wizard.submit();
        assert_eq!(result, Err(WizardError::Invalid { errors: 1 }));
        assert!(wizard.form().is_touched(&FieldPath::Choice {
            question: 0,
            choice: 0
        }));
    }

    #[test]
    fn test_submit_valid_form_returns_payload() {
        let mut wizard = valid_basics();
        fill_questions(&mut wizard);
        wizard.go_to(WizardStep::Review);
        let payload = wizard.submit().unwrap();
        assert_eq!(payload.name, "Observables 101");
        assert_eq!(payload.test_questions[0].answer, "Choice B");
    }
}
