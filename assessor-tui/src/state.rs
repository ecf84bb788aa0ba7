//! Application state and transitions.
//!
//! Every handler here is synchronous and runs to completion. Store work is
//! requested by returning a [`Command`]; its answer comes back later through
//! [`App::apply_event`].

use crate::config::TuiConfig;
use crate::events::{Command, TuiEvent};
use crate::keys::{map_key, Action, InputMode};
use crate::nav::{wizard_fields, Screen, WizardField};
use crate::notifications::{Notification, NotificationLevel};
use crate::theme::SynthBruteTheme;
use assessor_core::{
    AssessmentTest, AuthoringSession, SessionError, SessionMode, SessionPhase, StoreError,
    TestBrowser, TestId, WizardError, WizardStep,
};
use chrono::{DateTime, Utc};

/// What a text input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Search,
    LevelCeiling,
    Field(WizardField),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub target: InputTarget,
    pub buffer: String,
}

/// Authoring session plus the focused control.
#[derive(Debug, Clone)]
pub struct WizardScreen {
    pub session: AuthoringSession,
    pub focus: usize,
}

impl WizardScreen {
    pub fn new(session: AuthoringSession) -> Self {
        Self { session, focus: 0 }
    }

    pub fn fields(&self) -> Vec<WizardField> {
        let wizard = self.session.wizard();
        wizard_fields(wizard.step(), wizard.form())
    }

    pub fn focused(&self) -> Option<WizardField> {
        self.fields().get(self.focus).copied()
    }

    fn clamp_focus(&mut self) {
        let len = self.fields().len();
        if self.focus >= len {
            self.focus = len.saturating_sub(1);
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.fields().len();
        if len == 0 {
            self.focus = 0;
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    fn focus_field(&mut self, field: WizardField) {
        if let Some(index) = self.fields().iter().position(|f| *f == field) {
            self.focus = index;
        }
    }
}

pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub screen: Screen,
    pub browser: TestBrowser,
    pub selected: Option<TestId>,
    pub input: Option<TextInput>,
    /// Test awaiting delete confirmation.
    pub pending_delete: Option<TestId>,
    pub wizard: Option<WizardScreen>,
    pub notifications: Vec<Notification>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: TuiConfig) -> Self {
        Self {
            config,
            theme: SynthBruteTheme::synthbrute(),
            screen: Screen::Browse,
            browser: TestBrowser::new(),
            selected: None,
            input: None,
            pending_delete: None,
            wizard: None,
            notifications: Vec::new(),
            should_quit: false,
        }
    }

    /// Initial command: load the browse list.
    pub fn start(&mut self) -> Command {
        self.browser.begin_reload();
        Command::LoadTests
    }

    pub fn input_mode(&self) -> InputMode {
        if self.input.is_some() {
            InputMode::Text
        } else {
            InputMode::Normal
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    pub fn prune_notifications(&mut self, now: DateTime<Utc>) {
        self.notifications.retain(|n| !n.is_expired(now));
    }

    /// The selected test, when it is in the current view.
    pub fn selected_test(&self) -> Option<&AssessmentTest> {
        let id = self.selected.as_ref()?;
        self.browser.view().into_iter().find(|t| &t.id == id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected.as_ref()?;
        self.browser.view().iter().position(|t| &t.id == id)
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    pub fn apply_event(&mut self, event: TuiEvent) -> Option<Command> {
        match event {
            TuiEvent::Input(key) => {
                let action = map_key(key, self.input_mode())?;
                self.handle_action(action)
            }
            TuiEvent::Tick => {
                self.prune_notifications(Utc::now());
                None
            }
            TuiEvent::Resize { .. } => None,
            TuiEvent::TestsLoaded(result) => {
                if let Err(e) = self.browser.complete_reload(result) {
                    self.notify(
                        NotificationLevel::Error,
                        format!("Failed to load assessment tests: {}", e),
                    );
                }
                self.sync_selection();
                None
            }
            TuiEvent::TestFetched { id, result } => self.on_test_fetched(&id, result),
            TuiEvent::TestSaved(result) => self.on_test_saved(result),
            TuiEvent::TestDeleted { id, result } => {
                match self.browser.complete_delete(&id, result) {
                    Ok(()) => self.notify(NotificationLevel::Success, "Test deleted"),
                    Err(e) => self.notify(
                        NotificationLevel::Error,
                        format!("Failed to delete test: {}", e),
                    ),
                }
                self.sync_selection();
                None
            }
        }
    }

    fn on_test_fetched(
        &mut self,
        id: &TestId,
        result: Result<AssessmentTest, StoreError>,
    ) -> Option<Command> {
        let screen = self.wizard.as_mut()?;
        match screen.session.complete_load(id, result) {
            Ok(()) => {
                screen.focus = 0;
                None
            }
            Err(SessionError::Store(e)) if e.is_not_found() => {
                self.notify(NotificationLevel::Error, "Assessment test not found");
                self.close_wizard();
                self.browser.begin_reload();
                Some(Command::LoadTests)
            }
            Err(SessionError::Store(e)) => {
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to load assessment test: {} (r to retry, Esc to go back)", e),
                );
                None
            }
            // Fetch started by an earlier session, or no session waiting.
            Err(_) => None,
        }
    }

    fn on_test_saved(&mut self, result: Result<AssessmentTest, StoreError>) -> Option<Command> {
        let screen = self.wizard.as_mut()?;
        let created = matches!(screen.session.mode(), SessionMode::Create);
        match screen.session.complete_submit(result) {
            Ok(test) => {
                let message = if created {
                    "Assessment test created"
                } else {
                    "Assessment test updated"
                };
                self.notify(NotificationLevel::Success, message);
                self.selected = Some(test.id.clone());
                self.browser.upsert(test);
                self.close_wizard();
                self.browser.begin_reload();
                Some(Command::LoadTests)
            }
            Err(SessionError::Store(e)) => {
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to save assessment test: {}", e),
                );
                None
            }
            Err(_) => None,
        }
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    pub fn handle_action(&mut self, action: Action) -> Option<Command> {
        if action == Action::Quit {
            self.should_quit = true;
            return None;
        }
        if self.input.is_some() {
            self.handle_text_action(action);
            return None;
        }
        if let Some(id) = self.pending_delete.take() {
            return self.handle_delete_prompt(id, action);
        }
        match self.screen {
            Screen::Browse => self.handle_browse_action(action),
            Screen::Wizard => self.handle_wizard_action(action),
        }
    }

    fn handle_delete_prompt(&mut self, id: TestId, action: Action) -> Option<Command> {
        match action {
            Action::Confirm | Action::Select => {
                self.browser.begin_delete();
                Some(Command::Delete(id))
            }
            _ => {
                self.notify(NotificationLevel::Info, "Delete cancelled");
                None
            }
        }
    }

    fn handle_browse_action(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::MoveDown => self.move_selection(true),
            Action::MoveUp => self.move_selection(false),
            Action::NewItem => {
                self.open_wizard(AuthoringSession::create());
            }
            Action::EditItem | Action::Select => {
                let id = self.selected_test().map(|t| t.id.clone())?;
                self.open_wizard(AuthoringSession::edit(id.clone()));
                return Some(Command::FetchTest(id));
            }
            Action::DeleteItem => {
                self.pending_delete = self.selected_test().map(|t| t.id.clone());
            }
            Action::Refresh => {
                self.browser.begin_reload();
                return Some(Command::LoadTests);
            }
            Action::OpenSearch => {
                self.input = Some(TextInput {
                    target: InputTarget::Search,
                    buffer: self.browser.query().text.clone(),
                });
            }
            Action::LevelCeiling => {
                self.input = Some(TextInput {
                    target: InputTarget::LevelCeiling,
                    buffer: self
                        .browser
                        .query()
                        .level_ceiling
                        .map(|c| c.to_string())
                        .unwrap_or_default(),
                });
            }
            Action::CycleSubject => {
                self.browser.cycle_subject();
                self.sync_selection();
            }
            Action::CycleSort => {
                self.browser.cycle_sort();
            }
            Action::ClearFilters => {
                self.browser.clear_filters();
                self.sync_selection();
            }
            _ => {}
        }
        None
    }

    fn handle_wizard_action(&mut self, action: Action) -> Option<Command> {
        let screen = self.wizard.as_mut()?;
        match screen.session.phase().clone() {
            SessionPhase::Loading => match action {
                Action::Cancel => {
                    screen.session.cancel();
                    self.close_wizard();
                    None
                }
                Action::Refresh => screen.session.pending_load().cloned().map(Command::FetchTest),
                _ => None,
            },
            SessionPhase::Editing => self.handle_editing_action(action),
            SessionPhase::Saving | SessionPhase::Closed(_) => None,
        }
    }

    fn handle_editing_action(&mut self, action: Action) -> Option<Command> {
        let screen = self.wizard.as_mut()?;
        let focused = screen.focused();
        let step = screen.session.wizard().step();
        match action {
            Action::Cancel => {
                screen.session.cancel();
                self.close_wizard();
                self.notify(NotificationLevel::Info, "Changes discarded");
            }
            Action::NextField | Action::MoveDown => screen.move_focus(true),
            Action::PrevField | Action::MoveUp => screen.move_focus(false),
            Action::MoveLeft => self.adjust_picker(false),
            Action::MoveRight => self.adjust_picker(true),
            Action::Select if step == WizardStep::Review => return self.submit(),
            Action::Select => match focused {
                Some(field) if field.is_text() => {
                    let buffer = field.current_text(screen.session.wizard().form());
                    self.input = Some(TextInput {
                        target: InputTarget::Field(field),
                        buffer,
                    });
                }
                Some(_) => self.adjust_picker(true),
                None => {}
            },
            Action::NextStep => {
                if let Ok(wizard) = screen.session.wizard_mut() {
                    let moved = wizard.next();
                    screen.focus = 0;
                    if !moved {
                        self.notify(NotificationLevel::Warning, "Fix the highlighted fields first");
                    }
                }
            }
            Action::PrevStep => {
                if let Ok(wizard) = screen.session.wizard_mut() {
                    wizard.prev();
                    screen.focus = 0;
                }
            }
            Action::GoToStep(index) => {
                let Some(target) = WizardStep::from_index(index) else {
                    return None;
                };
                if let Ok(wizard) = screen.session.wizard_mut() {
                    let reached = wizard.go_to(target);
                    screen.focus = 0;
                    if reached != target {
                        self.notify(
                            NotificationLevel::Warning,
                            format!("Stopped at {}: fix the highlighted fields", reached),
                        );
                    }
                }
            }
            Action::AddQuestion if step == WizardStep::Questions => {
                if let Ok(wizard) = screen.session.wizard_mut() {
                    wizard.form_mut().add_question();
                    let question = wizard.form().question_count() - 1;
                    screen.focus_field(WizardField::Prompt { question });
                }
            }
            Action::RemoveQuestion if step == WizardStep::Questions => {
                let Some(question) = focused.and_then(|f| f.question_index()) else {
                    return None;
                };
                let removed = screen
                    .session
                    .wizard_mut()
                    .map(|w| w.form_mut().remove_question(question))
                    .unwrap_or(false);
                screen.clamp_focus();
                if !removed {
                    self.notify(NotificationLevel::Warning, "A test needs at least one question");
                }
            }
            Action::AddChoice if step == WizardStep::Questions => {
                let Some(question) = focused.and_then(|f| f.question_index()) else {
                    return None;
                };
                if let Ok(wizard) = screen.session.wizard_mut() {
                    wizard.form_mut().add_choice(question);
                }
            }
            Action::RemoveChoice if step == WizardStep::Questions => {
                let Some(WizardField::Choice { question, choice }) = focused else {
                    self.notify(NotificationLevel::Info, "Focus a choice to remove it");
                    return None;
                };
                let removed = screen
                    .session
                    .wizard_mut()
                    .map(|w| w.form_mut().remove_choice(question, choice))
                    .unwrap_or(false);
                screen.clamp_focus();
                if !removed {
                    self.notify(NotificationLevel::Warning, "A question needs at least two choices");
                }
            }
            Action::Submit => return self.submit(),
            _ => {}
        }
        None
    }

    fn submit(&mut self) -> Option<Command> {
        let screen = self.wizard.as_mut()?;
        match screen.session.begin_submit() {
            Ok(request) => Some(Command::Submit(request)),
            Err(SessionError::Wizard(WizardError::NotOnReview { .. })) => {
                self.notify(NotificationLevel::Info, "Review the test before saving");
                None
            }
            Err(SessionError::Wizard(WizardError::Invalid { errors })) => {
                self.notify(
                    NotificationLevel::Warning,
                    format!("{} field(s) need attention before saving", errors),
                );
                None
            }
            Err(_) => None,
        }
    }

    /// Left/right on a picker or the level field.
    fn adjust_picker(&mut self, forward: bool) {
        let Some(screen) = self.wizard.as_mut() else {
            return;
        };
        let Some(field) = screen.focused() else {
            return;
        };
        let Ok(wizard) = screen.session.wizard_mut() else {
            return;
        };
        let form = wizard.form_mut();
        match field {
            WizardField::Subject => {
                let subject = form.subject();
                form.set_subject(if forward {
                    subject.cycle_next()
                } else {
                    subject.cycle_prev()
                });
            }
            WizardField::Level => {
                let level = form.level().unwrap_or(0);
                let next = if forward {
                    level.saturating_add(1)
                } else {
                    level.saturating_sub(1).max(1)
                };
                form.set_level(Some(next));
            }
            WizardField::Answer { question } => {
                if let Some(q) = form.question_mut(question) {
                    let count = q.choice_count();
                    let next = match q.answer_index() {
                        Some(i) if forward => (i + 1) % count,
                        Some(i) => (i + count - 1) % count,
                        None => 0,
                    };
                    q.select_answer(next);
                }
            }
            _ => {}
        }
    }

    fn handle_text_action(&mut self, action: Action) {
        let Some(mut input) = self.input.take() else {
            return;
        };
        match action {
            Action::InsertChar(c) => {
                input.buffer.push(c);
                self.apply_live_input(&input);
                self.input = Some(input);
            }
            Action::DeleteChar => {
                input.buffer.pop();
                self.apply_live_input(&input);
                self.input = Some(input);
            }
            Action::Select => self.commit_input(input),
            Action::NextField | Action::PrevField => {
                self.commit_input(input);
                if let Some(screen) = self.wizard.as_mut() {
                    screen.move_focus(action == Action::NextField);
                }
            }
            Action::Cancel => {}
            _ => self.input = Some(input),
        }
    }

    // Browse filters follow every keystroke.
    fn apply_live_input(&mut self, input: &TextInput) {
        match input.target {
            InputTarget::Search => {
                self.browser.set_search_text(input.buffer.clone());
                self.sync_selection();
            }
            InputTarget::LevelCeiling => {
                self.browser.set_level_ceiling_input(&input.buffer);
                self.sync_selection();
            }
            InputTarget::Field(_) => {}
        }
    }

    fn commit_input(&mut self, input: TextInput) {
        let InputTarget::Field(field) = input.target else {
            return;
        };
        let Some(screen) = self.wizard.as_mut() else {
            return;
        };
        let Ok(wizard) = screen.session.wizard_mut() else {
            return;
        };
        let form = wizard.form_mut();
        let text = input.buffer;
        match field {
            WizardField::Name => form.set_name(text),
            WizardField::Level => form.set_level_text(&text),
            WizardField::Prompt { question } => {
                if let Some(q) = form.question_mut(question) {
                    q.set_prompt(text);
                }
            }
            WizardField::Choice { question, choice } => {
                if let Some(q) = form.question_mut(question) {
                    q.set_choice(choice, text);
                }
            }
            WizardField::CorrectResponse { question } => {
                if let Some(q) = form.question_mut(question) {
                    q.set_correct_response(text);
                }
            }
            WizardField::IncorrectResponse { question } => {
                if let Some(q) = form.question_mut(question) {
                    q.set_incorrect_response(text);
                }
            }
            WizardField::Subject | WizardField::Answer { .. } => {}
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn open_wizard(&mut self, session: AuthoringSession) {
        self.wizard = Some(WizardScreen::new(session));
        self.screen = Screen::Wizard;
    }

    fn close_wizard(&mut self) {
        self.wizard = None;
        self.input = None;
        self.screen = Screen::Browse;
        self.sync_selection();
    }

    fn move_selection(&mut self, forward: bool) {
        let view = self.browser.view();
        if view.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .as_ref()
            .and_then(|id| view.iter().position(|t| &t.id == id));
        let next = match current {
            Some(i) if forward => (i + 1).min(view.len() - 1),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.selected = Some(view[next].id.clone());
    }

    /// Keep the selection inside the current view.
    fn sync_selection(&mut self) {
        let view = self.browser.view();
        let still_visible = self
            .selected
            .as_ref()
            .map(|id| view.iter().any(|t| &t.id == id))
            .unwrap_or(false);
        if !still_visible {
            self.selected = view.first().map(|t| t.id.clone());
        }
    }
}
