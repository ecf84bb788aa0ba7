//! Drives `App` through key presses and store round trips against the mock
//! store, the same way the event loop does.

use assessor_core::{AssessmentStore, SessionPhase, Subject, TestId, WizardStep};
use assessor_test_utils::{fixtures, MockStore};
use assessor_tui::config::{AuthConfig, ThemeConfig, TuiConfig};
use assessor_tui::events::{execute, Command, TuiEvent};
use assessor_tui::nav::Screen;
use assessor_tui::notifications::NotificationLevel;
use assessor_tui::state::App;
use assessor_tui::views::browse::filter_groups;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:3000".to_string(),
        auth: AuthConfig::default(),
        request_timeout_ms: 5_000,
        refresh_interval_ms: 250,
        error_log_path: "tmp/assessor-tui.log".into(),
        log_filter: "info".to_string(),
        theme: ThemeConfig {
            name: "synthbrute".to_string(),
        },
    }
}

fn press(app: &mut App, code: KeyCode) -> Option<Command> {
    app.apply_event(TuiEvent::Input(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        assert!(press(app, KeyCode::Char(ch)).is_none());
    }
}

/// Execute a command and every follow-up it triggers.
async fn run(app: &mut App, store: &MockStore, command: Option<Command>) {
    let mut next = command;
    while let Some(command) = next {
        let event = execute(store, command).await;
        next = app.apply_event(event);
    }
}

async fn started(store: &MockStore) -> App {
    let mut app = App::new(base_config());
    let command = app.start();
    run(&mut app, store, Some(command)).await;
    app
}

fn last_notice(app: &App) -> (NotificationLevel, &str) {
    let note = app.notifications.last().expect("no notification");
    (note.level, note.message.as_str())
}

#[tokio::test]
async fn initial_load_selects_most_recent() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let app = started(&store).await;

    assert!(!app.browser.is_loading());
    assert_eq!(app.browser.tests().len(), 5);
    assert_eq!(app.selected, Some(TestId::new("4")));
    assert!(app.notifications.is_empty());
}

#[tokio::test]
async fn load_failure_empties_list_and_reports() {
    let store = MockStore::with_tests(fixtures::catalogue());
    store.set_failing(true);
    let app = started(&store).await;

    assert!(app.browser.tests().is_empty());
    assert!(app.browser.shows_empty_state());
    let (level, message) = last_notice(&app);
    assert_eq!(level, NotificationLevel::Error);
    assert!(message.starts_with("Failed to load assessment tests"));
}

#[tokio::test]
async fn live_search_narrows_view_and_selection() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let mut app = started(&store).await;

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "sched");
    assert_eq!(app.browser.view().len(), 1);
    assert_eq!(app.selected, Some(TestId::new("5")));

    press(&mut app, KeyCode::Esc);
    assert!(app.input.is_none());
    assert_eq!(app.browser.query().text, "sched");

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.browser.view().len(), 5);
}

#[tokio::test]
async fn delete_failure_keeps_row_then_success_removes_it() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let mut app = started(&store).await;
    let target = TestId::new("4");

    assert!(press(&mut app, KeyCode::Char('d')).is_none());
    assert_eq!(app.pending_delete, Some(target.clone()));

    store.set_failing(true);
    let command = press(&mut app, KeyCode::Char('y'));
    assert_eq!(command, Some(Command::Delete(target.clone())));
    run(&mut app, &store, command).await;

    assert_eq!(app.browser.tests().len(), 5);
    assert!(app.browser.find(&target).is_some());
    let (level, message) = last_notice(&app);
    assert_eq!(level, NotificationLevel::Error);
    assert!(message.starts_with("Failed to delete test"));

    store.set_failing(false);
    press(&mut app, KeyCode::Char('d'));
    let command = press(&mut app, KeyCode::Enter);
    run(&mut app, &store, command).await;

    assert_eq!(app.browser.tests().len(), 4);
    assert!(app.browser.find(&target).is_none());
    assert!(!store.contains(&target));
    assert_eq!(last_notice(&app), (NotificationLevel::Success, "Test deleted"));
    assert_eq!(app.selected, Some(TestId::new("2")));
}

#[tokio::test]
async fn delete_prompt_cancels_on_other_keys() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let mut app = started(&store).await;
    let calls = store.call_count();

    press(&mut app, KeyCode::Char('d'));
    assert!(press(&mut app, KeyCode::Char('j')).is_none());
    assert!(app.pending_delete.is_none());
    assert_eq!(store.call_count(), calls);
    assert_eq!(last_notice(&app), (NotificationLevel::Info, "Delete cancelled"));
}

#[tokio::test]
async fn create_flow_through_keys() {
    let store = MockStore::with_tests(fixtures::pair());
    let mut app = started(&store).await;
    let before = store.test_count();

    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.screen, Screen::Wizard);

    // Basics
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "Pipes");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char('l'));
    press(&mut app, KeyCode::Char(']'));
    {
        let wizard = app.wizard.as_ref().unwrap().session.wizard();
        assert_eq!(wizard.step(), WizardStep::Questions);
        assert_eq!(wizard.form().subject(), Subject::NestJs);
    }

    // Questions: prompt, two default choices, answer, responses
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "What does a pipe do?");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('l'));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "Right");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "Wrong");
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Char(']'));
    assert_eq!(
        app.wizard.as_ref().unwrap().session.wizard().step(),
        WizardStep::Review
    );

    let command = press(&mut app, KeyCode::Enter);
    assert!(matches!(command, Some(Command::Submit(_))));
    assert_eq!(
        app.wizard.as_ref().unwrap().session.phase(),
        &SessionPhase::Saving
    );
    // Discarding is refused while the save is in flight.
    assert!(press(&mut app, KeyCode::Esc).is_none());
    assert_eq!(app.screen, Screen::Wizard);

    run(&mut app, &store, command).await;

    assert_eq!(app.screen, Screen::Browse);
    assert_eq!(store.test_count(), before + 1);
    let created = app.selected_test().expect("created test selected");
    assert_eq!(created.name, "Pipes");
    assert_eq!(created.subject, Subject::NestJs);
    assert_eq!(created.test_questions[0].answer, "Choice A");
    assert!(app
        .notifications
        .iter()
        .any(|n| n.message == "Assessment test created"));
}

#[tokio::test]
async fn blocked_step_reports_and_stays() {
    let store = MockStore::new();
    let mut app = started(&store).await;

    press(&mut app, KeyCode::Char('n'));
    assert!(press(&mut app, KeyCode::Char(']')).is_none());

    let screen = app.wizard.as_ref().unwrap();
    assert_eq!(screen.session.wizard().step(), WizardStep::Basics);
    assert!(!screen.session.wizard().form().visible_errors().is_empty());
    assert_eq!(last_notice(&app).0, NotificationLevel::Warning);
}

#[tokio::test]
async fn edit_flow_updates_existing_test() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let mut app = started(&store).await;
    let id = TestId::new("4");

    let command = press(&mut app, KeyCode::Char('e'));
    assert_eq!(command, Some(Command::FetchTest(id.clone())));
    assert_eq!(
        app.wizard.as_ref().unwrap().session.phase(),
        &SessionPhase::Loading
    );
    run(&mut app, &store, command).await;
    assert!(app.wizard.as_ref().unwrap().session.is_editable());

    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Backspace);
    type_text(&mut app, "!");
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(
        app.wizard.as_ref().unwrap().session.wizard().step(),
        WizardStep::Review
    );
    let command = press(&mut app, KeyCode::Enter);
    run(&mut app, &store, command).await;

    assert_eq!(app.screen, Screen::Browse);
    assert_eq!(store.snapshot(&id).unwrap().name, "Operator!");
    assert_eq!(store.test_count(), 5);
    assert!(app
        .notifications
        .iter()
        .any(|n| n.message == "Assessment test updated"));
}

#[tokio::test]
async fn edit_of_vanished_test_returns_to_list() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let mut app = started(&store).await;
    let id = TestId::new("4");
    store.delete(&id).await.unwrap();

    let command = press(&mut app, KeyCode::Char('e'));
    run(&mut app, &store, command).await;

    assert_eq!(app.screen, Screen::Browse);
    assert!(app.wizard.is_none());
    assert!(app
        .notifications
        .iter()
        .any(|n| n.message == "Assessment test not found"));
    assert!(app.browser.find(&id).is_none());
}

#[tokio::test]
async fn save_failure_keeps_wizard_open() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let mut app = started(&store).await;

    let command = press(&mut app, KeyCode::Char('e'));
    run(&mut app, &store, command).await;
    press(&mut app, KeyCode::Char('3'));

    store.set_failing(true);
    let command = press(&mut app, KeyCode::Enter);
    run(&mut app, &store, command).await;

    assert_eq!(app.screen, Screen::Wizard);
    let screen = app.wizard.as_ref().unwrap();
    assert!(screen.session.is_editable());
    assert_eq!(screen.session.wizard().step(), WizardStep::Review);
    let (level, message) = last_notice(&app);
    assert_eq!(level, NotificationLevel::Error);
    assert!(message.starts_with("Failed to save assessment test"));
}

#[tokio::test]
async fn structural_floors_are_reported() {
    let store = MockStore::new();
    let mut app = started(&store).await;

    press(&mut app, KeyCode::Char('n'));
    {
        let screen = app.wizard.as_mut().unwrap();
        let wizard = screen.session.wizard_mut().unwrap();
        *wizard.form_mut() = fixtures::completed_form("Floors");
    }
    press(&mut app, KeyCode::Char(']'));
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(
        last_notice(&app),
        (NotificationLevel::Warning, "A test needs at least one question")
    );

    // Focus the first choice and try to drop below two.
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('-'));
    assert_eq!(
        last_notice(&app),
        (NotificationLevel::Warning, "A question needs at least two choices")
    );

    press(&mut app, KeyCode::Char('+'));
    let form = app.wizard.as_ref().unwrap().session.wizard().form();
    assert_eq!(form.question(0).unwrap().choice_count(), 3);
}

#[tokio::test]
async fn late_fetch_from_cancelled_edit_is_ignored() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let mut app = started(&store).await;
    let first = TestId::new("4");
    let second = TestId::new("2");

    let stale = press(&mut app, KeyCode::Char('e'));
    assert_eq!(stale, Some(Command::FetchTest(first.clone())));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.screen, Screen::Browse);

    press(&mut app, KeyCode::Down);
    let current = press(&mut app, KeyCode::Char('e'));
    assert_eq!(current, Some(Command::FetchTest(second.clone())));

    // The first fetch resolves after the second session opened.
    run(&mut app, &store, stale).await;
    {
        let session = &app.wizard.as_ref().unwrap().session;
        assert_eq!(session.phase(), &SessionPhase::Loading);
        assert_eq!(session.pending_load(), Some(&second));
    }

    run(&mut app, &store, current).await;
    let form = app.wizard.as_ref().unwrap().session.wizard().form();
    assert_eq!(form.name(), "Dependency injection");
}

#[tokio::test]
async fn level_stepper_saturates_at_max() {
    let store = MockStore::new();
    let mut app = started(&store).await;

    press(&mut app, KeyCode::Char('n'));
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Backspace);
    type_text(&mut app, &i64::MAX.to_string());
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Char('l'));
    let form = app.wizard.as_ref().unwrap().session.wizard().form();
    assert_eq!(form.level(), Some(i64::MAX));

    press(&mut app, KeyCode::Char('h'));
    let form = app.wizard.as_ref().unwrap().session.wizard().form();
    assert_eq!(form.level(), Some(i64::MAX - 1));
}

#[tokio::test]
async fn subject_filter_shows_counts() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let mut app = started(&store).await;
    press(&mut app, KeyCode::Char('f'));

    let groups = filter_groups(&app);
    let subject = groups.iter().find(|g| g.label == "Subject").unwrap();
    let labels: Vec<(&str, bool)> = subject
        .options
        .iter()
        .map(|o| (o.label.as_str(), o.active))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("All", false),
            ("Angular (2)", true),
            ("NestJS (1)", false),
            ("RxJS (2)", false),
        ]
    );
}

#[tokio::test]
async fn snapshot_older_than_delete_does_not_restore_row() {
    let store = MockStore::with_tests(fixtures::catalogue());
    let mut app = started(&store).await;
    let target = TestId::new("4");

    assert_eq!(press(&mut app, KeyCode::Char('r')), Some(Command::LoadTests));
    press(&mut app, KeyCode::Char('d'));
    let delete = press(&mut app, KeyCode::Char('y'));
    run(&mut app, &store, delete).await;
    assert!(app.browser.is_loading());

    // The list fetched before the delete landed still holds the row.
    app.apply_event(TuiEvent::TestsLoaded(Ok(fixtures::catalogue())));
    assert!(!app.browser.is_loading());
    assert_eq!(app.browser.tests().len(), 4);
    assert!(app.browser.find(&target).is_none());
    assert_ne!(app.selected, Some(target));
}
