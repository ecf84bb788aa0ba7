//! Authoring wizard view: step tabs, the active step's fields and inline
//! errors for touched fields.

use crate::nav::WizardField;
use crate::state::{App, InputTarget, WizardScreen};
use crate::widgets::StatusIndicator;
use assessor_core::{EditableTest, FieldError, FieldPath, SessionMode, WizardStep};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(screen) = &app.wizard else {
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_steps(f, app, screen, rows[0]);

    if let Some(status) = StatusIndicator::for_phase(screen.session.phase(), &app.theme) {
        status.render(f, rows[1]);
        return;
    }

    let form = screen.session.wizard().form();
    let errors = form.visible_errors();
    let (lines, focus_line) = match screen.session.wizard().step() {
        WizardStep::Basics | WizardStep::Questions => field_lines(app, screen, &errors),
        WizardStep::Review => (review_lines(app, form), 0),
    };

    // Keep the focused line inside the panel.
    let visible = rows[1].height.saturating_sub(2) as usize;
    let scroll = focus_line.saturating_sub(visible.saturating_sub(3));
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0))
        .block(
            Block::default()
                .title(screen.session.wizard().step().title())
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(true)),
        );
    f.render_widget(body, rows[1]);
}

fn render_steps(f: &mut Frame<'_>, app: &App, screen: &WizardScreen, area: Rect) {
    let titles: Vec<Line> = WizardStep::ALL
        .iter()
        .map(|step| Line::from(format!("{} {}", step.index() + 1, step.title())))
        .collect();
    let heading = match screen.session.mode() {
        SessionMode::Create => "New assessment test".to_string(),
        SessionMode::Edit(id) => format!("Edit assessment test {}", id),
    };
    let tabs = Tabs::new(titles)
        .select(screen.session.wizard().step().index())
        .block(Block::default().title(heading).borders(Borders::ALL))
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" › ");
    f.render_widget(tabs, area);
}

fn error_for<'e>(errors: &'e [FieldError], path: &FieldPath) -> Option<&'e FieldError> {
    errors.iter().find(|e| e.path == *path)
}

fn error_line(app: &App, error: &FieldError) -> Line<'static> {
    Line::from(Span::styled(
        format!("    ✗ {}", error.error),
        Style::default().fg(app.theme.error),
    ))
}

/// Value shown for a field: the edit buffer when it is being typed into.
fn display_value(app: &App, field: WizardField, form: &EditableTest) -> String {
    if let Some(input) = &app.input {
        if input.target == InputTarget::Field(field) {
            return format!("{}▏", input.buffer);
        }
    }
    match field {
        WizardField::Subject => format!("‹ {} ›", form.subject().label()),
        WizardField::Answer { question } => {
            let answer = form.question(question).map(|q| q.answer()).unwrap_or("");
            if answer.is_empty() {
                "‹ pick a choice ›".to_string()
            } else {
                format!("‹ {} ›", answer)
            }
        }
        other => other.current_text(form),
    }
}

/// Lines for the Basics or Questions step, plus the index of the focused line.
fn field_lines(
    app: &App,
    screen: &WizardScreen,
    errors: &[FieldError],
) -> (Vec<Line<'static>>, usize) {
    let form = screen.session.wizard().form();
    let focused = screen.focused();
    let mut lines = Vec::new();
    let mut focus_line = 0;
    let mut current_question = None;

    for field in screen.fields() {
        if let Some(question) = field.question_index() {
            if current_question != Some(question) {
                current_question = Some(question);
                if question > 0 {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    format!("Question {} of {}", question + 1, form.question_count()),
                    Style::default()
                        .fg(app.theme.secondary)
                        .add_modifier(Modifier::BOLD),
                )));
                if let Some(error) = error_for(errors, &FieldPath::Choices { question }) {
                    lines.push(error_line(app, error));
                }
            }
        }

        let is_focused = focused == Some(field);
        if is_focused {
            focus_line = lines.len();
        }
        let error = error_for(errors, &field.path());
        let marker = if is_focused { "▸ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}{}: ", marker, field.label()),
                app.theme.field_style(is_focused, error.is_some()),
            ),
            Span::styled(
                display_value(app, field, form),
                Style::default().fg(app.theme.text),
            ),
        ]));
        if let Some(error) = error {
            lines.push(error_line(app, error));
        }
    }

    if let Some(error) = error_for(errors, &FieldPath::Questions) {
        lines.push(error_line(app, error));
    }
    (lines, focus_line)
}

fn review_lines(app: &App, form: &EditableTest) -> Vec<Line<'static>> {
    let label = Style::default().fg(app.theme.secondary);
    let level = form
        .level()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let mut lines = vec![
        Line::from(vec![Span::styled("Name: ", label), Span::raw(form.name().to_string())]),
        Line::from(vec![
            Span::styled("Subject: ", label),
            Span::raw(form.subject().label().to_string()),
        ]),
        Line::from(vec![Span::styled("Level: ", label), Span::raw(level)]),
        Line::from(vec![
            Span::styled("Questions: ", label),
            Span::raw(form.question_count().to_string()),
        ]),
    ];

    for (index, question) in form.questions().iter().enumerate() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{}. {}", index + 1, question.prompt()),
            Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
        )));
        let answer = question.answer_index();
        for choice in 0..question.choice_count() {
            let value = question.choice(choice).unwrap_or("");
            let (mark, color) = if answer == Some(choice) {
                ("✓", app.theme.success)
            } else {
                ("·", app.theme.text_dim)
            };
            lines.push(Line::from(Span::styled(
                format!("   {} {}", mark, value),
                Style::default().fg(color),
            )));
        }
    }

    let errors = form.errors();
    lines.push(Line::from(""));
    if errors.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ready to save. Press Enter or Ctrl-s.",
            Style::default().fg(app.theme.success),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("{} issue(s) must be fixed before saving:", errors.len()),
            Style::default().fg(app.theme.warning),
        )));
        for error in errors {
            lines.push(Line::from(Span::styled(
                format!("  {}: {}", error.path.label(), error.error),
                Style::default().fg(app.theme.error),
            )));
        }
    }
    lines
}
