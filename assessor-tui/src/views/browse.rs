//! Browse list view.

use crate::state::{App, InputTarget};
use crate::theme::{level_color, subject_color};
use crate::widgets::{DetailPanel, FilterBar, FilterGroup, FilterOption, StatusIndicator};
use assessor_core::{AssessmentTest, SortKey, SubjectFacet};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    render_filters(f, app, rows[0]);

    let summary = Paragraph::new(app.browser.summary().to_string())
        .style(Style::default().fg(app.theme.text_dim));
    f.render_widget(summary, rows[1]);

    if app.browser.is_loading() && app.browser.tests().is_empty() {
        StatusIndicator::loading("Tests", &app.theme).render(f, rows[2]);
    } else if app.browser.shows_empty_state() {
        render_empty_state(f, app, rows[2]);
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[2]);
        render_list(f, app, columns[0]);
        render_detail(f, app, columns[1]);
    }

    if let Some(id) = &app.pending_delete {
        let name = app
            .browser
            .find(id)
            .map(|t| t.name.as_str())
            .unwrap_or("this test");
        render_confirm(f, app, area, &format!("Delete \"{}\"? (y to confirm)", name));
    }
}

pub fn filter_groups(app: &App) -> Vec<FilterGroup> {
    let query = app.browser.query();
    let mut subjects = vec![FilterOption::new("All", query.subject == SubjectFacet::All)];
    subjects.extend(app.browser.subject_counts().iter().map(|(s, count)| {
        FilterOption::new(
            format!("{} ({})", s.label(), count),
            query.subject == SubjectFacet::Only(*s),
        )
    }));

    let sorts = [SortKey::Updated, SortKey::Name, SortKey::Level]
        .iter()
        .map(|k| FilterOption::new(k.label(), query.sort == *k))
        .collect();

    let search = match &app.input {
        Some(input) if input.target == InputTarget::Search => format!("{}▏", input.buffer),
        _ => query.text.clone(),
    };
    let ceiling = match &app.input {
        Some(input) if input.target == InputTarget::LevelCeiling => format!("{}▏", input.buffer),
        _ => query
            .level_ceiling
            .map(|c| c.to_string())
            .unwrap_or_else(|| "any".to_string()),
    };

    vec![
        FilterGroup {
            label: "Search",
            options: vec![FilterOption::new(search, !query.text.is_empty())],
        },
        FilterGroup {
            label: "Subject",
            options: subjects,
        },
        FilterGroup {
            label: "Max level",
            options: vec![FilterOption::new(ceiling, query.level_ceiling.is_some())],
        },
        FilterGroup {
            label: "Sort",
            options: sorts,
        },
    ]
}

fn render_filters(f: &mut Frame<'_>, app: &App, area: Rect) {
    let groups = filter_groups(app);
    let bar = FilterBar {
        title: "Filters",
        groups: &groups,
        label_style: Style::default().fg(app.theme.text_dim),
        active_style: Style::default()
            .fg(app.theme.bg)
            .bg(app.theme.primary)
            .add_modifier(Modifier::BOLD),
        inactive_style: Style::default().fg(app.theme.text),
    };
    bar.render(f, area);
}

fn list_item<'a>(test: &AssessmentTest, app: &App) -> ListItem<'a> {
    let line = Line::from(vec![
        Span::styled(test.name.clone(), Style::default().fg(app.theme.text)),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", test.subject),
            Style::default().fg(subject_color(test.subject, &app.theme)),
        ),
        Span::raw(" "),
        Span::styled(
            format!("L{}", test.level),
            Style::default().fg(level_color(test.level, &app.theme)),
        ),
        Span::styled(
            format!(" · {} questions", test.question_count()),
            Style::default().fg(app.theme.text_dim),
        ),
    ]);
    ListItem::new(line)
}

fn render_list(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = app.browser.view();
    let items: Vec<ListItem> = view.iter().map(|t| list_item(t, app)).collect();

    let mut state = ListState::default();
    state.select(app.selected_index());

    let title = if app.browser.is_loading() {
        "Tests (refreshing…)"
    } else {
        "Tests"
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(true)),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .bg(app.theme.bg_highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    f.render_stateful_widget(list, area, &mut state);
}

fn render_detail(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(test) = app.selected_test() else {
        let hint = Paragraph::new("Select a test to see its details.")
            .style(Style::default().fg(app.theme.text_muted))
            .block(Block::default().title("Details").borders(Borders::ALL));
        f.render_widget(hint, area);
        return;
    };

    let sample = test
        .sample_question()
        .unwrap_or("No questions defined yet.")
        .to_string();
    let detail = DetailPanel {
        title: "Details",
        fields: vec![
            ("ID", test.id.to_string()),
            ("Name", test.name.clone()),
            ("Subject", test.subject.label().to_string()),
            ("Level", test.level.to_string()),
            ("Questions", test.question_count().to_string()),
            (
                "Updated",
                test.last_updated.format("%Y-%m-%d %H:%M UTC").to_string(),
            ),
        ],
        body: Some(("Sample question", sample)),
        style: Style::default().fg(app.theme.secondary),
        border_style: app.theme.border_style(false),
    };
    detail.render(f, area);
}

fn render_empty_state(f: &mut Frame<'_>, app: &App, area: Rect) {
    let message = if app.browser.query().has_filters() {
        "No tests match the current filters. Press c to clear them."
    } else {
        "No assessment tests yet. Press n to create one."
    };
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.text_dim))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_confirm(f: &mut Frame<'_>, app: &App, area: Rect, message: &str) {
    let width = area.width.min(60);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height.saturating_sub(3) / 2,
        width,
        height: area.height.min(3),
    };
    f.render_widget(Clear, popup);
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(app.theme.warning))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Confirm")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.error)),
        );
    f.render_widget(paragraph, popup);
}
