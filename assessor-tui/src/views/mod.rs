//! View rendering dispatch.

pub mod browse;
pub mod wizard;

use crate::nav::Screen;
use crate::state::App;
use crate::theme::notification_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.screen {
        Screen::Browse => browse::render(f, app, layout[1]),
        Screen::Wizard => wizard::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!(
        "ASSESSOR | {} | {}",
        app.screen.title(),
        app.config.api_base_url
    );
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default().fg(app.theme.primary),
    ));
    f.render_widget(block, area);
}

/// Key help for the current screen and input mode.
pub fn help_text(app: &App) -> &'static str {
    if app.input.is_some() {
        return "type to edit • Enter apply • Tab next field • Esc cancel";
    }
    if app.pending_delete.is_some() {
        return "y/Enter confirm delete • any other key cancels";
    }
    match app.screen {
        Screen::Browse => {
            "j/k move • n new • e edit • d delete • / search • f subject • s sort • m max level • c clear • r refresh • q quit"
        }
        Screen::Wizard => {
            "Tab/j/k field • Enter edit • h/l pick • [ ] step • a/x question • +/- choice • Ctrl-s save • Esc discard"
        }
    }
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = if let Some(note) = app.notifications.last() {
        (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        )
    } else {
        (
            help_text(app).to_string(),
            Style::default().fg(app.theme.text_dim),
        )
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}
