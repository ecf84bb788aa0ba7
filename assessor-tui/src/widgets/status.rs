//! Status indicator widget for loading and saving states.

use crate::theme::SynthBruteTheme;
use assessor_core::SessionPhase;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct StatusIndicator {
    pub title: String,
    pub status: String,
    pub style: Style,
}

impl StatusIndicator {
    pub fn loading(what: &str, theme: &SynthBruteTheme) -> Self {
        Self {
            title: what.to_string(),
            status: format!("Loading {}…", what.to_lowercase()),
            style: Style::default()
                .fg(theme.info)
                .add_modifier(Modifier::ITALIC),
        }
    }

    /// Indicator for a session phase that blocks editing.
    pub fn for_phase(phase: &SessionPhase, theme: &SynthBruteTheme) -> Option<Self> {
        let (title, status, color) = match phase {
            SessionPhase::Loading => (
                "Loading",
                "Loading assessment test… (r retry, Esc back)",
                theme.info,
            ),
            SessionPhase::Saving => ("Saving", "Saving assessment test…", theme.warning),
            SessionPhase::Editing | SessionPhase::Closed(_) => return None,
        };
        Some(Self {
            title: title.to_string(),
            status: status.to_string(),
            style: Style::default().fg(color).add_modifier(Modifier::BOLD),
        })
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.status.clone())
            .style(self.style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL),
            );
        f.render_widget(paragraph, area);
    }
}
