//! SynthBrute theme and color utilities.

use assessor_core::Subject;
use crate::notifications::NotificationLevel;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct SynthBruteTheme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub secondary_dim: Color,
    pub tertiary: Color,
    pub tertiary_dim: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl SynthBruteTheme {
    pub fn synthbrute() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_secondary: Color::Rgb(26, 26, 26),
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            primary_dim: Color::Rgb(0, 136, 136),
            secondary: Color::Rgb(255, 0, 255),
            secondary_dim: Color::Rgb(136, 0, 136),
            tertiary: Color::Rgb(255, 255, 0),
            tertiary_dim: Color::Rgb(136, 136, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            text_muted: Color::Rgb(68, 68, 68),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }

    /// Border style for a panel, brighter when it has focus.
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focus)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Style of a form field label.
    pub fn field_style(&self, focused: bool, invalid: bool) -> Style {
        let color = if invalid {
            self.error
        } else if focused {
            self.primary
        } else {
            self.text
        };
        let style = Style::default().fg(color);
        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

pub fn subject_color(subject: Subject, theme: &SynthBruteTheme) -> Color {
    match subject {
        Subject::Angular => theme.error,
        Subject::NestJs => theme.secondary,
        Subject::RxJs => theme.tertiary,
    }
}

/// Levels 1-2 read as easy, 3-4 as moderate, 5+ as hard.
pub fn level_color(level: i64, theme: &SynthBruteTheme) -> Color {
    if level <= 2 {
        theme.success
    } else if level <= 4 {
        theme.warning
    } else {
        theme.error
    }
}

pub fn notification_color(level: NotificationLevel, theme: &SynthBruteTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}
