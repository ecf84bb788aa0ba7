//! Filter bar widget.
//!
//! One line of labelled option groups, e.g. `Subject: All Angular NestJS RxJS`,
//! with the active option of each group highlighted.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct FilterOption {
    pub label: String,
    pub active: bool,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, active: bool) -> Self {
        Self {
            label: label.into(),
            active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterGroup {
    pub label: &'static str,
    pub options: Vec<FilterOption>,
}

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub groups: &'a [FilterGroup],
    pub label_style: Style,
    pub active_style: Style,
    pub inactive_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn line(&self) -> Line<'a> {
        let mut spans = Vec::new();
        for (index, group) in self.groups.iter().enumerate() {
            if index > 0 {
                spans.push(Span::styled(" │ ", self.inactive_style));
            }
            spans.push(Span::styled(format!("{}:", group.label), self.label_style));
            for option in &group.options {
                let style = if option.active {
                    self.active_style
                } else {
                    self.inactive_style
                };
                spans.push(Span::styled(format!(" {} ", option.label), style));
            }
        }
        Line::from(spans)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.line())
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_separates_groups() {
        let groups = vec![
            FilterGroup {
                label: "Subject",
                options: vec![FilterOption::new("All", true), FilterOption::new("RxJS", false)],
            },
            FilterGroup {
                label: "Sort",
                options: vec![FilterOption::new("Name", true)],
            },
        ];
        let bar = FilterBar {
            title: "Filters",
            groups: &groups,
            label_style: Style::default(),
            active_style: Style::default(),
            inactive_style: Style::default(),
        };
        let text: String = bar.line().spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Subject: All  RxJS  │ Sort: Name ");
    }
}
