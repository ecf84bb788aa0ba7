//! Detail panel widget: field/value pairs with an optional free-text body.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'a str, String)>,
    /// Text shown under the fields after a blank line.
    pub body: Option<(&'a str, String)>,
    pub style: Style,
    pub border_style: Style,
}

impl<'a> DetailPanel<'a> {
    pub fn text(&self) -> Text<'static> {
        let mut lines: Vec<Line> = self
            .fields
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", label), self.style),
                    Span::raw(value.clone()),
                ])
            })
            .collect();

        if let Some((heading, body)) = &self.body {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(heading.to_string(), self.style)));
            lines.extend(body.lines().map(|l| Line::from(l.to_string())));
        }
        Text::from(lines)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let widget = Paragraph::new(self.text())
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
