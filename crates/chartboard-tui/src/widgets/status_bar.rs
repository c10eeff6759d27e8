//! Bottom status line: data source, inferred fields, last message.

use crate::theme::Theme;
use chartboard_core::FieldInference;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

pub struct StatusBar<'a> {
    source: &'a str,
    fields: &'a FieldInference,
    message: Option<&'a str>,
    watching: bool,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        source: &'a str,
        fields: &'a FieldInference,
        message: Option<&'a str>,
        watching: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            source,
            fields,
            message,
            watching,
            theme,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let watch = if self.watching { " (watching)" } else { "" };
        let mut spans = vec![
            Span::styled(format!(" {}{} ", self.source, watch), self.theme.status_source),
            Span::styled(format!(" {} ", self.fields), self.theme.status_fields),
        ];
        if let Some(msg) = self.message {
            spans.push(Span::styled(format!(" {msg}"), self.theme.status_message));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
