//! Blocking notification popup.
//!
//! While a notification is shown every key except `Enter`, `Escape` and quit
//! is swallowed.

use super::centered_rect;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

pub struct NotificationPopup<'a> {
    notification: &'a Notification,
    theme: &'a Theme,
}

impl<'a> NotificationPopup<'a> {
    pub fn new(notification: &'a Notification, theme: &'a Theme) -> Self {
        Self { notification, theme }
    }
}

impl Widget for NotificationPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.saturating_sub(4).clamp(20, 70);
        let text_width = width.saturating_sub(2).max(1) as usize;
        let wrapped_rows = self.notification.message.chars().count().div_ceil(text_width);
        let height = (wrapped_rows as u16).saturating_add(4).min(area.height);

        let popup = centered_rect(width, height, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(format!(" {} ", self.notification.title))
            .title_bottom(" Enter / Esc to dismiss ")
            .border_style(self.theme.notification_border);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::from(Span::styled(
                self.notification.message.as_str(),
                self.theme.notification_text,
            )),
            Line::default(),
            Line::from(Span::styled(
                "the previous data is still shown",
                self.theme.notification_text.add_modifier(Modifier::DIM),
            )),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
