//! Chart selector strip at the top of the screen.

use crate::theme::Theme;
use chartboard_core::ChartKind;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Tabs, Widget},
};

/// One tab per [`ChartKind`], numbered by the key that selects it.
/// Keybinding hints are right-aligned in the same row.
pub struct TabBar<'a> {
    active: ChartKind,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(active: ChartKind, theme: &'a Theme) -> Self {
        Self { active, theme }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels: Vec<Line> = ChartKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| Line::from(format!(" {}:{} ", i + 1, kind)))
            .collect();
        let selected = ChartKind::ALL
            .iter()
            .position(|k| *k == self.active)
            .unwrap_or(0);

        Tabs::new(labels)
            .select(selected)
            .highlight_style(self.theme.border_focused.add_modifier(Modifier::REVERSED))
            .divider("")
            .render(area, buf);

        let hint = " :cmd  ?:help  q:quit ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
