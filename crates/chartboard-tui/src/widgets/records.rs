//! Records pane: the canonical records as a scrollable table.
//!
//! # Navigation
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Previous record |
//! | `↓` / `j` | Next record |
//! | `PageUp` / `Ctrl+u` | Up one page |
//! | `PageDown` / `Ctrl+d` | Down one page |

use super::{format_timestamp, format_value};
use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use chartboard_core::CanonicalRecord;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Cell, Row, StatefulWidget, Table, TableState, Widget},
};

const PAGE_STEP: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecordsState {
    /// Index of the highlighted record.
    pub cursor: usize,
}

impl RecordsState {
    /// Move the cursor; `total` is the number of records currently shown.
    pub fn handle(&mut self, event: &AppEvent, total: usize) {
        if total == 0 {
            self.cursor = 0;
            return;
        }
        let last = total - 1;

        self.cursor = match event {
            AppEvent::Nav(Direction::Up) => self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => (self.cursor + 1).min(last),
            AppEvent::ScrollUp => self.cursor.saturating_sub(PAGE_STEP),
            AppEvent::ScrollDown => (self.cursor + PAGE_STEP).min(last),
            _ => return,
        };
        tracing::trace!(cursor = self.cursor, "records: cursor moved");
    }

    /// Keep the cursor inside a dataset that just changed size.
    pub fn clamp(&mut self, total: usize) {
        self.cursor = self.cursor.min(total.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct RecordsPane<'a> {
    records: &'a [CanonicalRecord],
    state: &'a RecordsState,
    timestamp_format: &'a str,
    theme: &'a Theme,
}

impl<'a> RecordsPane<'a> {
    pub fn new(
        records: &'a [CanonicalRecord],
        state: &'a RecordsState,
        timestamp_format: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            records,
            state,
            timestamp_format,
            theme,
        }
    }
}

impl Widget for RecordsPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!(" Records ({}) ", self.records.len()))
            .border_style(self.theme.border_unfocused);

        let rows = self.records.iter().enumerate().map(|(i, r)| {
            Row::new(vec![
                Cell::from(Line::from(r.category.as_str()))
                    .style(Style::default().fg(self.theme.series_color(i))),
                Cell::from(Line::from(format_value(r.value)).right_aligned()),
                Cell::from(format_timestamp(r.timestamp, self.timestamp_format)),
            ])
        });

        let header = Row::new(vec!["category", "value", "time"])
            .style(self.theme.label.add_modifier(Modifier::BOLD));

        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(10),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut table_state = TableState::default().with_selected(
            (!self.records.is_empty()).then_some(self.state.cursor),
        );
        StatefulWidget::render(table, area, buf, &mut table_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
