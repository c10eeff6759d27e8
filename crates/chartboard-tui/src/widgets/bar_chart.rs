//! Bar chart: one bar per record, coloured by index from the theme palette.
//!
//! Terminal bars are integer heights, so values are scaled into
//! `0..=BAR_SCALE` against the largest value; the bar's text shows the real
//! value. Negative values draw as empty bars.

use super::format_value;
use crate::theme::Theme;
use chartboard_core::CanonicalRecord;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Paragraph, Widget},
};

const BAR_SCALE: f64 = 1000.0;
const BAR_GAP: u16 = 1;
const MAX_BAR_WIDTH: u16 = 12;

/// Scaled integer heights for `values`.
pub fn bar_heights(values: &[f64]) -> Vec<u64> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    values
        .iter()
        .map(|&v| {
            if max <= 0.0 || v <= 0.0 {
                0
            } else {
                (v / max * BAR_SCALE).round() as u64
            }
        })
        .collect()
}

fn bar_width(inner_width: u16, count: usize) -> u16 {
    let count = u16::try_from(count.max(1)).unwrap_or(u16::MAX);
    let gaps = BAR_GAP.saturating_mul(count.saturating_sub(1));
    (inner_width.saturating_sub(gaps) / count).clamp(1, MAX_BAR_WIDTH)
}

pub struct BarChartView<'a> {
    records: &'a [CanonicalRecord],
    theme: &'a Theme,
    block: Block<'a>,
}

impl<'a> BarChartView<'a> {
    pub fn new(records: &'a [CanonicalRecord], theme: &'a Theme, block: Block<'a>) -> Self {
        Self {
            records,
            theme,
            block,
        }
    }
}

impl Widget for BarChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.records.is_empty() {
            Paragraph::new("no records")
                .style(self.theme.label)
                .centered()
                .block(self.block)
                .render(area, buf);
            return;
        }

        let inner_width = self.block.inner(area).width;
        let values: Vec<f64> = self.records.iter().map(|r| r.value).collect();
        let heights = bar_heights(&values);

        let bars: Vec<Bar> = self
            .records
            .iter()
            .zip(heights)
            .enumerate()
            .map(|(i, (record, height))| {
                let colour = self.theme.series_color(i);
                Bar::default()
                    .value(height)
                    .label(Line::from(record.category.clone()))
                    .text_value(format_value(record.value))
                    .style(Style::default().fg(colour))
                    .value_style(Style::default().fg(colour).add_modifier(Modifier::REVERSED))
            })
            .collect();

        BarChart::default()
            .block(self.block)
            .bar_width(bar_width(inner_width, self.records.len()))
            .bar_gap(BAR_GAP)
            .label_style(self.theme.label)
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }
}
