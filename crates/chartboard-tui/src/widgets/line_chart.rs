//! Line chart: x = timestamp, y = value, points in record order.

use super::{format_timestamp, format_value};
use crate::theme::Theme;
use chartboard_core::CanonicalRecord;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph, Widget},
};

/// `(x, y)` bounds covering `points`.
///
/// The y range always includes zero. A degenerate range (a single point, or
/// every point equal) is widened so the chart has something to span.
pub fn line_bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (0.0_f64, 0.0_f64);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !x_min.is_finite() {
        (x_min, x_max) = (0.0, 1.0);
    }
    if x_max <= x_min {
        x_min -= 60_000.0;
        x_max += 60_000.0;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    ([x_min, x_max], [y_min, y_max])
}

pub struct LineChartView<'a> {
    records: &'a [CanonicalRecord],
    timestamp_format: &'a str,
    theme: &'a Theme,
    block: Block<'a>,
}

impl<'a> LineChartView<'a> {
    pub fn new(
        records: &'a [CanonicalRecord],
        timestamp_format: &'a str,
        theme: &'a Theme,
        block: Block<'a>,
    ) -> Self {
        Self {
            records,
            timestamp_format,
            theme,
            block,
        }
    }
}

impl Widget for LineChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.records.is_empty() {
            Paragraph::new("no records")
                .style(self.theme.label)
                .centered()
                .block(self.block)
                .render(area, buf);
            return;
        }

        let points: Vec<(f64, f64)> = self
            .records
            .iter()
            .map(|r| (r.timestamp as f64, r.value))
            .collect();
        let (x_bounds, y_bounds) = line_bounds(&points);

        let x_labels = vec![
            format_timestamp(x_bounds[0] as i64, self.timestamp_format),
            format_timestamp(x_bounds[1] as i64, self.timestamp_format),
        ];
        let y_labels = vec![
            format_value(y_bounds[0]),
            format_value((y_bounds[0] + y_bounds[1]) / 2.0),
            format_value(y_bounds[1]),
        ];

        let dataset = Dataset::default()
            .name("value")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(self.theme.line)
            .data(&points);

        Chart::new(vec![dataset])
            .block(self.block)
            .x_axis(
                Axis::default()
                    .style(self.theme.axis)
                    .bounds(x_bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(self.theme.axis)
                    .bounds(y_bounds)
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}
