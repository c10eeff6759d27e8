//! Pie chart drawn on a braille canvas, with a percentage legend.
//!
//! Sectors start at twelve o'clock and run clockwise in record order. Only
//! positive values get a sector; the rest are listed in the legend with a
//! dash instead of a share.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::format_value;
use crate::theme::Theme;
use chartboard_core::CanonicalRecord;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Paragraph, Widget,
    },
};

const RADIUS: f64 = 1.0;
const MARGIN: f64 = 1.1;
const LEGEND_WIDTH: u16 = 28;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    /// Index of the record this slice draws.
    pub index: usize,
    /// Start and end angle in radians, clockwise from twelve o'clock.
    pub start: f64,
    pub end: f64,
    /// Fraction of the positive total, `0.0..=1.0`.
    pub share: f64,
}

/// Sectors for the positive entries of `values`.
pub fn pie_slices(values: &[f64]) -> Vec<Slice> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    let mut start = 0.0;
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0.0)
        .map(|(index, &v)| {
            let share = v / total;
            let end = start + share * TAU;
            let slice = Slice {
                index,
                start,
                end,
                share,
            };
            start = end;
            slice
        })
        .collect()
}

/// Canvas bounds that keep the pie round in a `width` x `height` cell area.
/// Terminal cells are roughly twice as tall as they are wide.
pub fn pie_bounds(width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
    let ratio = f64::from(width.max(1)) / (2.0 * f64::from(height.max(1)));
    if ratio >= 1.0 {
        ([-MARGIN * ratio, MARGIN * ratio], [-MARGIN, MARGIN])
    } else {
        ([-MARGIN, MARGIN], [-MARGIN / ratio, MARGIN / ratio])
    }
}

/// Sample the disc on a grid of spacing `step` and bucket each point into
/// its slice.
fn slice_points(slices: &[Slice], step: f64) -> Vec<Vec<(f64, f64)>> {
    let mut points = vec![Vec::new(); slices.len()];
    if slices.is_empty() || step <= 0.0 {
        return points;
    }

    let steps = (2.0 * RADIUS / step).ceil() as i64;
    for iy in 0..=steps {
        let y = -RADIUS + iy as f64 * step;
        for ix in 0..=steps {
            let x = -RADIUS + ix as f64 * step;
            if x * x + y * y > RADIUS * RADIUS {
                continue;
            }
            let angle = (FRAC_PI_2 - y.atan2(x)).rem_euclid(TAU);
            let slot = slices
                .iter()
                .position(|s| angle >= s.start && angle < s.end)
                .unwrap_or(slices.len() - 1);
            points[slot].push((x, y));
        }
    }
    points
}

pub struct PieChartView<'a> {
    records: &'a [CanonicalRecord],
    theme: &'a Theme,
    block: Block<'a>,
}

impl<'a> PieChartView<'a> {
    pub fn new(records: &'a [CanonicalRecord], theme: &'a Theme, block: Block<'a>) -> Self {
        Self {
            records,
            theme,
            block,
        }
    }

    fn legend(&self, slices: &[Slice]) -> Vec<Line<'static>> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let share = slices
                    .iter()
                    .find(|s| s.index == i)
                    .map(|s| format!("{:>5.1}%", s.share * 100.0))
                    .unwrap_or_else(|| "    -".to_string());
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(self.theme.series_color(i))),
                    Span::styled(format!("{share} "), self.theme.label),
                    Span::raw(format!("{} ({})", record.category, format_value(record.value))),
                ])
            })
            .collect()
    }
}

impl Widget for PieChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.inner(area);
        let values: Vec<f64> = self.records.iter().map(|r| r.value).collect();
        let slices = pie_slices(&values);
        let legend = self.legend(&slices);
        let theme = self.theme;
        self.block.render(area, buf);

        if slices.is_empty() {
            let text = if self.records.is_empty() {
                "no records"
            } else {
                "no positive values to draw"
            };
            Paragraph::new(text).style(theme.label).centered().render(inner, buf);
            return;
        }

        let [pie_area, legend_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(LEGEND_WIDTH)])
                .areas(inner);

        let (x_bounds, y_bounds) = pie_bounds(pie_area.width, pie_area.height);
        // Braille gives four dot rows per cell.
        let dot_rows = f64::from(pie_area.height.max(1)) * 4.0;
        let step = (y_bounds[1] - y_bounds[0]) / dot_rows;
        let points = slice_points(&slices, step);
        let colours: Vec<Color> = slices.iter().map(|s| theme.series_color(s.index)).collect();

        Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for (coords, colour) in points.iter().zip(&colours) {
                    ctx.draw(&Points {
                        coords,
                        color: *colour,
                    });
                }
            })
            .render(pie_area, buf);

        Paragraph::new(legend).render(legend_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_cover_the_circle() {
        let slices = pie_slices(&[1.0, 1.0, 2.0]);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].start, 0.0);
        assert!((slices[2].end - TAU).abs() < 1e-9);
        assert!((slices[2].share - 0.5).abs() < 1e-12);
    }

    #[test]
    fn non_positive_values_get_no_slice() {
        let slices = pie_slices(&[3.0, 0.0, -2.0, 1.0]);
        let indices: Vec<usize> = slices.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 3]);
        assert!((slices[0].share - 0.75).abs() < 1e-12);
    }

    #[test]
    fn nothing_positive_means_no_slices() {
        assert!(pie_slices(&[0.0, -1.0]).is_empty());
        assert!(pie_slices(&[]).is_empty());
    }

    #[test]
    fn bounds_keep_the_disc_round() {
        let (x, y) = pie_bounds(80, 20);
        assert_eq!(y, [-MARGIN, MARGIN]);
        assert!((x[1] - 2.0 * MARGIN).abs() < 1e-12);

        let (x, y) = pie_bounds(20, 20);
        assert_eq!(x, [-MARGIN, MARGIN]);
        assert!((y[1] - 2.0 * MARGIN).abs() < 1e-12);
    }

    #[test]
    fn first_slice_starts_at_twelve_o_clock() {
        let slices = pie_slices(&[1.0, 3.0]);
        let points = slice_points(&slices, 0.05);
        // A quarter turn clockwise from the top lands in the right half.
        assert!(points[0].iter().all(|&(x, _)| x >= -1e-9));
        assert!(points[1].len() > points[0].len());
    }
}
