//! Ratatui widgets for the chartboard dashboard.

pub mod bar_chart;
pub mod command_bar;
pub mod help;
pub mod line_chart;
pub mod notification;
pub mod pie_chart;
pub mod records;
pub mod status_bar;
pub mod tab_bar;

use std::fmt::Write;

use chrono::{Local, TimeZone};
use ratatui::layout::Rect;

/// Value as shown in labels: integral values without a fractional part,
/// everything else to at most two decimals.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{value:.2}");
    match text.trim_end_matches('0').trim_end_matches('.') {
        "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Used when the configured timestamp format is not valid strftime.
pub const FALLBACK_TIMESTAMP_FORMAT: &str = "%H:%M";

/// Epoch milliseconds rendered in local time with a chrono format string.
pub fn format_timestamp(millis: i64, format: &str) -> String {
    let Some(ts) = Local.timestamp_millis_opt(millis).single() else {
        return millis.to_string();
    };
    let mut out = String::new();
    if write!(out, "{}", ts.format(format)).is_ok() {
        return out;
    }
    tracing::trace!(%format, fallback = FALLBACK_TIMESTAMP_FORMAT, "invalid timestamp format");
    ts.format(FALLBACK_TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_values_have_no_fraction() {
        assert_eq!(format_value(2025.0), "2025");
        assert_eq!(format_value(-3.0), "-3");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn fractional_values_are_trimmed() {
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(1.234), "1.23");
        assert_eq!(format_value(0.999), "1");
    }

    #[test]
    fn tiny_negatives_do_not_render_as_negative_zero() {
        assert_eq!(format_value(-0.001), "0");
        assert_eq!(format_value(-0.004), "0");
        assert_eq!(format_value(-0.25), "-0.25");
    }

    #[test]
    fn invalid_timestamp_format_falls_back() {
        let millis = 1_700_000_000_000;
        let expected = format_timestamp(millis, FALLBACK_TIMESTAMP_FORMAT);
        assert_eq!(format_timestamp(millis, "%H:%Q"), expected);
        assert_eq!(expected.len(), 5);
    }

    #[test]
    fn valid_timestamp_format_is_used() {
        let millis = 1_700_000_000_000;
        assert_eq!(format_timestamp(millis, "%Y").len(), 4);
    }

    #[test]
    fn centered_rect_is_clamped_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(80, 20, area), Rect::new(0, 0, 40, 10));
    }
}
