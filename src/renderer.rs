//! # Widget Rendering
//!
//! Turns a [`WidgetReport`] into the widget's text layout, a terminal view
//! with a daylight bar, or JSON for other tools.
//!
//! ## Layout
//! ```text
//! Daytime: 16h 38m (+0m 03s)
//! Sunrise: 04:43   (+0m 01s)
//! Sunset:  21:21   (+0m 04s)
//!
//! 07h 49m - 16h 38m (100%)
//! 🌔 Waxing Gibbous ↑17:40 ↓01:50 (98%)
//!
//! Refreshed 12:00 Jun 21 in London, England
//! ```

use std::io::{self, Write};

use crate::format;
use crate::WidgetReport;

/// Width of the terminal daylight bar in cells.
const BAR_WIDTH: usize = 30;

/// First line when the location came from the cache.
const CACHED_WARNING: &str = "⚠ CACHED LOCATION";

/// Shown instead of a percentage when the yearly range is empty.
const NO_PROGRESS: &str = "n/a";

/// The widget's lines, blank lines included.
pub fn render_lines(report: &WidgetReport) -> Vec<String> {
    let today = &report.today;
    let deltas = &report.deltas;
    let progress = match report.progress {
        Some(p) => format::percent(p),
        None => NO_PROGRESS.to_string(),
    };

    let moon = [
        today.moon_emoji().to_string(),
        today.moon_phase_name().to_string(),
        format!("↑{}", format::optional_clock(today.moonrise.as_ref())),
        format!("↓{}", format::optional_clock(today.moonset.as_ref())),
        format!("({})", format::whole_percent(today.moon_phase.fraction)),
    ];

    vec![
        format!(
            "Daytime: {} ({})",
            format::day_length(today.day_length_ms),
            format::delta(deltas.day_length_ms)
        ),
        format!(
            "Sunrise: {}   ({})",
            format::clock(&today.sunrise),
            format::delta(deltas.sunrise_ms)
        ),
        format!(
            "Sunset:  {}   ({})",
            format::clock(&today.sunset),
            format::delta(deltas.sunset_ms)
        ),
        String::new(),
        format!(
            "{} - {} ({})",
            format::day_length(report.extrema.min_day_length_ms),
            format::day_length(report.extrema.max_day_length_ms),
            progress
        ),
        moon.join(" "),
        String::new(),
        format!(
            "Refreshed {} in {}",
            format::refreshed(&report.refreshed),
            report.label
        ),
    ]
}

/// Yearly daylight bar: shortest day on the left, longest on the right.
pub fn daylight_bar(progress: Option<f64>) -> String {
    let filled = progress
        .map(|p| (p.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize)
        .unwrap_or(0);
    let bar = "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled);
    format!("[{bar}]")
}

/// Render the widget as terminal text, e.g. to stdout.
pub fn draw_ascii<W: Write>(
    out: &mut W,
    report: &WidgetReport,
    cached_location: bool,
) -> io::Result<()> {
    if cached_location {
        writeln!(out, "{}\n", CACHED_WARNING)?;
    }
    for line in render_lines(report) {
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "\n{}", daylight_bar(report.progress))
}

/// Pretty JSON of the whole report.
pub fn render_json(report: &WidgetReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
