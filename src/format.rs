//! # Display Formatting
//!
//! String forms used by the widget: clock times, durations, deltas and
//! percentages. Durations are truncated to the displayed unit.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

const MINUTE_MS: i64 = 60_000;

/// Placeholder for a moon event that doesn't happen today.
pub const MISSING_TIME: &str = "--:--";

/// `HH:MM` in the instant's own zone.
pub fn clock<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    instant.format("%H:%M").to_string()
}

/// [`clock`], or `--:--` when absent.
pub fn optional_clock<Tz: TimeZone>(instant: Option<&DateTime<Tz>>) -> String
where
    Tz::Offset: Display,
{
    instant.map_or_else(|| MISSING_TIME.to_string(), clock)
}

/// Day length as `"HHh MMm"`. Hours are not wrapped, so a polar day is
/// `24h 00m`.
pub fn day_length(ms: i64) -> String {
    let minutes = ms.max(0) / MINUTE_MS;
    format!("{:02}h {:02}m", minutes / 60, minutes % 60)
}

/// Signed delta as `"+Mm SSs"` / `"-Mm SSs"`.
pub fn delta(ms: i64) -> String {
    let sign = if ms < 0 { '-' } else { '+' };
    let seconds = ms.unsigned_abs() / 1000;
    format!("{sign}{}m {:02}s", seconds / 60, seconds % 60)
}

/// Fraction in `[0, 1]` as a percentage with three significant digits,
/// e.g. `0.41234` → `"41.2%"`.
pub fn percent(fraction: f64) -> String {
    let value = fraction * 100.0;
    if value == 0.0 || !value.is_finite() {
        return format!("{:.2}%", value);
    }
    let mut magnitude = value.abs().log10().floor() as i32;
    // Rounding can carry into a new digit (99.96 -> 100)
    if (value.abs() / 10f64.powi(magnitude - 2)).round() >= 1000.0 {
        magnitude += 1;
    }
    let decimals = (2 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    format!("{text}%")
}

/// Whole percentage, as the moon line shows illumination.
pub fn whole_percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as i64)
}

/// `"HH:MM Mon D"`, the refresh stamp.
pub fn refreshed<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    instant.format("%H:%M %b %-d").to_string()
}
