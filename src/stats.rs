//! # Comparative Statistics
//!
//! Day-over-day deltas and the yearly daylight range.
//!
//! ## Time-of-Day Deltas
//! Sunrise and sunset deltas compare milliseconds since each side's own
//! local midnight. Subtracting raw timestamps would report "about a day"
//! instead of "a minute earlier", and would jump around DST changes.
//!
//! ## Yearly Scan
//! The scan builds one [`DaySummary`] per day from one day before the
//! reference through 369 days after (371 samples), so both solstices are
//! always covered whatever the season. Nothing is memoized; one scan per
//! widget refresh is cheap enough.

use chrono::{DateTime, Days, Duration, TimeZone};
use log::debug;
use serde::Serialize;

use crate::error::{EphemerisError, Result};
use crate::summary::{DaySummary, DaySummaryBuilder};
use crate::time;
use crate::GeoCoordinate;

/// Signed differences, today minus yesterday, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDeltas {
    pub day_length_ms: i64,
    pub sunrise_ms: i64,
    pub sunset_ms: i64,
}

fn time_of_day_ms<Tz: TimeZone>(instant: &DateTime<Tz>) -> i64 {
    time::since_local_midnight(instant).num_milliseconds()
}

/// Compare two day summaries. Positive means later (rise/set) or longer.
pub fn compare_day_summaries(today: &DaySummary, yesterday: &DaySummary) -> DayDeltas {
    DayDeltas {
        day_length_ms: today.day_length_ms - yesterday.day_length_ms,
        sunrise_ms: time_of_day_ms(&today.sunrise) - time_of_day_ms(&yesterday.sunrise),
        sunset_ms: time_of_day_ms(&today.sunset) - time_of_day_ms(&yesterday.sunset),
    }
}

/// Shortest and longest day length seen in a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyExtrema {
    pub min_day_length_ms: i64,
    pub max_day_length_ms: i64,
}

impl YearlyExtrema {
    fn single(day_length_ms: i64) -> Self {
        YearlyExtrema {
            min_day_length_ms: day_length_ms,
            max_day_length_ms: day_length_ms,
        }
    }

    fn include(self, day_length_ms: i64) -> Self {
        YearlyExtrema {
            min_day_length_ms: self.min_day_length_ms.min(day_length_ms),
            max_day_length_ms: self.max_day_length_ms.max(day_length_ms),
        }
    }

    /// Where `day_length_ms` sits between min (0.0) and max (1.0).
    ///
    /// `None` when the range is empty, e.g. at the poles or over a
    /// one-day window.
    pub fn progress(&self, day_length_ms: i64) -> Option<f64> {
        let span = self.max_day_length_ms - self.min_day_length_ms;
        if span == 0 {
            return None;
        }
        Some((day_length_ms - self.min_day_length_ms) as f64 / span as f64)
    }
}

/// Day offsets scanned relative to the reference, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearlyWindow {
    start: i64,
    end: i64,
}

impl Default for YearlyWindow {
    fn default() -> Self {
        YearlyWindow {
            start: -1,
            end: 370,
        }
    }
}

impl YearlyWindow {
    /// `None` unless `start < end`.
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (start < end).then_some(YearlyWindow { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of days scanned.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Never true; windows hold at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Same wall-clock time `offset` calendar days away. When that local time
/// doesn't exist or is ambiguous (a DST change), whole 24 h steps are used.
pub(crate) fn shift_days<Tz: TimeZone>(
    reference: &DateTime<Tz>,
    offset: i64,
) -> Result<DateTime<Tz>> {
    let days = Days::new(offset.unsigned_abs());
    let shifted = if offset < 0 {
        reference.clone().checked_sub_days(days)
    } else {
        reference.clone().checked_add_days(days)
    };
    shifted
        .or_else(|| {
            Duration::try_days(offset).and_then(|d| reference.clone().checked_add_signed(d))
        })
        .ok_or(EphemerisError::TimestampOutOfRange(time::epoch_millis(reference)))
}

/// Min and max day length over `window` around `reference`.
///
/// Days are stepped on the local calendar, keeping the reference's
/// wall-clock time.
///
/// # Errors
/// `InvalidArgument` for a bad coordinate, `TimestampOutOfRange` if the
/// window leaves chrono's calendar.
pub fn compute_yearly_extrema<Tz: TimeZone>(
    builder: &DaySummaryBuilder,
    reference: &DateTime<Tz>,
    coord: GeoCoordinate,
    window: YearlyWindow,
) -> Result<YearlyExtrema> {
    let coord = coord.validate()?;
    let mut extrema: Option<YearlyExtrema> = None;

    for offset in window.start..window.end {
        let date = shift_days(reference, offset)?;
        let day_length = builder.build(&date, coord)?.day_length_ms;
        extrema = Some(match extrema {
            Some(e) => e.include(day_length),
            None => YearlyExtrema::single(day_length),
        });
    }

    let extrema = extrema.ok_or(EphemerisError::InvalidArgument {
        name: "yearly window",
        value: 0.0,
    })?;
    debug!(
        "Yearly scan of {} days: min {} ms, max {} ms",
        window.len(),
        extrema.min_day_length_ms,
        extrema.max_day_length_ms
    );
    Ok(extrema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    const MINUTE_MS: i64 = 60_000;
    const DAY_MS: i64 = 86_400_000;

    #[test]
    fn test_window_defaults() {
        let window = YearlyWindow::default();
        assert_eq!(window.start(), -1);
        assert_eq!(window.end(), 370);
        assert_eq!(window.len(), 371);
        assert!(YearlyWindow::new(5, 5).is_none());
        assert!(YearlyWindow::new(3, 2).is_none());
        assert_eq!(YearlyWindow::new(0, 1).map(|w| w.len()), Some(1));
    }

    #[test]
    fn test_progress() {
        let extrema = YearlyExtrema {
            min_day_length_ms: 8 * 3_600_000,
            max_day_length_ms: 16 * 3_600_000,
        };
        assert_eq!(extrema.progress(12 * 3_600_000), Some(0.5));
        assert_eq!(extrema.progress(8 * 3_600_000), Some(0.0));
        assert_eq!(YearlyExtrema::single(5).progress(5), None);
    }

    #[test]
    fn test_equator_range_is_narrow() {
        let reference = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let coord = GeoCoordinate::new(0.0, 0.0).unwrap();
        let extrema = compute_yearly_extrema(
            &DaySummaryBuilder::default(),
            &reference,
            coord,
            YearlyWindow::default(),
        )
        .unwrap();
        assert!(extrema.max_day_length_ms - extrema.min_day_length_ms < 5 * MINUTE_MS);
    }

    #[test]
    fn test_arctic_summer_reaches_full_day() {
        let reference = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let coord = GeoCoordinate::new(66.0, 25.0).unwrap();
        let extrema = compute_yearly_extrema(
            &DaySummaryBuilder::default(),
            &reference,
            coord,
            YearlyWindow::default(),
        )
        .unwrap();
        assert!((extrema.max_day_length_ms - DAY_MS).abs() <= MINUTE_MS);
        assert!(extrema.min_day_length_ms < 4 * 3_600_000);
    }

    #[test]
    fn test_single_day_window() {
        let reference = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        let coord = GeoCoordinate::new(51.5, -0.12).unwrap();
        let builder = DaySummaryBuilder::default();
        let window = YearlyWindow::new(0, 1).unwrap();
        let extrema = compute_yearly_extrema(&builder, &reference, coord, window).unwrap();
        let today = builder.build(&reference, coord).unwrap();
        assert_eq!(extrema, YearlyExtrema::single(today.day_length_ms));
    }

    #[test]
    fn test_self_comparison_is_zero() {
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        let coord = GeoCoordinate::new(40.7, -74.0).unwrap();
        let summary = DaySummaryBuilder::default().build(&t, coord).unwrap();
        let deltas = compare_day_summaries(&summary, &summary);
        assert_eq!(deltas, DayDeltas::default());
    }

    #[test]
    fn test_deltas_use_time_of_day() {
        // A few minutes of change, not a full day of timestamp difference
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let today = est.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let yesterday = est.with_ymd_and_hms(2024, 3, 19, 12, 0, 0).unwrap();
        let coord = GeoCoordinate::new(40.7, -74.0).unwrap();
        let builder = DaySummaryBuilder::default();
        let deltas = compare_day_summaries(
            &builder.build(&today, coord).unwrap(),
            &builder.build(&yesterday, coord).unwrap(),
        );
        // Near the equinox at 40°N sunrise moves ~1-2 min earlier per day
        assert!(deltas.sunrise_ms < 0 && deltas.sunrise_ms > -3 * MINUTE_MS);
        assert!(deltas.sunset_ms > 0 && deltas.sunset_ms < 3 * MINUTE_MS);
        assert!(deltas.day_length_ms > 0 && deltas.day_length_ms < 5 * MINUTE_MS);
    }
}
