//! # Day Summary
//!
//! One immutable record per (day, location): sunrise and sunset, day
//! length, moon events and the moon's phase. This is what the widget
//! displays and what the comparative statistics consume.

use chrono::{DateTime, FixedOffset, Offset, TimeZone};
use serde::Serialize;

use crate::error::{check_finite, Result};
use crate::moon_phase::{self, MoonPhaseInfo};
use crate::moon_times::{self, MoonTimes};
use crate::sun_times::{self, SunEventFinder, SunTimeEvent, Unreachable};
use crate::time::DAY_MS;
use crate::GeoCoordinate;

/// Event used as the start of daylight.
pub const SUNRISE_EVENT: &str = "sunriseStart";

/// Event used as the end of daylight.
pub const SUNSET_EVENT: &str = "sunsetEnd";

/// Sun and moon facts for one local day, with every instant expressed in
/// the caller's UTC offset at the query instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub coordinate: GeoCoordinate,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
    pub solar_noon: DateTime<FixedOffset>,
    /// False when the sun never crosses the sunrise horizon that day
    pub sun_crosses_horizon: bool,
    pub day_length_ms: i64,
    pub moonrise: Option<DateTime<FixedOffset>>,
    pub moonset: Option<DateTime<FixedOffset>>,
    pub moon: MoonTimes,
    pub moon_phase: MoonPhaseInfo,
}

impl DaySummary {
    /// Face-free emoji for the current phase.
    pub fn moon_emoji(&self) -> &'static str {
        self.moon_phase.phase.plain_emoji()
    }

    pub fn moon_phase_name(&self) -> &'static str {
        self.moon_phase.phase.name()
    }
}

/// Daylight between two sun events.
///
/// A solved pair gives `set − rise`. When the sunrise horizon is never
/// crossed the fallback instants would always span a full day, so polar
/// night is reported as zero instead.
fn day_length_ms(rise: &SunTimeEvent, set: &SunTimeEvent) -> i64 {
    match set.unreachable {
        Some(Unreachable::AlwaysBelow) => 0,
        Some(Unreachable::AlwaysAbove) => DAY_MS as i64,
        None => (set.timestamp - rise.timestamp).num_milliseconds(),
    }
}

/// Builds [`DaySummary`] records from an owned sun event table.
#[derive(Debug, Clone, Default)]
pub struct DaySummaryBuilder {
    finder: SunEventFinder,
    observer_height_m: f64,
}

impl DaySummaryBuilder {
    pub fn new(finder: SunEventFinder) -> Self {
        DaySummaryBuilder {
            finder,
            observer_height_m: 0.0,
        }
    }

    pub fn with_observer_height(mut self, metres: f64) -> Self {
        self.observer_height_m = metres;
        self
    }

    pub fn finder(&self) -> &SunEventFinder {
        &self.finder
    }

    /// Mutable access for registering extra elevation bands.
    pub fn finder_mut(&mut self) -> &mut SunEventFinder {
        &mut self.finder
    }

    pub fn observer_height_m(&self) -> f64 {
        self.observer_height_m
    }

    /// Summary for the local day of `instant`.
    ///
    /// # Errors
    /// `InvalidArgument` for a non-finite coordinate or observer height.
    pub fn build<Tz: TimeZone>(
        &self,
        instant: &DateTime<Tz>,
        coord: GeoCoordinate,
    ) -> Result<DaySummary> {
        let coord = coord.validate()?;
        check_finite("observer height", self.observer_height_m)?;
        let offset = instant.offset().fix();

        let height = self.observer_height_m;
        let sun = self.finder.sun_events(instant, coord, height)?;
        let (rise, set) = match (sun.get(SUNRISE_EVENT), sun.get(SUNSET_EVENT)) {
            (Some(rise), Some(set)) => (rise.clone(), set.clone()),
            // Custom tables may lack the standard horizon
            _ => {
                let pair = sun_times::sun_time_at(instant, coord, 0.0, self.observer_height_m)?;
                (pair.rise, pair.set)
            }
        };
        let noon = sun.solar_noon();

        let moon = moon_times::moon_times(instant, coord)?;
        let moon_phase = moon_phase::phase_at(instant)?;

        Ok(DaySummary {
            coordinate: coord,
            sunrise: rise.timestamp.with_timezone(&offset),
            sunset: set.timestamp.with_timezone(&offset),
            solar_noon: noon.timestamp.with_timezone(&offset),
            sun_crosses_horizon: rise.valid,
            day_length_ms: day_length_ms(&rise, &set),
            moonrise: moon.rise.map(|t| t.with_timezone(&offset)),
            moonset: moon.set.map(|t| t.with_timezone(&offset)),
            moon,
            moon_phase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};

    const HOUR_MS: i64 = 3_600_000;

    fn solstice() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap()
    }

    fn solstice_summary(coord: GeoCoordinate) -> DaySummary {
        DaySummaryBuilder::default()
            .build(&solstice(), coord)
            .unwrap()
    }

    #[test]
    fn test_london_long_day() {
        let london = GeoCoordinate::new(51.5, -0.12).unwrap();
        let summary = solstice_summary(london);
        assert!(summary.day_length_ms > 16 * HOUR_MS);
        assert!(summary.sunrise < summary.solar_noon && summary.solar_noon < summary.sunset);
        assert!(summary.sun_crosses_horizon);
    }

    #[test]
    fn test_sydney_short_day() {
        let sydney = GeoCoordinate::new(-33.9, 151.2).unwrap();
        let summary = solstice_summary(sydney);
        assert!(summary.day_length_ms < 10 * HOUR_MS);
        assert!(summary.day_length_ms > 9 * HOUR_MS);
    }

    #[test]
    fn test_times_carry_callers_offset() {
        let aest = FixedOffset::east_opt(10 * 3600).unwrap();
        let t = aest.with_ymd_and_hms(2024, 6, 21, 8, 0, 0).unwrap();
        let sydney = GeoCoordinate::new(-33.9, 151.2).unwrap();
        let summary = DaySummaryBuilder::default().build(&t, sydney).unwrap();
        assert_eq!(summary.sunrise.offset(), &aest);
        assert_eq!(summary.sunrise.date_naive(), t.date_naive());
        // Sunrise 07:00 AEST
        let minutes = summary.sunrise.hour() * 60 + summary.sunrise.minute();
        assert!((6 * 60 + 50..=7 * 60 + 10).contains(&minutes));
    }

    #[test]
    fn test_polar_day_and_night_lengths() {
        let tromso = GeoCoordinate::new(69.65, 18.96).unwrap();
        let builder = DaySummaryBuilder::default();

        let summer = builder.build(&solstice(), tromso).unwrap();
        assert_eq!(summer.day_length_ms, 24 * HOUR_MS);
        assert!(!summer.sun_crosses_horizon);

        let winter = Utc.with_ymd_and_hms(2024, 12, 21, 12, 0, 0).unwrap();
        let winter = builder.build(&winter, tromso).unwrap();
        assert_eq!(winter.day_length_ms, 0);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let coord = GeoCoordinate::new(35.7, 139.7).unwrap();
        let builder = DaySummaryBuilder::default().with_observer_height(30.0);
        assert_eq!(
            builder.build(&solstice(), coord).unwrap(),
            builder.build(&solstice(), coord).unwrap()
        );
    }

    #[test]
    fn test_moon_fields_match_moon_times() {
        let coord = GeoCoordinate::new(48.85, 2.35).unwrap();
        let summary = solstice_summary(coord);
        let moonrise = summary.moonrise.map(|t| t.timestamp_millis());
        assert_eq!(moonrise, summary.moon.rise.map(|t| t.timestamp_millis()));
        assert!((0.0..=1.0).contains(&summary.moon_phase.fraction));
        assert!(!summary.moon_emoji().is_empty());
    }

    #[test]
    fn test_custom_table_without_sunrise_band() {
        let coord = GeoCoordinate::new(51.5, -0.12).unwrap();
        let standard = solstice_summary(coord);
        let bare = DaySummaryBuilder::new(SunEventFinder::empty())
            .build(&solstice(), coord)
            .unwrap();
        assert_eq!(bare.sunrise, standard.sunrise);
        assert_eq!(bare.day_length_ms, standard.day_length_ms);
    }

    #[test]
    fn test_invalid_inputs() {
        let coord = GeoCoordinate {
            latitude: 10.0,
            longitude: f64::INFINITY,
        };
        let builder = DaySummaryBuilder::default();
        assert!(builder.build(&solstice(), coord).is_err());

        let ok = GeoCoordinate::new(10.0, 10.0).unwrap();
        let builder = builder.with_observer_height(f64::NAN);
        assert!(builder.build(&solstice(), ok).is_err());
    }
}
