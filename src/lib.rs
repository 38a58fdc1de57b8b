//! # Soluna Core Library
//!
//! Sun and moon ephemeris for a small "daylight" widget: when the sun
//! rises and sets, how long the day is compared with yesterday, where the
//! moon is in its cycle, and how far today sits between the shortest and
//! longest day of the year.
//!
//! ## Design Philosophy
//!
//! ### Pure Core
//! Everything astronomical is a synchronous, deterministic function of an
//! instant and a [`GeoCoordinate`]. No I/O, no global state, no caching:
//! the only mutable piece is the elevation band table owned by a
//! [`SunEventFinder`], and that is an ordinary value the caller holds.
//!
//! ### Degenerate Astronomy Is Data
//! Polar day, polar night and a moon that never crosses the horizon are
//! reported through flags and `Option`s on the result types. Only invalid
//! input (NaN or infinite coordinates) produces an [`EphemerisError`].
//!
//! ### Time Zones
//! Instants are `chrono::DateTime<Tz>` at the API boundary. Local day
//! boundaries are taken in the zone of the instant the caller passes in;
//! results are UTC, or the caller's offset in a [`DaySummary`].
//!
//! ## Data Flow
//! 1. **Location**: live lookup raced against a timeout, cache fallback ([`location`])
//! 2. **Core**: today's and yesterday's [`DaySummary`], yearly extrema ([`stats`])
//! 3. **Display**: text or JSON report ([`renderer`], [`format`])
//!
//! ## Core Types
//! - [`GeoCoordinate`]: observer latitude and longitude in degrees
//! - [`CelestialPosition`]: azimuth, altitude and declination of the sun or moon
//! - [`DaySummary`]: one day's sun and moon facts
//! - [`WidgetReport`]: everything the widget shows for one refresh

use chrono::{DateTime, FixedOffset, Offset, TimeZone};
use serde::{Deserialize, Serialize};

// Module declarations
pub mod angles;
pub mod config;
pub mod error;
pub mod format;
pub mod location;
pub mod lunar;
pub mod moon_phase;
pub mod moon_times;
pub mod renderer;
pub mod solar;
pub mod stats;
pub mod summary;
pub mod sun_times;
pub mod time;

#[cfg(test)]
mod tests;

pub use error::{EphemerisError, Result};
pub use lunar::{moon_data, moon_position, MoonData};
pub use moon_phase::{phase_at, MoonPhase, MoonPhaseInfo, NextPhases, PrimaryPhase};
pub use moon_times::{moon_times, MoonTimes, MoonVisibility, WindowCrossing};
pub use solar::{sun_position, sun_time_by_azimuth};
pub use stats::{compare_day_summaries, DayDeltas, YearlyExtrema, YearlyWindow};
pub use summary::{DaySummary, DaySummaryBuilder};
pub use sun_times::{sun_time_at, ElevationBand, SunEventFinder, SunTimeEvent, SunTimes};

use error::check_finite;

/// Observer location in degrees.
///
/// North and east are positive. Both fields must be finite; every public
/// entry point re-validates, so a struct literal with a NaN still fails
/// fast instead of producing NaN timestamps.
///
/// # Example
/// ```
/// use soluna_lib::GeoCoordinate;
///
/// let london = GeoCoordinate::new(51.5, -0.12).unwrap();
/// assert_eq!(london.latitude, 51.5);
/// assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Degrees, -90 to 90
    pub latitude: f64,
    /// Degrees, -180 to 180
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        GeoCoordinate {
            latitude,
            longitude,
        }
        .validate()
    }

    /// Returns `self` if both components are finite.
    pub fn validate(self) -> Result<Self> {
        check_finite("latitude", self.latitude)?;
        check_finite("longitude", self.longitude)?;
        Ok(self)
    }
}

/// Horizontal position of the sun or moon, angles in radians.
///
/// Azimuth is measured from north through east. Distance and parallactic
/// angle are only populated for the moon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialPosition {
    pub azimuth: f64,
    pub altitude: f64,
    pub declination: f64,
    pub distance_km: Option<f64>,
    pub parallactic_angle: Option<f64>,
}

impl CelestialPosition {
    pub fn azimuth_degrees(&self) -> f64 {
        self.azimuth * angles::DEG
    }

    pub fn altitude_degrees(&self) -> f64 {
        self.altitude * angles::DEG
    }

    pub fn declination_degrees(&self) -> f64 {
        self.declination * angles::DEG
    }

    /// Angle from the zenith, radians.
    pub fn zenith(&self) -> f64 {
        std::f64::consts::FRAC_PI_2 - self.altitude
    }

    pub fn parallactic_angle_degrees(&self) -> Option<f64> {
        self.parallactic_angle.map(|q| q * angles::DEG)
    }
}

/// Summary for the local day of `instant` with the default band table.
///
/// # Errors
/// `InvalidArgument` if latitude, longitude or observer height is not finite.
pub fn compute_day_summary<Tz: TimeZone>(
    instant: &DateTime<Tz>,
    latitude: f64,
    longitude: f64,
    observer_height_m: Option<f64>,
) -> Result<DaySummary> {
    let coord = GeoCoordinate::new(latitude, longitude)?;
    DaySummaryBuilder::default()
        .with_observer_height(observer_height_m.unwrap_or(0.0))
        .build(instant, coord)
}

/// Shortest and longest day length over the default window around
/// `reference` (one day before through 369 days after).
pub fn compute_yearly_extrema<Tz: TimeZone>(
    reference: &DateTime<Tz>,
    latitude: f64,
    longitude: f64,
) -> Result<YearlyExtrema> {
    let coord = GeoCoordinate::new(latitude, longitude)?;
    stats::compute_yearly_extrema(
        &DaySummaryBuilder::default(),
        reference,
        coord,
        YearlyWindow::default(),
    )
}

/// Everything one widget refresh displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetReport {
    pub label: String,
    pub refreshed: DateTime<FixedOffset>,
    pub today: DaySummary,
    pub yesterday: DaySummary,
    pub deltas: DayDeltas,
    pub extrema: YearlyExtrema,
    /// Today's day length between the yearly extremes, 0.0 to 1.0
    pub progress: Option<f64>,
    /// Today's sun event table, dawn to dusk, then any aliases
    pub sun_events: Vec<SunTimeEvent>,
}

/// Options for [`build_report`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub window: YearlyWindow,
    /// Include deprecated alias names in `sun_events`
    pub include_aliases: bool,
}

/// Today vs. yesterday plus the yearly range, as the widget shows it.
///
/// # Errors
/// `InvalidArgument` for a bad coordinate, `TimestampOutOfRange` if
/// yesterday or the scan window falls outside chrono's calendar.
pub fn build_report<Tz: TimeZone>(
    builder: &DaySummaryBuilder,
    now: &DateTime<Tz>,
    coord: GeoCoordinate,
    label: &str,
    options: ReportOptions,
) -> Result<WidgetReport> {
    let today = builder.build(now, coord)?;
    let yesterday_instant = stats::shift_days(now, -1)?;
    let yesterday = builder.build(&yesterday_instant, coord)?;

    let deltas = compare_day_summaries(&today, &yesterday);
    let extrema = stats::compute_yearly_extrema(builder, now, coord, options.window)?;
    let progress = extrema.progress(today.day_length_ms);

    let table = if options.include_aliases {
        builder
            .finder()
            .sun_events_with_aliases(now, coord, builder.observer_height_m())?
    } else {
        builder
            .finder()
            .sun_events(now, coord, builder.observer_height_m())?
    };
    let mut sun_events: Vec<SunTimeEvent> = table.ordered().into_iter().cloned().collect();
    sun_events.extend(table.iter().filter(|e| e.alias_of.is_some()).cloned());

    Ok(WidgetReport {
        label: label.to_string(),
        refreshed: now.with_timezone(&now.offset().fix()),
        today,
        yesterday,
        deltas,
        extrema,
        progress,
        sun_events,
    })
}
