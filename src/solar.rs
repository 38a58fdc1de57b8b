//! # Solar Position
//!
//! Low-precision apparent position of the sun: mean anomaly → equation of
//! centre → ecliptic longitude → equatorial coordinates, then horizontal
//! coordinates for the observer via local sidereal time.

use chrono::{DateTime, TimeZone, Utc};
use core::f64::consts::PI;

use crate::angles::{self, RAD};
use crate::error::Result;
use crate::time::{self, DAY_MS};
use crate::{CelestialPosition, GeoCoordinate};

/// Perihelion of the earth, ecliptic longitude.
const PERIHELION: f64 = RAD * 102.9372;

/// Equatorial coordinates of the sun.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SunCoords {
    pub dec: f64,
    pub ra: f64,
}

pub(crate) fn solar_mean_anomaly(d: f64) -> f64 {
    RAD * (357.5291 + 0.985_600_28 * d)
}

/// Ecliptic longitude from the mean anomaly (equation of centre applied).
pub(crate) fn ecliptic_longitude(m: f64) -> f64 {
    let c = RAD * (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin());
    m + c + PERIHELION + PI
}

pub(crate) fn sun_coords(d: f64) -> SunCoords {
    let l = ecliptic_longitude(solar_mean_anomaly(d));
    SunCoords {
        dec: angles::declination(l, 0.0),
        ra: angles::right_ascension(l, 0.0),
    }
}

/// Sun position for a Unix millisecond value; the coordinate must already be
/// validated.
pub(crate) fn sun_position_at(ms: f64, coord: GeoCoordinate) -> CelestialPosition {
    let lw = RAD * -coord.longitude;
    let phi = RAD * coord.latitude;
    let d = time::to_days(ms);
    let c = sun_coords(d);
    let h = angles::sidereal_time(d, lw) - c.ra;

    CelestialPosition {
        azimuth: angles::azimuth(h, phi, c.dec),
        altitude: angles::altitude(h, phi, c.dec),
        declination: c.dec,
        distance_km: None,
        parallactic_angle: None,
    }
}

/// Apparent position of the sun for an observer.
///
/// # Errors
/// `InvalidArgument` if the latitude or longitude is not finite.
pub fn sun_position<Tz: TimeZone>(
    instant: &DateTime<Tz>,
    coord: GeoCoordinate,
) -> Result<CelestialPosition> {
    let coord = coord.validate()?;
    Ok(sun_position_at(time::epoch_millis(instant), coord))
}

/// Instant on the local day of `date` at which the sun reaches the given
/// azimuth (degrees from north, through east).
///
/// Bisects from the following midnight with a step that halves from one day
/// down to 200 ms. The search assumes azimuth increases through the day,
/// which holds everywhere outside the polar circles.
pub fn sun_time_by_azimuth<Tz: TimeZone>(
    date: &DateTime<Tz>,
    coord: GeoCoordinate,
    azimuth_degrees: f64,
) -> Result<DateTime<Utc>> {
    let coord = coord.validate()?;
    let target = crate::error::check_finite("azimuth", azimuth_degrees)? * RAD;

    let mut ms = time::epoch_millis(&time::local_midnight(date)) + DAY_MS;
    let mut step = DAY_MS;
    while step > 200.0 {
        let az = sun_position_at(ms, coord).azimuth;
        step /= 2.0;
        if az < target {
            ms += step;
        } else {
            ms -= step;
        }
    }

    time::to_datetime(ms.floor())
}
