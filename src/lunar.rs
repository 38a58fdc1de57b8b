//! # Lunar Position
//!
//! Low-precision topocentric position of the moon. The orbit is reduced to
//! its mean longitude, mean anomaly and argument of latitude with a single
//! periodic term each for longitude, latitude and distance.
//! Accuracy: a degree or so in longitude, a few percent in distance.

use chrono::{DateTime, TimeZone};

use crate::angles::{self, RAD};
use crate::error::Result;
use crate::moon_phase::{self, MoonPhaseInfo};
use crate::time;
use crate::{CelestialPosition, GeoCoordinate};

/// Geocentric equatorial coordinates of the moon plus distance in km.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MoonCoords {
    pub ra: f64,
    pub dec: f64,
    pub dist: f64,
}

pub(crate) fn moon_coords(d: f64) -> MoonCoords {
    let mean_longitude = RAD * (218.316 + 13.176_396 * d);
    let mean_anomaly = RAD * (134.963 + 13.064_993 * d);
    let latitude_argument = RAD * (93.272 + 13.229_350 * d);

    let l = mean_longitude + RAD * 6.289 * mean_anomaly.sin();
    let b = RAD * 5.128 * latitude_argument.sin();
    let dist = 385_001.0 - 20_905.0 * mean_anomaly.cos();

    MoonCoords {
        ra: angles::right_ascension(l, b),
        dec: angles::declination(l, b),
        dist,
    }
}

/// Moon position for a Unix millisecond value; the coordinate must already
/// be validated. Altitude includes atmospheric refraction.
pub(crate) fn moon_position_at(ms: f64, coord: GeoCoordinate) -> CelestialPosition {
    let lw = RAD * -coord.longitude;
    let phi = RAD * coord.latitude;
    let d = time::to_days(ms);
    let c = moon_coords(d);
    let h = angles::sidereal_time(d, lw) - c.ra;

    let geometric = angles::altitude(h, phi, c.dec);
    let parallactic = h
        .sin()
        .atan2(phi.tan() * c.dec.cos() - c.dec.sin() * h.cos());

    CelestialPosition {
        azimuth: angles::azimuth(h, phi, c.dec),
        altitude: geometric + angles::astro_refraction(geometric),
        declination: c.dec,
        distance_km: Some(c.dist),
        parallactic_angle: Some(parallactic),
    }
}

/// Apparent position of the moon for an observer.
///
/// # Errors
/// `InvalidArgument` if the latitude or longitude is not finite.
pub fn moon_position<Tz: TimeZone>(
    instant: &DateTime<Tz>,
    coord: GeoCoordinate,
) -> Result<CelestialPosition> {
    let coord = coord.validate()?;
    Ok(moon_position_at(time::epoch_millis(instant), coord))
}

/// Moon position and illumination for one instant, plus the angle of the
/// bright limb relative to the observer's zenith.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MoonData {
    pub position: CelestialPosition,
    pub illumination: MoonPhaseInfo,
    /// `illumination.phase_angle - parallactic_angle`, radians
    pub zenith_angle: f64,
}

/// Position and illumination of the moon in one call.
pub fn moon_data<Tz: TimeZone>(instant: &DateTime<Tz>, coord: GeoCoordinate) -> Result<MoonData> {
    let position = moon_position(instant, coord)?;
    let illumination = moon_phase::phase_at(instant)?;
    let zenith_angle = illumination.phase_angle - position.parallactic_angle.unwrap_or(0.0);

    Ok(MoonData {
        position,
        illumination,
        zenith_angle,
    })
}
