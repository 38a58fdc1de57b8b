//! # Angle Math
//!
//! Spherical-astronomy helpers shared by the sun and moon models. Everything
//! here works in radians; degree values only appear at the edges (tables of
//! elevation bands, user-facing position fields).
//!
//! The formulas are the low-order approximations popularised by the
//! Astronomy Answers articles on the position of the sun and moon. They are
//! good to a fraction of a degree for dates within a few centuries of J2000,
//! which is plenty for rise/set times rounded to the minute.

use core::f64::consts::PI;

/// Degrees → radians factor.
pub const RAD: f64 = PI / 180.0;

/// Radians → degrees factor.
pub const DEG: f64 = 180.0 / PI;

/// Obliquity of the ecliptic at J2000.
const OBLIQUITY: f64 = RAD * 23.4397;

/// Right ascension from ecliptic longitude `l` and latitude `b`.
pub fn right_ascension(l: f64, b: f64) -> f64 {
    (l.sin() * OBLIQUITY.cos() - b.tan() * OBLIQUITY.sin()).atan2(l.cos())
}

/// Declination from ecliptic longitude `l` and latitude `b`.
pub fn declination(l: f64, b: f64) -> f64 {
    (b.sin() * OBLIQUITY.cos() + b.cos() * OBLIQUITY.sin() * l.sin()).asin()
}

/// Azimuth measured from north through east, in `[0, 2π]`.
///
/// `h` is the local hour angle, `phi` the observer latitude and `dec` the
/// body's declination.
pub fn azimuth(h: f64, phi: f64, dec: f64) -> f64 {
    h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos()) + PI
}

/// Geometric altitude above the horizon.
pub fn altitude(h: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos()).asin()
}

/// Local sidereal time for `d` days since J2000 at west longitude `lw`.
pub fn sidereal_time(d: f64, lw: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * d) - lw
}

/// Empirical atmospheric refraction (Sæmundsson) for an apparent altitude.
///
/// Altitudes below the horizon are evaluated as if on it, so the
/// correction stays continuous across zero instead of blowing up.
pub fn astro_refraction(h: f64) -> f64 {
    let h = h.max(0.0);
    0.000_296_7 / (h + 0.003_125_36 / (h + 0.089_011_79)).tan()
}

/// Horizon dip in degrees for an observer `height_m` metres above the
/// surface. Always `<= 0`.
pub fn observer_dip(height_m: f64) -> f64 {
    -2.076 * height_m.max(0.0).sqrt() / 60.0
}
