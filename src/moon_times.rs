//! # Moonrise & Moonset
//!
//! The moon moves too fast for the closed-form hour-angle trick used for the
//! sun, so rise and set are found numerically:
//!
//! - Sample the refracted lunar altitude, less a small horizon offset, every
//!   hour from local midnight to 26 hours later.
//! - Walk 13 two-hour windows. Each window's start, middle and end samples
//!   define a parabola; its real roots inside the window are horizon
//!   crossings.
//! - Stop once both a rise and a set have been seen.
//!
//! A day with no crossing at all is "always up" or "always down", decided
//! by the sign of the last window's vertex. This is a heuristic: the vertex
//! of one window says little about the other twelve.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::angles::RAD;
use crate::error::Result;
use crate::lunar::moon_position_at;
use crate::time;
use crate::GeoCoordinate;

/// Horizon offset for moon events: apparent radius less parallax, roughly.
const HORIZON_OFFSET: f64 = 0.133 * RAD;

/// Window centres in hours after local midnight: 1, 3, …, 25.
const WINDOW_CENTRES: std::ops::RangeInclusive<u32> = 1..=25;

/// Horizon crossings inside one parabola window.
///
/// Offsets are in window units: -1 at the first sample, 0 at the middle,
/// 1 at the last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowCrossing {
    None,
    Rise(f64),
    Set(f64),
    Both { rise: f64, set: f64 },
}

/// Result of fitting one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowFit {
    pub crossing: WindowCrossing,
    /// Parabola value at its vertex (`h1` for a straight line)
    pub vertex_value: f64,
}

/// Fit a parabola through three evenly spaced altitude samples (already
/// relative to the horizon) and classify its crossings on `[-1, 1]`.
///
/// - one root: a rise if the window starts below the horizon, else a set
/// - two roots: an arc above the horizon (vertex > 0) rises then sets,
///   a dip below it (vertex < 0) sets then rises
pub fn classify_window(h0: f64, h1: f64, h2: f64) -> WindowFit {
    let a = (h0 + h2) / 2.0 - h1;
    let b = (h2 - h0) / 2.0;

    if a == 0.0 {
        // Degenerate: the three samples are collinear
        let crossing = if b != 0.0 && (h1 / b).abs() <= 1.0 {
            single_crossing(h0, -h1 / b)
        } else {
            WindowCrossing::None
        };
        return WindowFit {
            crossing,
            vertex_value: h1,
        };
    }

    let xe = -b / (2.0 * a);
    let ye = (a * xe + b) * xe + h1;
    let discriminant = b * b - 4.0 * a * h1;

    let crossing = if discriminant < 0.0 {
        WindowCrossing::None
    } else {
        let dx = discriminant.sqrt() / (a.abs() * 2.0);
        let x1 = xe - dx;
        let x2 = xe + dx;
        match (x1.abs() <= 1.0, x2.abs() <= 1.0) {
            (true, true) if ye < 0.0 => WindowCrossing::Both { rise: x2, set: x1 },
            (true, true) => WindowCrossing::Both { rise: x1, set: x2 },
            (true, false) => single_crossing(h0, x1),
            (false, true) => single_crossing(h0, x2),
            (false, false) => WindowCrossing::None,
        }
    };

    WindowFit {
        crossing,
        vertex_value: ye,
    }
}

fn single_crossing(h0: f64, x: f64) -> WindowCrossing {
    if h0 < 0.0 {
        WindowCrossing::Rise(x)
    } else {
        WindowCrossing::Set(x)
    }
}

/// Which of the mutually exclusive outcomes a day has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MoonVisibility {
    RiseAndSet,
    RiseOnly,
    SetOnly,
    AlwaysUp,
    AlwaysDown,
}

/// Moon events for one local day. Absent events are `None`, never a
/// placeholder instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoonTimes {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
    pub always_up: bool,
    pub always_down: bool,
    /// Midpoint of rise and set, only when both exist
    pub highest: Option<DateTime<Utc>>,
}

impl MoonTimes {
    pub fn visibility(&self) -> MoonVisibility {
        match (self.rise.is_some(), self.set.is_some()) {
            (true, true) => MoonVisibility::RiseAndSet,
            (true, false) => MoonVisibility::RiseOnly,
            (false, true) => MoonVisibility::SetOnly,
            (false, false) if self.always_up => MoonVisibility::AlwaysUp,
            (false, false) => MoonVisibility::AlwaysDown,
        }
    }
}

/// Moonrise, moonset and transit for the local day of `date`.
///
/// # Errors
/// `InvalidArgument` for a non-finite coordinate.
pub fn moon_times<Tz: TimeZone>(date: &DateTime<Tz>, coord: GeoCoordinate) -> Result<MoonTimes> {
    let coord = coord.validate()?;
    let midnight = time::epoch_millis(&time::local_midnight(date));
    let altitude_at = |hours: u32| {
        let ms = time::hours_later(midnight, f64::from(hours));
        moon_position_at(ms, coord).altitude - HORIZON_OFFSET
    };

    let mut rise: Option<f64> = None;
    let mut set: Option<f64> = None;
    let mut last_vertex = 0.0;
    let mut h0 = altitude_at(0);

    for centre in WINDOW_CENTRES.step_by(2) {
        let h1 = altitude_at(centre);
        let h2 = altitude_at(centre + 1);
        let fit = classify_window(h0, h1, h2);
        last_vertex = fit.vertex_value;

        let centre = f64::from(centre);
        match fit.crossing {
            WindowCrossing::None => {}
            WindowCrossing::Rise(x) => rise = Some(centre + x),
            WindowCrossing::Set(x) => set = Some(centre + x),
            WindowCrossing::Both { rise: r, set: s } => {
                rise = Some(centre + r);
                set = Some(centre + s);
            }
        }

        if rise.is_some() && set.is_some() {
            break;
        }
        h0 = h2;
    }

    let at = |hours: f64| time::to_datetime(time::hours_later(midnight, hours));
    let neither = rise.is_none() && set.is_none();
    let highest = match (rise, set) {
        (Some(r), Some(s)) => Some(at(r.min(s) + (s - r).abs() / 2.0)?),
        _ => None,
    };

    Ok(MoonTimes {
        rise: rise.map(at).transpose()?,
        set: set.map(at).transpose()?,
        always_up: neither && last_vertex > 0.0,
        always_down: neither && last_vertex <= 0.0,
        highest,
    })
}
