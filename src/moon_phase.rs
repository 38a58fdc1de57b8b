//! # Moon Phase & Illumination
//!
//! Two independent views of the lunar month:
//!
//! - **Geometry**: the illuminated fraction and the bright-limb angle come
//!   from the geocentric sun and moon positions at the instant. No observer
//!   is involved.
//! - **Calendar**: the position within the synodic month is plain modular
//!   arithmetic from a reference new moon with a fixed mean period. The
//!   named phase and the next primary phases are derived from it.
//!
//! The mean-period calendar can drift from the true phase by up to half a
//! day, which is invisible at widget resolution.

use chrono::{DateTime, TimeZone, Utc};
use core::f64::consts::PI;
use serde::Serialize;

use crate::error::Result;
use crate::lunar::moon_coords;
use crate::solar::sun_coords;
use crate::time;

/// Mean synodic month in milliseconds (29.530 588 2 days).
pub const SYNODIC_MONTH_MS: i64 = 2_551_442_778;

/// Reference new moon: 2000-01-06T18:14:00Z.
pub const REFERENCE_NEW_MOON_MS: i64 = 947_178_840_000;

/// Mean earth–sun distance in km.
const SUN_DISTANCE_KM: f64 = 149_598_000.0;

/// The eight named phases of the lunar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Stable identifier, e.g. `"waxingCrescentMoon"`.
    pub fn id(self) -> &'static str {
        match self {
            Self::NewMoon => "newMoon",
            Self::WaxingCrescent => "waxingCrescentMoon",
            Self::FirstQuarter => "firstQuarterMoon",
            Self::WaxingGibbous => "waxingGibbousMoon",
            Self::FullMoon => "fullMoon",
            Self::WaningGibbous => "waningGibbousMoon",
            Self::ThirdQuarter => "thirdQuarterMoon",
            Self::WaningCrescent => "waningCrescentMoon",
        }
    }

    /// Display name, e.g. `"Waxing Crescent"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::ThirdQuarter => "Third Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::NewMoon => "🌚",
            Self::WaxingCrescent => "🌒",
            Self::FirstQuarter => "🌓",
            Self::WaxingGibbous => "🌔",
            Self::FullMoon => "🌝",
            Self::WaningGibbous => "🌖",
            Self::ThirdQuarter => "🌗",
            Self::WaningCrescent => "🌘",
        }
    }

    /// Emoji without the faces used for new and full moon.
    pub fn plain_emoji(self) -> &'static str {
        match self {
            Self::NewMoon => "🌑",
            Self::FullMoon => "🌕",
            other => other.emoji(),
        }
    }
}

/// One slice of the lunar month, `[from, to)` in cycle fractions.
#[derive(Debug, Clone, Copy)]
pub struct PhaseBand {
    pub from: f64,
    pub to: f64,
    pub phase: MoonPhase,
}

/// Quarter states are one day wide, the crescents and gibbous phases share
/// the rest (weights 1 : 6.3825). New moon straddles the wrap point.
#[rustfmt::skip]
pub const PHASE_BANDS: [PhaseBand; 9] = [
    PhaseBand { from: 0.0, to: 0.033_863_193_308_711, phase: MoonPhase::NewMoon },
    PhaseBand { from: 0.033_863_193_308_711, to: 0.216_136_806_691_289, phase: MoonPhase::WaxingCrescent },
    PhaseBand { from: 0.216_136_806_691_289, to: 0.283_863_193_308_711, phase: MoonPhase::FirstQuarter },
    PhaseBand { from: 0.283_863_193_308_711, to: 0.466_136_806_691_289, phase: MoonPhase::WaxingGibbous },
    PhaseBand { from: 0.466_136_806_691_289, to: 0.533_863_193_308_711, phase: MoonPhase::FullMoon },
    PhaseBand { from: 0.533_863_193_308_711, to: 0.716_136_806_691_289, phase: MoonPhase::WaningGibbous },
    PhaseBand { from: 0.716_136_806_691_289, to: 0.783_863_193_308_711, phase: MoonPhase::ThirdQuarter },
    PhaseBand { from: 0.783_863_193_308_711, to: 0.966_136_806_691_289, phase: MoonPhase::WaningCrescent },
    PhaseBand { from: 0.966_136_806_691_289, to: 1.0, phase: MoonPhase::NewMoon },
];

/// Named phase for a cycle position. Values outside `[0, 1)` are wrapped.
pub fn classify_cycle_position(position: f64) -> MoonPhase {
    let position = position.rem_euclid(1.0);
    PHASE_BANDS
        .iter()
        .find(|band| band.from <= position && position < band.to)
        .map_or(MoonPhase::NewMoon, |band| band.phase)
}

/// The four primary phases with a well-defined instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimaryPhase {
    NewMoon,
    FirstQuarter,
    FullMoon,
    ThirdQuarter,
}

/// Upcoming primary phases, each strictly after the query instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPhases {
    pub new_moon: DateTime<Utc>,
    pub first_quarter: DateTime<Utc>,
    pub full_moon: DateTime<Utc>,
    pub third_quarter: DateTime<Utc>,
    /// The soonest of the four
    pub next: PrimaryPhase,
    pub next_at: DateTime<Utc>,
}

/// Illumination and phase of the moon at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoonPhaseInfo {
    /// Illuminated fraction of the disc, `[0, 1]`
    pub fraction: f64,
    /// Position angle of the bright limb, radians, signed
    pub phase_angle: f64,
    /// Geometric phase, `0.5 ± inc / 2π` (0 and 1 new, 0.5 full)
    pub phase_value: f64,
    /// Elapsed fraction of the mean synodic month, `[0, 1)`
    pub cycle_position: f64,
    pub phase: MoonPhase,
    pub next: NextPhases,
}

/// Milliseconds elapsed in the current mean synodic month, `[0, period)`.
pub fn cycle_offset_ms(epoch_ms: i64) -> i64 {
    (epoch_ms - REFERENCE_NEW_MOON_MS).rem_euclid(SYNODIC_MONTH_MS)
}

/// Next instant at `target_ms` into the cycle, never at or before now.
fn next_at_offset(now_ms: i64, cycle_ms: i64, target_ms: i64) -> i64 {
    let mut ahead = target_ms - cycle_ms;
    if ahead <= 0 {
        ahead += SYNODIC_MONTH_MS;
    }
    now_ms + ahead
}

fn next_phases(now_ms: i64) -> Result<NextPhases> {
    let cycle_ms = cycle_offset_ms(now_ms);
    let month = SYNODIC_MONTH_MS;
    let quarter = month / 4;
    let ahead = |target_ms: i64| next_at_offset(now_ms, cycle_ms, target_ms);

    let candidates = [
        (PrimaryPhase::NewMoon, ahead(month)),
        (PrimaryPhase::FirstQuarter, ahead(quarter)),
        (PrimaryPhase::FullMoon, ahead(month / 2)),
        (PrimaryPhase::ThirdQuarter, ahead(month - quarter)),
    ];

    // First minimum wins, so ties resolve in table order
    let (next, next_ms) = candidates
        .iter()
        .copied()
        .fold(candidates[0], |best, c| if c.1 < best.1 { c } else { best });

    let at = |ms: i64| time::to_datetime(ms as f64);
    Ok(NextPhases {
        new_moon: at(candidates[0].1)?,
        first_quarter: at(candidates[1].1)?,
        full_moon: at(candidates[2].1)?,
        third_quarter: at(candidates[3].1)?,
        next,
        next_at: at(next_ms)?,
    })
}

/// Illumination, phase and upcoming primary phases at an instant.
pub fn phase_at<Tz: TimeZone>(instant: &DateTime<Tz>) -> Result<MoonPhaseInfo> {
    let now_ms = instant.timestamp_millis();
    let d = time::to_days(now_ms as f64);
    let s = sun_coords(d);
    let m = moon_coords(d);

    let cos_elongation =
        s.dec.sin() * m.dec.sin() + s.dec.cos() * m.dec.cos() * (s.ra - m.ra).cos();
    let (sin_e, cos_e) = cos_elongation.clamp(-1.0, 1.0).acos().sin_cos();
    let inc = (SUN_DISTANCE_KM * sin_e).atan2(m.dist - SUN_DISTANCE_KM * cos_e);
    let angle = (s.dec.cos() * (s.ra - m.ra).sin()).atan2(
        s.dec.sin() * m.dec.cos() - s.dec.cos() * m.dec.sin() * (s.ra - m.ra).cos(),
    );
    let sign = if angle < 0.0 { -1.0 } else { 1.0 };

    let cycle_position = cycle_offset_ms(now_ms) as f64 / SYNODIC_MONTH_MS as f64;

    Ok(MoonPhaseInfo {
        fraction: (1.0 + inc.cos()) / 2.0,
        phase_angle: angle,
        phase_value: 0.5 + 0.5 * inc * sign / PI,
        cycle_position,
        phase: classify_cycle_position(cycle_position),
        next: next_phases(now_ms)?,
    })
}
