//! # Sun Event Times
//!
//! Rise/set instants for a table of solar elevation bands, plus solar noon
//! and nadir, for one local day.
//!
//! ## Algorithm
//! 1. Take local noon of the requested day and find the nearest Julian cycle
//!    for the observer's longitude.
//! 2. Approximate the solar transit (noon) for that cycle, correcting for the
//!    equation of time.
//! 3. For each band solve `cos(H) = (sin(h0) − sin φ sin δ) / (cos φ cos δ)`
//!    for the hour angle `H` and shift the transit by `H / 2π` days to get the
//!    set; the rise mirrors it about noon.
//!
//! When `|cos H| > 1` the sun never reaches the band's elevation that day.
//! The event is then flagged invalid and its set is pinned to noon + ½ day
//! (rise to noon − ½ day), so consumers always get an instant.
//!
//! ## Extending the table
//! [`SunEventFinder`] owns its band table. New bands (and alias names) can
//! be registered at runtime; names must be identifiers (`[A-Za-z_$]` then
//! `[A-Za-z0-9_$]*`) and must not clash with anything already known.

use chrono::{DateTime, TimeZone, Utc};
use core::f64::consts::PI;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::angles::{self, RAD};
use crate::error::{check_finite, Result};
use crate::solar::{ecliptic_longitude, solar_mean_anomaly};
use crate::time::{self, J2000};
use crate::GeoCoordinate;

/// Name of the synthesized transit event.
pub const SOLAR_NOON: &str = "solarNoon";

/// Name of the synthesized anti-transit event.
pub const NADIR: &str = "nadir";

/// Standard sunrise horizon: refraction plus the sun's semi-diameter.
pub const SUNRISE_ANGLE: f64 = -0.833;

/// Fractional-day correction of the Julian cycle.
const J0: f64 = 0.0009;

/// A pair of events where the sun crosses `angle_degrees` on its way up and
/// down.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationBand {
    pub angle_degrees: f64,
    pub rise_name: String,
    pub set_name: String,
}

impl ElevationBand {
    fn new(angle_degrees: f64, rise_name: &str, set_name: &str) -> Self {
        ElevationBand {
            angle_degrees,
            rise_name: rise_name.to_string(),
            set_name: set_name.to_string(),
        }
    }
}

/// Why a band's events could not be solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Unreachable {
    /// The sun stays above the elevation all day (polar day for sunrise)
    AlwaysAbove,
    /// The sun stays below the elevation all day (polar night for sunrise)
    AlwaysBelow,
}

/// One named threshold crossing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SunTimeEvent {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub julian: f64,
    /// Elevation band, `None` for noon and nadir
    pub elevation_degrees: Option<f64>,
    pub valid: bool,
    /// Set when `valid` is false
    pub unreachable: Option<Unreachable>,
    /// Ordinal position from first dawn (0) to nadir
    pub position: i32,
    /// Original event name when this entry is an alias
    pub alias_of: Option<String>,
}

/// All sun events for one day. Solar noon and nadir are always present;
/// band and alias events are keyed by name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SunTimes {
    solar_noon: SunTimeEvent,
    nadir: SunTimeEvent,
    events: BTreeMap<String, SunTimeEvent>,
}

impl SunTimes {
    pub fn get(&self, name: &str) -> Option<&SunTimeEvent> {
        match name {
            SOLAR_NOON => Some(&self.solar_noon),
            NADIR => Some(&self.nadir),
            _ => self.events.get(name),
        }
    }

    pub fn solar_noon(&self) -> &SunTimeEvent {
        &self.solar_noon
    }

    pub fn nadir(&self) -> &SunTimeEvent {
        &self.nadir
    }

    pub fn len(&self) -> usize {
        self.events.len() + 2
    }

    /// Always false: noon and nadir are always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Noon, nadir, then the remaining events in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SunTimeEvent> {
        [&self.solar_noon, &self.nadir]
            .into_iter()
            .chain(self.events.values())
    }

    /// Events from first dawn through dusk to nadir; aliases are skipped.
    pub fn ordered(&self) -> Vec<&SunTimeEvent> {
        let mut events: Vec<_> = self.iter().filter(|e| e.alias_of.is_none()).collect();
        events.sort_by_key(|e| e.position);
        events
    }

    fn insert(&mut self, event: SunTimeEvent) {
        self.events.insert(event.name.clone(), event);
    }
}

/// Rise and set for a single elevation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiseSet {
    pub rise: SunTimeEvent,
    pub set: SunTimeEvent,
}

/// `^(?![0-9])[A-Za-z0-9_$]+$`
pub fn is_valid_event_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Quantities shared by every band on one day.
struct SolarDay {
    lw: f64,
    phi: f64,
    dec: f64,
    n: f64,
    m: f64,
    l: f64,
    noon: f64,
}

impl SolarDay {
    fn new<Tz: TimeZone>(date: &DateTime<Tz>, coord: GeoCoordinate) -> Self {
        let lw = RAD * -coord.longitude;
        let phi = RAD * coord.latitude;
        let d = time::to_days(time::epoch_millis(&time::local_noon(date)));
        let n = julian_cycle(d, lw);
        let ds = approx_transit(0.0, lw, n);
        let m = solar_mean_anomaly(ds);
        let l = ecliptic_longitude(m);
        let dec = angles::declination(l, 0.0);
        let noon = solar_transit_j(ds, m, l);

        SolarDay {
            lw,
            phi,
            dec,
            n,
            m,
            l,
            noon,
        }
    }

    /// Julian date of the set crossing `h0` (radians), or why there is none.
    fn set_julian(&self, h0: f64) -> std::result::Result<f64, Unreachable> {
        let cos_h =
            (h0.sin() - self.phi.sin() * self.dec.sin()) / (self.phi.cos() * self.dec.cos());
        if cos_h.is_nan() || cos_h > 1.0 {
            return Err(Unreachable::AlwaysBelow);
        }
        if cos_h < -1.0 {
            return Err(Unreachable::AlwaysAbove);
        }
        let w = cos_h.acos();
        Ok(solar_transit_j(approx_transit(w, self.lw, self.n), self.m, self.l))
    }

    /// Rise/set events for one elevation, mirrored about noon.
    fn rise_set(
        &self,
        angle_degrees: f64,
        dip_degrees: f64,
        rise_name: &str,
        set_name: &str,
        positions: (i32, i32),
    ) -> Result<RiseSet> {
        let h0 = (angle_degrees + dip_degrees) * RAD;
        let (set_j, unreachable) = match self.set_julian(h0) {
            Ok(j) => (j, None),
            Err(why) => (self.noon + 0.5, Some(why)),
        };
        let rise_j = self.noon - (set_j - self.noon);

        let event = |name: &str, julian: f64, position: i32| -> Result<SunTimeEvent> {
            Ok(SunTimeEvent {
                name: name.to_string(),
                timestamp: time::to_datetime(time::from_julian(julian))?,
                julian,
                elevation_degrees: Some(angle_degrees),
                valid: unreachable.is_none(),
                unreachable,
                position,
                alias_of: None,
            })
        };

        Ok(RiseSet {
            rise: event(rise_name, rise_j, positions.0)?,
            set: event(set_name, set_j, positions.1)?,
        })
    }
}

fn julian_cycle(d: f64, lw: f64) -> f64 {
    (d - J0 - lw / (2.0 * PI)).round()
}

fn approx_transit(ht: f64, lw: f64, n: f64) -> f64 {
    J0 + (ht + lw) / (2.0 * PI) + n
}

fn solar_transit_j(ds: f64, m: f64, l: f64) -> f64 {
    J2000 + ds + 0.0053 * m.sin() - 0.0069 * (2.0 * l).sin()
}

/// Computes sun events against an owned, extensible table of elevation
/// bands.
#[derive(Debug, Clone)]
pub struct SunEventFinder {
    bands: Vec<ElevationBand>,
    /// `(alias, original)` pairs
    aliases: Vec<(String, String)>,
}

impl Default for SunEventFinder {
    fn default() -> Self {
        let bands = vec![
            ElevationBand::new(6.0, "goldenHourDawnEnd", "goldenHourDuskStart"),
            ElevationBand::new(-0.3, "sunriseEnd", "sunsetStart"),
            ElevationBand::new(SUNRISE_ANGLE, "sunriseStart", "sunsetEnd"),
            ElevationBand::new(-1.0, "goldenHourDawnStart", "goldenHourDuskEnd"),
            ElevationBand::new(-4.0, "blueHourDawnEnd", "blueHourDuskStart"),
            ElevationBand::new(-6.0, "civilDawn", "civilDusk"),
            ElevationBand::new(-8.0, "blueHourDawnStart", "blueHourDuskEnd"),
            ElevationBand::new(-12.0, "nauticalDawn", "nauticalDusk"),
            ElevationBand::new(-15.0, "amateurDawn", "amateurDusk"),
            ElevationBand::new(-18.0, "astronomicalDawn", "astronomicalDusk"),
        ];
        let aliases = [
            ("dawn", "civilDawn"),
            ("dusk", "civilDusk"),
            ("nightEnd", "astronomicalDawn"),
            ("night", "astronomicalDusk"),
            ("nightStart", "astronomicalDusk"),
            ("goldenHour", "goldenHourDuskStart"),
            ("sunrise", "sunriseStart"),
            ("sunset", "sunsetEnd"),
            ("goldenHourEnd", "goldenHourDawnEnd"),
            ("goldenHourStart", "goldenHourDuskStart"),
        ]
        .iter()
        .map(|(alias, original)| (alias.to_string(), original.to_string()))
        .collect();

        SunEventFinder { bands, aliases }
    }
}

impl SunEventFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finder with no bands or aliases; only noon and nadir are produced.
    pub fn empty() -> Self {
        SunEventFinder {
            bands: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn bands(&self) -> &[ElevationBand] {
        &self.bands
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, o)| (a.as_str(), o.as_str()))
    }

    fn is_band_name(&self, name: &str) -> bool {
        name == SOLAR_NOON
            || name == NADIR
            || self
                .bands
                .iter()
                .any(|b| b.rise_name == name || b.set_name == name)
    }

    /// Add an elevation band under two new event names.
    ///
    /// Returns `false`, leaving the table untouched, if either name is not a
    /// valid identifier, the names are equal, either collides with an
    /// existing event, or the angle is not finite. Aliases sharing a new
    /// name are dropped in favour of the band.
    pub fn register_band(&mut self, angle_degrees: f64, rise_name: &str, set_name: &str) -> bool {
        let accepted = angle_degrees.is_finite()
            && rise_name != set_name
            && [rise_name, set_name]
                .iter()
                .all(|name| is_valid_event_name(name) && !self.is_band_name(name));
        if !accepted {
            return false;
        }

        self.bands
            .push(ElevationBand::new(angle_degrees, rise_name, set_name));
        self.aliases
            .retain(|(alias, _)| alias != rise_name && alias != set_name);
        true
    }

    /// Add an alternative name for an existing event.
    ///
    /// Returns `false` if the alias is not a valid identifier, collides with
    /// an event or alias, or the original is unknown.
    pub fn register_alias(&mut self, alias: &str, original: &str) -> bool {
        let accepted = is_valid_event_name(alias)
            && !self.is_band_name(alias)
            && !self.aliases.iter().any(|(a, _)| a == alias)
            && self.is_band_name(original);
        if accepted {
            self.aliases.push((alias.to_string(), original.to_string()));
        }
        accepted
    }

    /// Sun events for the local day of `date`.
    ///
    /// `observer_height_m` lowers every band by the horizon dip seen from
    /// that height.
    ///
    /// # Errors
    /// `InvalidArgument` for a non-finite coordinate or height.
    pub fn sun_events<Tz: TimeZone>(
        &self,
        date: &DateTime<Tz>,
        coord: GeoCoordinate,
        observer_height_m: f64,
    ) -> Result<SunTimes> {
        let coord = coord.validate()?;
        let dip = angles::observer_dip(check_finite("observer height", observer_height_m)?);
        let day = SolarDay::new(date, coord);
        let len = self.bands.len() as i32;

        let fixed = |julian: f64, name: &str, position: i32| -> Result<SunTimeEvent> {
            Ok(SunTimeEvent {
                name: name.to_string(),
                timestamp: time::to_datetime(time::from_julian(julian))?,
                julian,
                elevation_degrees: None,
                valid: true,
                unreachable: None,
                position,
                alias_of: None,
            })
        };
        let mut times = SunTimes {
            solar_noon: fixed(day.noon, SOLAR_NOON, len)?,
            nadir: fixed(day.noon + 0.5, NADIR, len * 2 + 1)?,
            events: BTreeMap::new(),
        };

        for (i, band) in self.bands.iter().enumerate() {
            let i = i as i32;
            let pair = day.rise_set(
                band.angle_degrees,
                dip,
                &band.rise_name,
                &band.set_name,
                (len - i - 1, len + i + 1),
            )?;
            times.insert(pair.rise);
            times.insert(pair.set);
        }

        Ok(times)
    }

    /// Like [`sun_events`](Self::sun_events) with every alias included as a
    /// copy of its original, marked through `alias_of`.
    pub fn sun_events_with_aliases<Tz: TimeZone>(
        &self,
        date: &DateTime<Tz>,
        coord: GeoCoordinate,
        observer_height_m: f64,
    ) -> Result<SunTimes> {
        let mut times = self.sun_events(date, coord, observer_height_m)?;
        for (alias, original) in &self.aliases {
            if let Some(event) = times.get(original).cloned() {
                times.insert(SunTimeEvent {
                    name: alias.clone(),
                    alias_of: Some(original.clone()),
                    ..event
                });
            }
        }
        Ok(times)
    }
}

/// Rise and set for one arbitrary elevation, measured from the standard
/// sunrise horizon (so `0.0` gives ordinary sunrise and sunset).
pub fn sun_time_at<Tz: TimeZone>(
    date: &DateTime<Tz>,
    coord: GeoCoordinate,
    elevation_degrees: f64,
    observer_height_m: f64,
) -> Result<RiseSet> {
    let coord = coord.validate()?;
    let elevation = check_finite("elevation angle", elevation_degrees)?;
    let dip = angles::observer_dip(check_finite("observer height", observer_height_m)?);
    let day = SolarDay::new(date, coord);
    day.rise_set(elevation + SUNRISE_ANGLE, dip, "rise", "set", (1, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone, Timelike, Utc};

    fn london() -> GeoCoordinate {
        GeoCoordinate::new(51.5, -0.12).unwrap()
    }

    fn solstice() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_default_table_produces_all_events() {
        let finder = SunEventFinder::default();
        let times = finder.sun_events(&solstice(), london(), 0.0).unwrap();
        assert_eq!(times.len(), finder.bands().len() * 2 + 2);
        for name in ["sunriseStart", "sunsetEnd", "civilDawn", "nauticalDusk", SOLAR_NOON, NADIR] {
            assert!(times.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_london_solstice_times() {
        let times = SunEventFinder::default()
            .sun_events(&solstice(), london(), 0.0)
            .unwrap();
        let sunrise = &times.get("sunriseStart").unwrap().timestamp;
        let sunset = &times.get("sunsetEnd").unwrap().timestamp;
        let noon = &times.solar_noon().timestamp;
        let minutes = |t: &DateTime<Utc>| t.hour() * 60 + t.minute();
        // 04:43 and 21:21 BST
        assert!((3 * 60 + 38..=3 * 60 + 48).contains(&minutes(sunrise)));
        assert!((20 * 60 + 16..=20 * 60 + 26).contains(&minutes(sunset)));
        assert_eq!(noon.hour(), 12);
    }

    #[test]
    fn test_symmetry_about_noon() {
        let times = SunEventFinder::default()
            .sun_events(&solstice(), london(), 0.0)
            .unwrap();
        let noon = times.solar_noon().julian;
        for band in SunEventFinder::default().bands() {
            let rise = times.get(&band.rise_name).unwrap();
            let set = times.get(&band.set_name).unwrap();
            assert!(((noon - rise.julian) - (set.julian - noon)).abs() < 1e-9);
            if rise.valid {
                assert!(rise.timestamp < times.solar_noon().timestamp);
                assert!(set.timestamp > times.solar_noon().timestamp);
            }
        }
        assert_eq!(times.nadir().julian, noon + 0.5);
    }

    #[test]
    fn test_polar_day_fallback() {
        // Tromsø in June never sees astronomical darkness nor sunset
        let tromso = GeoCoordinate::new(69.65, 18.96).unwrap();
        let times = SunEventFinder::default()
            .sun_events(&solstice(), tromso, 0.0)
            .unwrap();
        let noon = times.solar_noon();
        let sunset = times.get("sunsetEnd").unwrap();
        assert!(!sunset.valid);
        assert_eq!(sunset.unreachable, Some(Unreachable::AlwaysAbove));
        assert_eq!(sunset.julian, noon.julian + 0.5);
        let half_day = sunset.timestamp - noon.timestamp - Duration::hours(12);
        assert!(half_day.num_milliseconds().abs() <= 1);
        // Noon and nadir are always valid
        assert!(noon.valid && times.nadir().valid);
    }

    #[test]
    fn test_polar_night_is_always_below() {
        let tromso = GeoCoordinate::new(69.65, 18.96).unwrap();
        let december = Utc.with_ymd_and_hms(2024, 12, 21, 9, 0, 0).unwrap();
        let times = SunEventFinder::default()
            .sun_events(&december, tromso, 0.0)
            .unwrap();
        let sunrise = times.get("sunriseStart").unwrap();
        assert!(!sunrise.valid);
        assert_eq!(sunrise.unreachable, Some(Unreachable::AlwaysBelow));
        // Civil twilight still happens
        assert!(times.get("civilDawn").unwrap().valid);
    }

    #[test]
    fn test_positions_run_dawn_to_nadir() {
        let finder = SunEventFinder::default();
        let times = finder.sun_events(&solstice(), london(), 0.0).unwrap();
        let ordered = times.ordered();
        let n = finder.bands().len() as i32;
        assert_eq!(ordered.first().unwrap().name, "astronomicalDawn");
        assert_eq!(ordered.last().unwrap().name, NADIR);
        assert_eq!(times.solar_noon().position, n);
        assert_eq!(times.nadir().position, 2 * n + 1);
        let positions: Vec<i32> = ordered.iter().map(|e| e.position).collect();
        let expected: Vec<i32> = (0..n).chain(n..=2 * n).chain([2 * n + 1]).collect();
        assert_eq!(positions, expected);
    }

    #[test]
    fn test_register_band_round_trip() {
        let mut finder = SunEventFinder::default();
        assert!(finder.register_band(3.0, "photoDawn", "photoDusk"));
        assert!(!finder.register_band(3.0, "photoDawn", "photoDusk"));
        assert!(!finder.register_band(2.0, "other", "photoDusk"));

        let times = finder.sun_events(&solstice(), london(), 0.0).unwrap();
        let dawn = times.get("photoDawn").unwrap();
        let dusk = times.get("photoDusk").unwrap();
        assert_eq!(dawn.elevation_degrees, Some(3.0));
        assert!(dawn.valid && dusk.valid);
        assert!(dawn.timestamp < dusk.timestamp);
    }

    #[test]
    fn test_register_band_rejects_bad_names() {
        let mut finder = SunEventFinder::default();
        assert!(!finder.register_band(1.0, "9lives", "fine"));
        assert!(!finder.register_band(1.0, "has space", "fine"));
        assert!(!finder.register_band(1.0, "", "fine"));
        assert!(!finder.register_band(1.0, "same", "same"));
        assert!(!finder.register_band(1.0, "sunriseStart", "fresh"));
        assert!(!finder.register_band(1.0, SOLAR_NOON, "fresh"));
        assert!(!finder.register_band(f64::NAN, "a", "b"));
        assert!(finder.register_band(1.0, "$dollar", "_under9"));
    }

    #[test]
    fn test_event_name_grammar() {
        assert!(is_valid_event_name("civilDawn"));
        assert!(is_valid_event_name("_x1"));
        assert!(is_valid_event_name("$"));
        assert!(!is_valid_event_name("1abc"));
        assert!(!is_valid_event_name("a-b"));
        assert!(!is_valid_event_name("ünïcode"));
    }

    #[test]
    fn test_aliases() {
        let mut finder = SunEventFinder::default();
        let times = finder
            .sun_events_with_aliases(&solstice(), london(), 0.0)
            .unwrap();
        let dawn = times.get("dawn").unwrap();
        assert_eq!(dawn.alias_of.as_deref(), Some("civilDawn"));
        assert_eq!(dawn.timestamp, times.get("civilDawn").unwrap().timestamp);
        assert!(times.ordered().iter().all(|e| e.alias_of.is_none()));

        // Plain output has no aliases
        let plain = finder.sun_events(&solstice(), london(), 0.0).unwrap();
        assert!(plain.get("dawn").is_none());

        assert!(finder.register_alias("firstLight", "astronomicalDawn"));
        assert!(!finder.register_alias("firstLight", "astronomicalDawn"));
        assert!(!finder.register_alias("ghost", "noSuchEvent"));
        assert!(!finder.register_alias("civilDusk", "civilDawn"));

        // A band claiming an alias name replaces the alias
        assert!(finder.register_band(-3.0, "dawn", "lateDusk"));
        assert!(finder.aliases().all(|(alias, _)| alias != "dawn"));
    }

    #[test]
    fn test_observer_height_widens_day() {
        let finder = SunEventFinder::default();
        let ground = finder.sun_events(&solstice(), london(), 0.0).unwrap();
        let tower = finder.sun_events(&solstice(), london(), 300.0).unwrap();
        let rise = |t: &SunTimes| t.get("sunriseStart").unwrap().timestamp;
        assert!(rise(&tower) < rise(&ground));
        assert!(finder.sun_events(&solstice(), london(), f64::NAN).is_err());
    }

    #[test]
    fn test_day_follows_callers_zone() {
        // 23:30 on the 20th in UTC-10 is already the 21st in UTC
        let hawaii = FixedOffset::west_opt(10 * 3600).unwrap();
        let late = hawaii.with_ymd_and_hms(2024, 6, 20, 23, 30, 0).unwrap();
        let honolulu = GeoCoordinate::new(21.3, -157.86).unwrap();
        let times = SunEventFinder::default()
            .sun_events(&late, honolulu, 0.0)
            .unwrap();
        let noon = times.solar_noon().timestamp.with_timezone(&hawaii);
        assert_eq!(noon.date_naive(), late.date_naive());
    }

    #[test]
    fn test_sun_time_at_zero_matches_sunrise() {
        let single = sun_time_at(&solstice(), london(), 0.0, 0.0).unwrap();
        let times = SunEventFinder::default()
            .sun_events(&solstice(), london(), 0.0)
            .unwrap();
        let (sunrise, sunset) = (times.get("sunriseStart"), times.get("sunsetEnd"));
        assert_eq!(single.rise.timestamp, sunrise.unwrap().timestamp);
        assert_eq!(single.set.timestamp, sunset.unwrap().timestamp);
        let overhead = sun_time_at(&solstice(), london(), 80.0, 0.0).unwrap();
        assert!(!overhead.rise.valid);
        assert!(sun_time_at(&solstice(), london(), f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_empty_finder_only_noon_and_nadir() {
        let times = SunEventFinder::empty()
            .sun_events(&solstice(), london(), 0.0)
            .unwrap();
        assert_eq!(times.len(), 2);
        assert_eq!(times.solar_noon().position, 0);
        assert_eq!(times.nadir().position, 1);
    }
}
