//! # Time Scales
//!
//! The engine works on `f64` milliseconds since the Unix epoch and converts
//! to days since J2000 (or full Julian dates) for the trigonometry. Local day
//! boundaries are always taken in the caller's time zone.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike, Utc};

use crate::error::{EphemerisError, Result};

/// Milliseconds in a day.
pub const DAY_MS: f64 = 86_400_000.0;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Julian date of the Unix epoch.
pub const J1970: f64 = 2_440_587.5;

/// Julian date of J2000.0.
pub const J2000: f64 = 2_451_545.0;

/// Unix milliseconds of any `DateTime`.
pub fn epoch_millis<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    instant.timestamp_millis() as f64
}

/// Days since J2000 for a Unix millisecond value.
pub fn to_days(ms: f64) -> f64 {
    ms / DAY_MS + J1970 - J2000
}

/// Unix milliseconds for a Julian date.
pub fn from_julian(j: f64) -> f64 {
    (j - J1970) * DAY_MS
}

/// `ms` shifted by a fractional number of hours.
pub fn hours_later(ms: f64, hours: f64) -> f64 {
    ms + hours * DAY_MS / 24.0
}

/// Convert engine milliseconds back to a UTC `DateTime`, rounding to the
/// nearest millisecond.
pub fn to_datetime(ms: f64) -> Result<DateTime<Utc>> {
    if !ms.is_finite() || ms.abs() > i64::MAX as f64 {
        return Err(EphemerisError::TimestampOutOfRange(ms));
    }
    DateTime::from_timestamp_millis(ms.round() as i64)
        .ok_or(EphemerisError::TimestampOutOfRange(ms))
}

/// Time elapsed since local midnight of the instant's own day.
///
/// This is real elapsed time, so on a DST-change day it differs from the
/// wall-clock reading by the size of the shift.
pub fn since_local_midnight<Tz: TimeZone>(instant: &DateTime<Tz>) -> Duration {
    instant.clone() - local_midnight(instant)
}

/// Start of the instant's local calendar day, in the same zone.
///
/// An ambiguous 00:00 resolves to its earlier occurrence. When 00:00 falls
/// in a DST gap the day starts at the first local time that exists.
pub fn local_midnight<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = instant.timezone();
    let day_start = instant.date_naive().and_time(NaiveTime::MIN);
    (0..MINUTES_PER_DAY)
        .map(|m| day_start + Duration::minutes(m))
        .find_map(|wall| tz.from_local_datetime(&wall).earliest())
        .unwrap_or_else(|| {
            let wall_clock = Duration::seconds(i64::from(instant.num_seconds_from_midnight()))
                + Duration::nanoseconds(i64::from(instant.nanosecond()));
            instant.clone() - wall_clock
        })
}

/// Local noon of the instant's day, in the same zone.
pub fn local_noon<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Tz> {
    instant
        .date_naive()
        .and_hms_opt(12, 0, 0)
        .and_then(|noon| instant.timezone().from_local_datetime(&noon).earliest())
        .unwrap_or_else(|| local_midnight(instant) + Duration::hours(12))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_j2000_epoch() {
        // 2000-01-01T12:00:00Z is day zero
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!(to_days(epoch_millis(&j2000)).abs() < 1e-12);
        assert!((from_julian(J2000) - epoch_millis(&j2000)).abs() < 1e-3);
    }

    #[test]
    fn test_to_datetime_rejects_nan() {
        assert!(to_datetime(f64::NAN).is_err());
        assert!(to_datetime(f64::INFINITY).is_err());
        let t = to_datetime(1_718_971_200_000.4).unwrap();
        assert_eq!(t.timestamp_millis(), 1_718_971_200_000);
    }

    #[test]
    fn test_local_midnight_keeps_zone() {
        let tz = FixedOffset::east_opt(10 * 3600).unwrap();
        let t = tz.with_ymd_and_hms(2024, 6, 21, 7, 45, 30).unwrap();
        let on_the_day = |hour| tz.with_ymd_and_hms(2024, 6, 21, hour, 0, 0).unwrap();
        assert_eq!(local_midnight(&t), on_the_day(0));
        assert_eq!(local_noon(&t), on_the_day(12));
        let elapsed = Duration::seconds(7 * 3600 + 45 * 60 + 30);
        assert_eq!(since_local_midnight(&t), elapsed);
    }

    #[test]
    fn test_local_midnight_on_dst_changes() {
        use chrono_tz::Europe::London;

        // Clocks go forward at 01:00 GMT; midnight is still GMT
        let spring = London.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let midnight = local_midnight(&spring);
        assert_eq!(
            midnight,
            London.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap()
        );
        assert_eq!(
            midnight.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap()
        );
        assert_eq!(since_local_midnight(&spring), Duration::hours(11));
        assert_eq!(local_noon(&spring).with_timezone(&Utc).hour(), 11);

        // Clocks go back at 02:00 BST; midnight is still BST
        let autumn = London.with_ymd_and_hms(2024, 10, 27, 12, 0, 0).unwrap();
        let midnight = local_midnight(&autumn);
        assert_eq!(
            midnight.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 10, 26, 23, 0, 0).unwrap()
        );
        assert_eq!(midnight.date_naive(), autumn.date_naive());
        assert_eq!(since_local_midnight(&autumn), Duration::hours(13));
    }

    #[test]
    fn test_local_midnight_in_a_gap() {
        use chrono_tz::America::Santiago;

        // Chile springs forward at 00:00, so the day starts at 01:00
        let t = Santiago.with_ymd_and_hms(2024, 9, 8, 12, 0, 0).unwrap();
        let midnight = local_midnight(&t);
        assert_eq!(midnight.date_naive(), t.date_naive());
        assert_eq!((midnight.hour(), midnight.minute()), (1, 0));
        assert_eq!(since_local_midnight(&t), Duration::hours(11));
    }

    #[test]
    fn test_hours_later() {
        assert_eq!(hours_later(0.0, 24.0), DAY_MS);
        assert_eq!(hours_later(1000.0, -0.5), 1000.0 - 1_800_000.0);
    }
}
