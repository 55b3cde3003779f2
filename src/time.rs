//! # Time base
//!
//! Conversions between UTC calendar timestamps and the continuous Julian-date scale used by
//! the propagator, elapsed time since an element-set epoch, and Greenwich mean sidereal time.
//!
//! Calendar arithmetic (leap years, month lengths) is delegated to [`hifitime`]. Leap seconds
//! are not modelled: a calendar timestamp maps to the UTC day count, so consecutive calendar
//! seconds are always exactly `1 / 86400` day apart.

use std::fmt;

use hifitime::Epoch;

use crate::constants::{DPI, JD, JDTOMJD, MINUTES_PER_DAY, MJD, T2000};
use crate::tracker_errors::TrackerError;

/// A UTC calendar timestamp with microsecond resolution.
///
/// Fields are plain calendar values: `month` is 1-based, `hour` is in `[0, 24]`, `24` being
/// only reachable by a [`SimulatedClock`](crate::tracker::SimulatedClock) that has finished
/// its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarTimestamp {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub microsecond: u32,
}

impl CalendarTimestamp {
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        CalendarTimestamp {
            year,
            month,
            day,
            hour,
            minute,
            second,
            microsecond: 0,
        }
    }

    /// Midnight UTC of the given calendar date.
    pub fn midnight_of(year: i32, month: u8, day: u8) -> Self {
        CalendarTimestamp::new(year, month, day, 0, 0, 0)
    }

    /// Read the wall clock.
    ///
    /// Return
    /// ----------
    /// * The current UTC calendar timestamp, or [`TrackerError::Clock`] if the system time is
    ///   not available.
    pub fn now() -> Result<Self, TrackerError> {
        let epoch = Epoch::now().map_err(|e| TrackerError::Clock(e.to_string()))?;
        Ok(CalendarTimestamp::from_epoch(&epoch))
    }

    /// Build a calendar timestamp from a [`hifitime::Epoch`], truncated to the microsecond.
    pub fn from_epoch(epoch: &Epoch) -> Self {
        let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
        CalendarTimestamp {
            year,
            month,
            day,
            hour,
            minute,
            second,
            microsecond: nanos / 1_000,
        }
    }

    /// Convert to a [`hifitime::Epoch`] on the UTC scale.
    pub fn to_epoch(&self) -> Epoch {
        Epoch::from_gregorian_utc(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.microsecond * 1_000,
        )
    }

    /// `HH:MM:SS` rendering of the time of day.
    pub fn time_of_day(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl fmt::Display for CalendarTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04} UTC: {}",
            self.day,
            self.month,
            self.year,
            self.time_of_day()
        )
    }
}

/// Map a UTC calendar timestamp onto the continuous Julian-date scale.
///
/// Arguments
/// ---------
/// * `timestamp`: calendar date and time of day (UTC), hour in `[0, 24)`
///
/// Return
/// ------
/// * Julian date (days), sub-second precision, strictly increasing with the timestamp
pub fn continuous_time(timestamp: &CalendarTimestamp) -> JD {
    timestamp.to_epoch().to_jde_utc_days()
}

/// Julian date of an element-set epoch given as a year and a fractional day-of-year.
///
/// Day-of-year `1.0` is January 1st at 0h, so the year origin is "January 0.0".
///
/// Arguments
/// ---------
/// * `year`: four-digit year of the epoch
/// * `day_of_year`: fractional day of the year (e.g. `290.5` for the 290th day at noon)
///
/// Return
/// ------
/// * Julian date of the epoch
pub fn julian_date_of_epoch(year: i32, day_of_year: f64) -> JD {
    let jan_first = Epoch::from_gregorian_utc_at_midnight(year, 1, 1).to_jde_utc_days();
    jan_first - 1.0 + day_of_year
}

/// Signed time elapsed since an element-set epoch, in minutes.
///
/// Arguments
/// ---------
/// * `jd`: Julian date of the evaluated instant
/// * `epoch_jd`: Julian date of the element-set epoch
///
/// Return
/// ------
/// * `(jd − epoch_jd)` converted from days to minutes, negative before the epoch
pub fn elapsed_minutes(jd: JD, epoch_jd: JD) -> f64 {
    (jd - epoch_jd) * MINUTES_PER_DAY
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # Details
/// The GMST is computed in two steps:
/// 1. Use a cubic polynomial (coefficients C0–C3) to get GMST at 0h UT1
///    in seconds for the given date.
/// 2. Add the contribution of Earth's rotation during the fractional day
///    using the factor `RAP`, which converts solar days to sidereal days.
///
/// # References
/// * IAU 1982, Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    // Extract the integer MJD (0h UT1) and compute centuries since J2000.0
    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // Step 1: GMST at 0h UT1
    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / 86400.0;

    // Step 2: add the rotation accumulated during the current day
    let h = tjm.fract() * DPI;
    let gmst = gmst0 + h * RAP;

    gmst.rem_euclid(DPI)
}

/// Greenwich mean sidereal time for a Julian date, UTC taken as UT1.
pub fn theta_g_jd(jd: JD) -> f64 {
    gmst(jd - JDTOMJD)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_continuous_time_known_dates() {
        let j2000_noon = CalendarTimestamp::new(2000, 1, 1, 12, 0, 0);
        assert_relative_eq!(continuous_time(&j2000_noon), 2451545.0, epsilon = 1e-9);

        let new_year = CalendarTimestamp::midnight_of(2021, 1, 1);
        assert_relative_eq!(continuous_time(&new_year), 2459215.5, epsilon = 1e-9);
    }

    #[test]
    fn test_continuous_time_leap_day() {
        let feb_28 = CalendarTimestamp::midnight_of(2024, 2, 28);
        let feb_29 = CalendarTimestamp::midnight_of(2024, 2, 29);
        let mar_1 = CalendarTimestamp::midnight_of(2024, 3, 1);
        assert_relative_eq!(
            continuous_time(&feb_29) - continuous_time(&feb_28),
            1.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            continuous_time(&mar_1) - continuous_time(&feb_29),
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_continuous_time_monotonic_within_day() {
        let mut previous = continuous_time(&CalendarTimestamp::midnight_of(2024, 10, 16));
        for second in 1..60u8 {
            let t = CalendarTimestamp::new(2024, 10, 16, 0, 0, second);
            let jd = continuous_time(&t);
            assert!(jd > previous, "JD must increase at second {second}");
            previous = jd;
        }

        let last = CalendarTimestamp::new(2024, 10, 16, 23, 59, 59);
        assert!(continuous_time(&last) > previous);
    }

    #[test]
    fn test_continuous_time_sub_second() {
        let mut t = CalendarTimestamp::new(2024, 10, 16, 6, 30, 15);
        let whole = continuous_time(&t);
        t.microsecond = 500_000;
        assert_relative_eq!(
            (continuous_time(&t) - whole) * 86_400.0,
            0.5,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_julian_date_of_epoch() {
        // Day 1.0 is January 1st at midnight
        assert_relative_eq!(julian_date_of_epoch(2021, 1.0), 2459215.5, epsilon = 1e-9);
        // Day 1.5 of 2000 is J2000.0
        assert_relative_eq!(julian_date_of_epoch(2000, 1.5), 2451545.0, epsilon = 1e-9);
    }

    #[test]
    fn test_elapsed_minutes() {
        assert_eq!(elapsed_minutes(2451546.0, 2451545.0), 1440.0);
        assert_eq!(elapsed_minutes(2451545.0, 2451546.0), -1440.0);
        assert_relative_eq!(
            elapsed_minutes(2451545.0 + 1.0 / 1440.0, 2451545.0),
            1.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        let res_gmst = gmst(tut);
        assert_relative_eq!(res_gmst, 4.851925725092499, epsilon = 1e-12);

        let tut = T2000;
        let res_gmst = gmst(tut);
        assert_relative_eq!(res_gmst, 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_theta_g_jd_matches_mjd_form() {
        let jd = 2459215.5 + 0.25;
        assert_relative_eq!(theta_g_jd(jd), gmst(jd - JDTOMJD), epsilon = 1e-15);
        assert!((0.0..DPI).contains(&theta_g_jd(jd)));
    }

    #[test]
    fn test_display() {
        let t = CalendarTimestamp::new(2024, 10, 6, 7, 5, 9);
        assert_eq!(t.to_string(), "06/10/2024 UTC: 07:05:09");
        assert_eq!(t.time_of_day(), "07:05:09");
    }
}
