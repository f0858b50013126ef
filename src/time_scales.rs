//! Deals with different time scales, specifically, conversion from TT into
//! UT.
//!
//! Only conversions necessary for other computations in this crate are
//! included.

use crate::date::Date;

/// Julian date of J2000.0 (2000-01-01T12:00 TT).
pub const J2000: f64 = 2451545.0;

/// [Terristrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian date (JD).
///
/// The astronomical series in this crate are evaluated in this time scale,
/// which should be converted to UT when calculating dates.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

impl Tt {
    /// Julian centuries since J2000.0.
    pub fn centuries(&self) -> f64 {
        (self.0 - J2000) / 36525.0
    }
}

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time), the actual
/// civil time used for determining the actual date at a given time point,
/// represented in Julian date (JD).
///
/// The difference to UTC (under one second) is irrelevant for calendar
/// calculation and is ignored.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Ut {
    /// Converts a TT into UT, i.e. subtracts ΔT.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::time_scales::{Tt, Ut};
    /// let tt = Tt(2451543.166666667);
    /// let ut = Ut::from_tt(tt);
    /// assert_eq!((1999, 12, 30), ut.date_in_timezone(0).gregorian());
    /// ```
    pub fn from_tt(tt: Tt) -> Self {
        Ut(tt.0 - delta_t(tt) / 86400.0)
    }
    /// Returns the date at the time point in timezone ahead (east) of UTC by
    /// `tz_offset_minutes`minutes.
    ///
    /// For Beijing time (UTC+8), `tz_offset_minutes` should be +480.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::time_scales::Ut;
    /// let ut = Ut(2451543.3); // 1999-12-30T19:12Z
    /// assert_eq!((1999, 12, 30), ut.date_in_timezone(0).gregorian());
    /// assert_eq!((1999, 12, 31), ut.date_in_timezone(480).gregorian());
    /// ```
    pub fn date_in_timezone(&self, tz_offset_minutes: i32) -> Date {
        let jdn = (self.0 + tz_offset_minutes as f64 / 1440.0).round() as u32;
        Date::from_jdn(jdn)
    }
}

/// ΔT = TT - UT in seconds, after the polynomial expressions of Espenak and
/// Meeus.
pub fn delta_t(tt: Tt) -> f64 {
    let y = 2000.0 + (tt.0 - 2451544.5) / 365.2425;
    match y {
        y if y < 1900.0 => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u
        }
        y if y < 1920.0 => {
            let t = y - 1900.0;
            -2.79 + t * (1.494119 + t * (-0.0598939 + t * (0.0061966 - 0.000197 * t)))
        }
        y if y < 1941.0 => {
            let t = y - 1920.0;
            21.20 + t * (0.84493 + t * (-0.076100 + 0.0020936 * t))
        }
        y if y < 1961.0 => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t * t / 233.0 + t * t * t / 2547.0
        }
        y if y < 1986.0 => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t * t / 260.0 - t * t * t / 718.0
        }
        y if y < 2005.0 => {
            let t = y - 2000.0;
            63.86
                + t * (0.3345
                    + t * (-0.060374 + t * (0.0017275 + t * (0.000651814 + 0.00002373599 * t))))
        }
        y if y < 2050.0 => {
            let t = y - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t * t
        }
        y if y < 2150.0 => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
        }
        y => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u
        }
    }
}
