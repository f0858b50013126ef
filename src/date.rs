//! Calendar-independant date.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Julian day number of 1970-01-01, the Unix epoch.
const UNIX_EPOCH_JDN: i64 = 2440588;

/// A calendar-independant date.
///
/// Supported range begins from January 1, 4713 BC, proleptic Julian calendar.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Date {
    jdn: u32,
}

impl Date {
    /// Creates a `Date` with a Julian day number (JDN).
    pub fn from_jdn(jdn: u32) -> Self {
        Self { jdn }
    }
    /// Returns the Julian day number (JDN) of the date.
    pub fn jdn(&self) -> u32 {
        self.jdn
    }

    /// Creates a `Date` with a Gregorian calendar date.
    ///
    /// `year` should be an astronomical year number, i.e. 1 BC is `0`, 2
    /// BC is `-1`, etc.
    ///
    /// Returns `None` if the month or day does not exist, or if the result
    /// date is out of supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(2451545, date.jdn());
    /// assert_eq!(None, Date::from_gregorian(2023, 2, 29));
    /// ```
    pub fn from_gregorian(year: i32, month: i32, day: i32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        if day < 1 || day > YearType::from_gregorian(year).days_in_month(month) {
            return None;
        }
        u32::try_from(jdn_from_gregorian(year, month, day))
            .map(Self::from_jdn)
            .ok()
    }
    /// Represents the date in Gregorian calendar.
    ///
    /// Returns in `(year, month, day)` format.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_jdn(2451545);
    /// assert_eq!((2000, 1, 1), date.gregorian());
    /// ```
    pub fn gregorian(&self) -> (i32, i32, i32) {
        let jdn = self.jdn as i64;
        let f = jdn + 1401 + (((4 * jdn + 274277) / 146097) * 3) / 4 - 38;
        let e = 4 * f + 3;
        let g = (e % 1461) / 4;
        let h = 5 * g + 2;
        let day = (h % 153) / 5 + 1;
        let month = (h / 153 + 2) % 12 + 1;
        let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
        (year as i32, month as i32, day as i32)
    }
    /// Formats the date in ISO 8601 format.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!("2000-01-01", date.iso_gregorian());
    /// ```
    pub fn iso_gregorian(&self) -> String {
        let (y, m, d) = self.gregorian();
        format!("{:04}-{:02}-{:02}", y, m, d)
    }

    /// Returns the number of days since 1970-01-01, negative before it.
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// assert_eq!(10957, Date::from_gregorian(2000, 1, 1).unwrap().unix_days());
    /// ```
    pub fn unix_days(&self) -> i64 {
        self.jdn as i64 - UNIX_EPOCH_JDN
    }

    /// Returns the day of week of the date, in ISO-8601 numbering (i.e.
    /// `1..=7` for Monday through Sunday)
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(6, date.day_of_week()); // Saturday
    /// ```
    pub fn day_of_week(&self) -> i32 {
        (self.jdn % 7 + 1) as i32
    }
    /// Returns the Chinese sexagenary day number of the date, numbered from 1
    /// (甲子) to 60 (癸亥).
    ///
    /// # Example
    ///
    /// ```
    /// use sizhu::Date;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// assert_eq!(55, date.sexagenary()); // 戊午
    /// ```
    pub fn sexagenary(&self) -> i32 {
        ((self.jdn + 49) % 60 + 1) as i32
    }
}

/// Parses `YYYY-M-D`, also with `/` or `.` as separator. Anything after the
/// first whitespace or `T` (a time of day) is ignored.
///
/// ```
/// use sizhu::Date;
///
/// let date: Date = "2023/7/4 03:30".parse().unwrap();
/// assert_eq!((2023, 7, 4), date.gregorian());
/// ```
impl FromStr for Date {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let (year, month, day) = split_ymd(s)?;
        Date::from_gregorian(year, month, day).ok_or(Error::InvalidDate { year, month, day })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso_gregorian())
    }
}

impl Add<i32> for Date {
    type Output = Date;
    fn add(self, rhs: i32) -> Self::Output {
        Date::from_jdn(if rhs >= 0 {
            self.jdn + rhs as u32
        } else {
            self.jdn - rhs.wrapping_neg() as u32
        })
    }
}
impl Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> Self::Output {
        self.jdn as i32 - rhs.jdn as i32
    }
}

/// Indicates whether a year is a leap year or common year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum YearType {
    Common,
    Leap,
}

impl YearType {
    /// Determines if `year` is a leap year in Gregorian calendar.
    pub fn from_gregorian(year: i32) -> Self {
        if year % 4 == 0 && year % 100 != 0 || year % 400 == 0 {
            Self::Leap
        } else {
            Self::Common
        }
    }
    /// Returns `true` if `self` is `Leap`, otherwise `false`.
    pub fn is_leap(&self) -> bool {
        matches!(self, YearType::Leap)
    }
    /// Number of days in `month` (`1..=12`), `0` for any other month.
    pub fn days_in_month(&self, month: i32) -> i32 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => 28 + self.is_leap() as i32,
            _ => 0,
        }
    }
}

/// JDN of a proleptic Gregorian date, without range checks.
pub(crate) fn jdn_from_gregorian(y: i32, m: i32, d: i32) -> i64 {
    let (y, m, d) = (y as i64, m as i64, d as i64);
    (1461 * (y + 4800 + (m - 14) / 12)) / 4 + (367 * (m - 2 - 12 * ((m - 14) / 12))) / 12
        - (3 * ((y + 4900 + (m - 14) / 12) / 100)) / 4
        + d
        - 32075
}

/// Splits date text into its three numeric fields.
pub(crate) fn split_ymd(s: &str) -> Result<(i32, i32, i32)> {
    let invalid = || Error::InvalidDateString {
        input: s.to_owned(),
    };
    let date_part = s
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or_default();
    let mut fields = date_part.split(['-', '/', '.']);
    let mut next = || -> Result<i32> {
        fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(invalid)
    };
    let ymd = (next()?, next()?, next()?);
    if fields.next().is_some() {
        return Err(invalid());
    }
    Ok(ymd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_gregorian() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(2440588, date.jdn());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(2459466, date.jdn());
        assert_eq!(None, Date::from_gregorian(2021, 13, 1));
        assert_eq!(None, Date::from_gregorian(2021, 4, 31));
        assert!(Date::from_gregorian(2000, 2, 29).is_some());
        assert_eq!(None, Date::from_gregorian(1900, 2, 29));
    }

    #[test]
    fn to_gregorian() {
        let date = Date::from_jdn(2440588);
        assert_eq!((1970, 1, 1), date.gregorian());
        let date = Date::from_jdn(2459466);
        assert_eq!((2021, 9, 8), date.gregorian());
        let date = Date::from_jdn(2451545);
        assert_eq!((2000, 1, 1), date.gregorian());
    }

    #[test]
    fn to_day_of_week() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(4, date.day_of_week());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(3, date.day_of_week());
    }

    #[test]
    fn to_sexagenary() {
        let date = Date::from_gregorian(1970, 1, 1).unwrap();
        assert_eq!(18, date.sexagenary());
        let date = Date::from_gregorian(2021, 9, 8).unwrap();
        assert_eq!(56, date.sexagenary());
    }

    #[test]
    fn unix_days() {
        assert_eq!(0, Date::from_gregorian(1970, 1, 1).unwrap().unix_days());
        assert_eq!(-1, Date::from_gregorian(1969, 12, 31).unwrap().unix_days());
        assert_eq!(-25567, Date::from_gregorian(1900, 1, 1).unwrap().unix_days());
    }

    #[test]
    fn parse() {
        for s in ["2023-07-04", "2023/7/4", "2023.07.4", " 2023-7-4T08:00 ", "2023-7-4 23:59"] {
            let date: Date = s.parse().unwrap();
            assert_eq!((2023, 7, 4), date.gregorian(), "{s:?}");
        }
        for s in ["", "2023", "2023-07", "2023-07-04-01", "2023-xx-04", "二〇二三"] {
            assert_eq!(
                Err(Error::InvalidDateString { input: s.to_owned() }),
                s.parse::<Date>(),
                "{s:?}"
            );
        }
        assert_eq!(
            Err(Error::InvalidDate {
                year: 2023,
                month: 2,
                day: 30
            }),
            "2023-2-30".parse::<Date>()
        );
    }

    #[test]
    fn iso_format() {
        assert_eq!(
            "2021-09-08",
            Date::from_gregorian(2021, 9, 8).unwrap().to_string()
        );
    }

    #[test]
    fn arithmetic() {
        let date = Date::from_gregorian(2000, 2, 28).unwrap();
        assert_eq!("2000-03-01", (date + 2).iso_gregorian());
        assert_eq!("2000-02-27", (date + -1).iso_gregorian());
        assert_eq!(2, (date + 2) - date);
    }
}
