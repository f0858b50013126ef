//! Four Pillars (四柱) of a moment on the Chinese lunisolar calendar.
//!
//! Given a date, either lunar or solar, and a double hour (时辰), this crate
//! computes the sexagenary (干支) designations of the year, month, day and
//! hour. The lunisolar calendar and solar terms needed for that are computed
//! from astronomical series (truncated VSOP87 for the Sun) for the years 1900
//! through 2100.
//!
//! # Examples
//!
//! From a solar (Gregorian) date:
//!
//! ```
//! use sizhu::chinese::{DoubleHour, by_solar_date};
//!
//! let pillars = by_solar_date("2023-07-04", DoubleHour::new(2).unwrap()).unwrap();
//! assert_eq!("癸卯 戊午 癸亥 甲寅", pillars.to_string());
//! ```
//!
//! From a lunar date, here the 17th day of the 5th month of 2023:
//!
//! ```
//! use sizhu::chinese::{DoubleHour, by_lunar_date};
//!
//! let pillars = by_lunar_date("2023-5-17", DoubleHour::new(2).unwrap(), false).unwrap();
//! assert_eq!("癸卯 戊午 癸亥 甲寅", pillars.to_string());
//! ```
//!
//! Individual pillars and the calendar itself:
//!
//! ```
//! use sizhu::Date;
//! use sizhu::chinese::{Almanac, Lunisolar, Month::*, sexagenary};
//!
//! assert_eq!("甲子", sexagenary::of_year(1984).to_string());
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//! let lunar = Lunisolar.solar_to_lunar(date).unwrap();
//! assert_eq!((1999, Common(11), 25), (lunar.year, lunar.month, lunar.day));
//! ```

pub mod chinese;
pub mod date;
pub mod error;
pub mod time_scales;

pub use date::{Date, YearType};
pub use error::{Error, Result};
