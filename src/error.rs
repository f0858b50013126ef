//! Error types for the sizhu crate.

/// Error type for all fallible operations in the crate.
///
/// The pillar rules themselves never fail; every variant here comes from
/// parsing dates or from the calendar conversions they depend on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The text could not be read as a date.
    #[error("invalid date string: {input:?}")]
    InvalidDateString {
        /// The text that was provided.
        input: String,
    },

    /// The Gregorian calendar has no such day.
    #[error("invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: i32, day: i32 },

    /// The lunisolar calendar has no such day, e.g. a leap month the year
    /// does not have or day 30 of a 29-day month.
    #[error("invalid lunar date: {year} {}month {month} day {day}", leap_prefix(.leap))]
    InvalidLunarDate {
        year: i32,
        month: u32,
        day: u32,
        leap: bool,
    },

    /// The year is outside the range the almanac can compute.
    #[error("year {year} out of supported range")]
    OutOfRange { year: i32 },

    /// Solar term indices run from 1 (小寒) to 24 (冬至).
    #[error("invalid solar term index: {term} (must be 1..=24)")]
    InvalidSolarTerm { term: u32 },

    /// Double-hour indices run from 0 to 12, 12 being the late 子 hour.
    #[error("invalid double-hour index: {index} (must be 0..=12)")]
    InvalidDoubleHour { index: u32 },

    /// Clock hours run from 0 to 23.
    #[error("invalid hour: {hour} (must be 0..=23)")]
    InvalidHour { hour: u32 },
}

fn leap_prefix(leap: &bool) -> &'static str {
    if *leap { "leap " } else { "" }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
