//! Chinese calendar
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 本程序以即時推算的天文曆表編算夏曆（見 [`ephemeris`]），並據以推四柱（見 [`sexagenary`]、
//! [`pillars`]）。四柱推算所需的曆法換算經由 [`Almanac`] 取得，內建實現為 [`Lunisolar`]。

use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::{Date, split_ymd};
use crate::error::{Error, Result};
use crate::time_scales::{Tt, Ut};

pub mod ephemeris;
pub mod fmt;
pub mod pillars;
pub mod sexagenary;

pub use pillars::{FourPillars, by_lunar_date, by_lunar_date_with, by_solar_date, by_solar_date_with};
pub use sexagenary::{Branch, DoubleHour, Pillar, Stem};

/// 北京時間（UTC+8）與 UTC 相差的分鐘數，定朔、定氣皆以此時區定日。
pub const CST_OFFSET_MINUTES: i32 = 480;

/// 支持的公曆年及農曆年範圍
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=2100;

/// 四柱推算所需的曆法換算。
///
/// 內建實現為 [`Lunisolar`]；亦可自行實現，例如以查表代替天文推算，或在測試中固定節氣日。
pub trait Almanac {
    /// 取得公曆 `year` 年第 `term` 個節氣所在的公曆日（月內第幾日）。
    ///
    /// `term` 取 `1..=24`，1 為小寒，2 為大寒，3 為立春……24 為冬至；第 `2m - 1`、`2m` 個節氣都在公曆 `m` 月。
    fn solar_term_day(&self, year: i32, term: u32) -> Result<u32>;
    /// 農曆轉公曆
    fn lunar_to_solar(&self, date: LunarDate) -> Result<Date>;
    /// 公曆轉農曆
    fn solar_to_lunar(&self, date: Date) -> Result<LunarDate>;
}

impl<A: Almanac + ?Sized> Almanac for &A {
    fn solar_term_day(&self, year: i32, term: u32) -> Result<u32> {
        (**self).solar_term_day(year, term)
    }
    fn lunar_to_solar(&self, date: LunarDate) -> Result<Date> {
        (**self).lunar_to_solar(date)
    }
    fn solar_to_lunar(&self, date: Date) -> Result<LunarDate> {
        (**self).solar_to_lunar(date)
    }
}

/// 以天文推算編排的夏曆，支持 [`SUPPORTED_YEARS`] 範圍內的日期。
///
/// # 用例
///
/// ```
/// use sizhu::Date;
/// use sizhu::chinese::{Almanac, LunarDate, Lunisolar, Month::*};
///
/// let date = Date::from_gregorian(2023, 7, 4).unwrap();
/// let lunar = Lunisolar.solar_to_lunar(date).unwrap();
/// assert_eq!(LunarDate::new(2023, Common(5), 17), lunar);
/// assert_eq!(date, Lunisolar.lunar_to_solar(lunar).unwrap());
/// assert_eq!(7, Lunisolar.solar_term_day(2023, 13).unwrap()); // 小暑
/// ```
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Lunisolar;

impl Almanac for Lunisolar {
    fn solar_term_day(&self, year: i32, term: u32) -> Result<u32> {
        if !(1..=24).contains(&term) {
            return Err(Error::InvalidSolarTerm { term });
        }
        check_year(year)?;
        let tt = ephemeris::solar_term(year, term as usize);
        Ok(date_cst(tt).gregorian().2 as u32)
    }

    /// 支持的農曆日期與 [`Almanac::solar_to_lunar`] 一致：換算所得公曆日期須在 [`SUPPORTED_YEARS`] 內，
    /// 故 1899 年冬月、臘月中落在 1900 年者亦可換算。
    fn lunar_to_solar(&self, date: LunarDate) -> Result<Date> {
        let out_of_range = Error::OutOfRange { year: date.year };
        let invalid = || Error::InvalidLunarDate {
            year: date.year,
            month: date.month.num(),
            day: date.day,
            leap: date.month.is_leap(),
        };
        if !(1..=12).contains(&date.month.num()) || !(1..=30).contains(&date.day) {
            return Err(invalid());
        }
        let annus_year = if date.month.num() >= 11 {
            date.year + 1
        } else {
            date.year
        };
        let annus = Annus::new(annus_year).ok_or_else(|| out_of_range.clone())?;
        let (this, next) = annus
            .months
            .windows(2)
            .map(|w| (w[0], w[1]))
            .find(|(m, _)| m.month == date.month)
            .ok_or_else(invalid)?;
        if date.day as i32 > next.date - this.date {
            return Err(invalid());
        }
        let solar = this.date + (date.day as i32 - 1);
        if !SUPPORTED_YEARS.contains(&solar.gregorian().0) {
            return Err(out_of_range);
        }
        Ok(solar)
    }

    fn solar_to_lunar(&self, date: Date) -> Result<LunarDate> {
        let year = date.gregorian().0;
        check_year(year)?;
        let annus = Annus::from_date(date).ok_or(Error::OutOfRange { year })?;
        let (y, month, day) = annus
            .ymd_for(date)
            .map_err(|_| Error::OutOfRange { year })?;
        debug!(%date, lunar_year = y, ?month, day, "solar to lunar");
        Ok(LunarDate::new(y, month, day))
    }
}

fn check_year(year: i32) -> Result<()> {
    if SUPPORTED_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(Error::OutOfRange { year })
    }
}

/// 農曆日期
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LunarDate {
    /// 農曆年，以正月為首，記為其大部分時段所在公元年
    pub year: i32,
    pub month: Month,
    pub day: u32,
}

impl LunarDate {
    pub fn new(year: i32, month: Month, day: u32) -> Self {
        Self { year, month, day }
    }

    /// 解析形如 `2023-5-17` 的農曆日期文本，分隔符亦可為 `/` 或 `.`。是否閏月由 `is_leap` 指定。
    ///
    /// 只檢查格式，不檢查該日是否存在；後者由換算時報錯。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::chinese::{LunarDate, Month::*};
    ///
    /// assert_eq!(
    ///     LunarDate::new(2023, Leap(2), 1),
    ///     LunarDate::parse("2023-2-1", true).unwrap()
    /// );
    /// ```
    pub fn parse(s: &str, is_leap: bool) -> Result<Self> {
        let (year, month, day) = split_ymd(s)?;
        let (Ok(month), Ok(day)) = (u32::try_from(month), u32::try_from(day)) else {
            return Err(Error::InvalidDateString {
                input: s.to_owned(),
            });
        };
        let month = if is_leap {
            Month::Leap(month)
        } else {
            Month::Common(month)
        };
        Ok(Self::new(year, month, day))
    }
}

/// 以年柱紀年，如「癸卯年閏二月初一」。月、日超出範圍者以數字表示。
impl std::fmt::Display for LunarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let year = sexagenary::of_year(self.year);
        if !(1..=12).contains(&self.month.num()) || !(1..=30).contains(&self.day) {
            let leap = if self.month.is_leap() { "閏" } else { "" };
            return write!(f, "{year}年{leap}{}月{}日", self.month.num(), self.day);
        }
        write!(
            f,
            "{}年{}{}",
            year,
            fmt::month(self.month),
            fmt::day(self.day)
        )
    }
}

/// 「歲」，相鄰兩冬至間的時段，或自冬至所在月（十一月）至下一冬至前月（十月或閏十月）的時段。
///
/// 支持的年份見 [`Annus::new`]。
///
/// 注意：「歲」與「年」在曆法上不同，年以正月為首，但曆法編算須以兩冬至間的「歲」為基礎，本程序亦以「歲」編排，並依日期計算所在「年」。
///
/// # 用例
///
/// ```
/// use sizhu::Date;
/// use sizhu::chinese::{Annus, Month::*};
///
/// let date = Date::from_gregorian(2000, 1, 1).unwrap();
/// let annus = Annus::from_date(date).unwrap();
///
/// assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
/// ```
#[derive(Debug, Clone)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在的公元年
    pub annus: i32,
    /// 該歲的曆表
    pub ephemeris: ephemeris::Annus,
    /// 全部月首，包括次一歲首月用以標記本歲最末日
    pub months: Vec<NewMoon>,
}
/// 月首信息
#[derive(Debug, Copy, Clone)]
pub struct NewMoon {
    /// 月名
    pub month: Month,
    /// 月首所在日期
    pub date: Date,
}
/// 月名，`Common` 為平月，`Leap` 為閏月。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Month {
    Common(u32),
    Leap(u32),
}
impl Month {
    /// 取得月序號，無論平閏。
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// 閏月為 `true`，平月為 `false`
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
    /// 取得月名的文本形式，十一、十二月稱「冬月」「臘月」。
    pub fn name(&self) -> String {
        fmt::month(*self)
    }
}

impl Annus {
    /// 取得與公元 `annus` 年對應的歲。
    ///
    /// 歲 `annus` 始於 `annus - 1` 年冬月，故支持 1900 至 2101 歲，以覆蓋 [`SUPPORTED_YEARS`] 內全部日期；
    /// 超出範圍則返回 `None`。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::chinese::Annus;
    ///
    /// let annus = Annus::new(2000).unwrap();
    /// assert!(Annus::new(2200).is_none());
    /// ```
    pub fn new(annus: i32) -> Option<Self> {
        use Month::*;

        if !(*SUPPORTED_YEARS.start()..=*SUPPORTED_YEARS.end() + 1).contains(&annus) {
            return None;
        }
        let ephemeris = ephemeris::Annus::compute(annus);
        let new_moon_dates: Vec<_> = ephemeris.new_moon.iter().map(|&tt| date_cst(tt)).collect();
        let ws = date_cst(ephemeris.solar_term[0]);
        let ws_next = date_cst(ephemeris.solar_term[24]);
        let m11_idx = new_moon_dates.partition_point(|date| date <= &ws) - 1;
        let m11n_idx = new_moon_dates.partition_point(|date| date < &ws_next) - 1;
        let mut needs_leap = match m11n_idx - m11_idx {
            12 => false,
            13 => true,
            _ => panic!("{} months between winter solstices", m11n_idx - m11_idx),
        };

        let mut months = Vec::with_capacity(m11n_idx - m11_idx + 1);
        let mut month = 10;
        let mut term = 0;
        for i in m11_idx..=m11n_idx {
            if needs_leap && new_moon_dates[i + 1] <= date_cst(ephemeris.solar_term[term]) {
                debug!(annus, month, "leap month");
                months.push(NewMoon {
                    month: Leap(month),
                    date: new_moon_dates[i],
                });
                needs_leap = false;
                continue;
            }
            month = month % 12 + 1;
            months.push(NewMoon {
                month: Common(month),
                date: new_moon_dates[i],
            });
            term += 2;
        }
        assert!(!needs_leap);

        Some(Annus {
            annus,
            ephemeris,
            months,
        })
    }
    /// 依特定日期取得其所在歲。
    ///
    /// 若超出支持範圍則返回 `None`。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::Date;
    /// use sizhu::chinese::Annus;
    ///
    /// let date = Date::from_gregorian(1999, 12, 31).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(2000, annus.annus);
    /// ```
    pub fn from_date(date: Date) -> Option<Self> {
        let mut y = date.gregorian().0;
        loop {
            let annus = Self::new(y)?;

            let start = annus.months[0].date;
            let end = annus.months[annus.months.len() - 1].date;

            if (start..end).contains(&date) {
                return Some(annus);
            }

            y += if date < start { -1 } else { 1 };
        }
    }

    /// 取得給定日期在該歲的年月日，返回格式為 `(年, 月, 日)`。
    ///
    /// 若所給日期不在該歲，則回報 `Err` 並指出該日期在該歲之前還是之後。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::Date;
    /// use sizhu::chinese::{Annus, Month::*};
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
    /// ```
    pub fn ymd_for(&self, date: Date) -> Result<(i32, Month, u32), OtherAnnus> {
        let begin = self.months[0].date;
        let end = self.months[self.months.len() - 1].date;

        if date < begin {
            return Err(OtherAnnus::Before);
        } else if date >= end {
            return Err(OtherAnnus::After);
        }

        let idx = self.months.partition_point(|m| m.date <= date) - 1;
        let m = self.months[idx];
        let d = (date - m.date + 1) as u32;
        let y = if m.month.num() >= 11 {
            self.annus - 1
        } else {
            self.annus
        };
        Ok((y, m.month, d))
    }

    /// 取得給定日期所在節氣信息，若當日並無交節，則給出該日相對其前一個交節的日數差。返回值格式如下：
    ///
    /// - `.0`：該節氣所在公曆年
    /// - `.1`：該節氣序號，`1..=24` 對應小寒到冬至，與 [`Almanac::solar_term_day`] 一致
    /// - `.2`：所給 `date` 在該節交節後第幾日，為 0 則表示當日交節
    ///
    /// 本方法支持自該歲首日至次歲冬至前日的區間。
    ///
    /// # 用例
    ///
    /// ```
    /// use sizhu::Date;
    /// use sizhu::chinese::Annus;
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(Ok((1999, 24, 10)), annus.solar_term_for(date)); // 冬至過後第 10 天
    /// ```
    pub fn solar_term_for(&self, date: Date) -> Result<(i32, u32, u32), OtherAnnus> {
        use self::OtherAnnus::*;
        if date < self.months[0].date {
            return Err(Before);
        } else if date >= date_cst(self.ephemeris.solar_term[24]) {
            return Err(After);
        }
        if date < date_cst(self.ephemeris.solar_term[0]) {
            for idx in (22..24).rev() {
                let term_start = date_cst(ephemeris::solar_term(self.annus - 1, idx));
                if date >= term_start {
                    return Ok((self.annus - 1, idx as u32, (date - term_start) as u32));
                }
            }
            panic!("annus {} starts before 小雪", self.annus);
        }
        let idx = self.ephemeris.solar_term[..24].partition_point(|&tt| date_cst(tt) <= date) - 1;
        let off = (date - date_cst(self.ephemeris.solar_term[idx])) as u32;
        match idx {
            0 => Ok((self.annus - 1, 24, off)),
            _ => Ok((self.annus, idx as u32, off)),
        }
    }
}

/// 表示給定日期不在該歲，並指出其在前還是在後。
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OtherAnnus {
    Before,
    After,
}

/// 將給定曆表時間轉為北京時間（UTC+8）日期。
pub fn date_cst(tt: Tt) -> Date {
    Ut::from_tt(tt).date_in_timezone(CST_OFFSET_MINUTES)
}
