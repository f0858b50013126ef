//! 四柱：年、月、日、時各一柱
//!
//! 入口有二：[`by_lunar_date`] 接受農曆日期，[`by_solar_date`] 接受公曆日期。兩者均先取得農曆年（用於年柱）
//! 與公曆日期（用於其餘三柱），再獨立推算各柱。日期解析或換算出錯時原樣返回錯誤，不產生部分結果。

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::sexagenary::{self, DoubleHour, Pillar};
use super::{Almanac, LunarDate, Lunisolar};
use crate::date::Date;
use crate::error::Result;

/// 四柱
///
/// 文本形式為各柱干支相連、四柱以空格分隔，如「癸卯 戊午 癸亥 甲寅」。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FourPillars {
    yearly: Pillar,
    monthly: Pillar,
    daily: Pillar,
    timely: Pillar,
}

impl FourPillars {
    /// 由農曆年與對應的公曆日期推算四柱。
    ///
    /// 年柱依 `lunar_year`，月柱依 `solar` 及節氣，日柱、時柱依 `solar` 及 `hour`。
    pub fn compute<A: Almanac + ?Sized>(
        almanac: &A,
        lunar_year: i32,
        solar: Date,
        hour: DoubleHour,
    ) -> Result<Self> {
        let yearly = sexagenary::of_year(lunar_year);
        let monthly = sexagenary::of_month(almanac, solar)?;
        let daily = sexagenary::of_day(solar, hour);
        let timely = sexagenary::of_time(hour, daily.stem);
        Ok(Self {
            yearly,
            monthly,
            daily,
            timely,
        })
    }

    /// 年柱
    pub fn yearly(&self) -> Pillar {
        self.yearly
    }
    /// 月柱
    pub fn monthly(&self) -> Pillar {
        self.monthly
    }
    /// 日柱
    pub fn daily(&self) -> Pillar {
        self.daily
    }
    /// 時柱
    pub fn timely(&self) -> Pillar {
        self.timely
    }
    /// 依年、月、日、時次序列出四柱
    pub fn pillars(&self) -> [Pillar; 4] {
        [self.yearly, self.monthly, self.daily, self.timely]
    }
}

impl fmt::Display for FourPillars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.yearly, self.monthly, self.daily, self.timely
        )
    }
}

/// 以農曆日期推四柱，曆法換算用內建的 [`Lunisolar`]。
///
/// `date` 形如 `2023-5-17`，`is_leap` 表示該月是否閏月。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::{DoubleHour, by_lunar_date};
///
/// let pillars = by_lunar_date("2023-5-17", DoubleHour::new(2).unwrap(), false).unwrap();
/// assert_eq!("癸卯 戊午 癸亥 甲寅", pillars.to_string());
/// ```
pub fn by_lunar_date(date: &str, hour: DoubleHour, is_leap: bool) -> Result<FourPillars> {
    by_lunar_date_with(&Lunisolar, date, hour, is_leap)
}

/// 同 [`by_lunar_date`]，曆法換算用給定的 `almanac`。
#[tracing::instrument(level = "debug", skip(almanac))]
pub fn by_lunar_date_with<A: Almanac + ?Sized>(
    almanac: &A,
    date: &str,
    hour: DoubleHour,
    is_leap: bool,
) -> Result<FourPillars> {
    let lunar = LunarDate::parse(date, is_leap)?;
    let solar = almanac.lunar_to_solar(lunar)?;
    debug!(%solar, "lunar date converted");
    FourPillars::compute(almanac, lunar.year, solar, hour)
}

/// 以公曆日期推四柱，曆法換算用內建的 [`Lunisolar`]。
///
/// `date` 形如 `2023-7-4`，分隔符亦可為 `/` 或 `.`。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::{DoubleHour, by_solar_date};
///
/// let pillars = by_solar_date("2023-7-4", DoubleHour::new(2).unwrap()).unwrap();
/// assert_eq!("癸卯 戊午 癸亥 甲寅", pillars.to_string());
/// ```
pub fn by_solar_date(date: &str, hour: DoubleHour) -> Result<FourPillars> {
    by_solar_date_with(&Lunisolar, date, hour)
}

/// 同 [`by_solar_date`]，曆法換算用給定的 `almanac`。
#[tracing::instrument(level = "debug", skip(almanac))]
pub fn by_solar_date_with<A: Almanac + ?Sized>(
    almanac: &A,
    date: &str,
    hour: DoubleHour,
) -> Result<FourPillars> {
    let solar: Date = date.parse()?;
    let lunar = almanac.solar_to_lunar(solar)?;
    debug!(lunar_year = lunar.year, "solar date converted");
    FourPillars::compute(almanac, lunar.year, solar, hour)
}
