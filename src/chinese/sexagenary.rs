//! 干支與四柱各柱的推算規則
//!
//! 年柱、月柱、日柱、時柱各自獨立推算，彼此只通過日干（用於時柱）關聯。
//!
//! 注意：年柱與其他三柱取餘的慣例不同。年柱沿用傳統一起算的計數，餘數為 0 時取末位（癸、亥）；
//! 月、日、時三柱則以 [`fix_index`] 作零起算的取餘。兩種慣例不可合併，否則年柱會錯一位。

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::Almanac;
use crate::date::Date;
use crate::error::{Error, Result};

/// 天干名，依甲、乙……癸次序
pub const HEAVENLY_STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];
/// 地支名，依子、丑……亥次序
pub const EARTHLY_BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];
/// 地支所屬生肖
const ZODIAC: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龍", "蛇", "馬", "羊", "猴", "雞", "狗", "豬",
];

/// 日柱偏移常數：1900-01-01 距 1970-01-01 的日數，另加 10 使 1900-01-01 落在甲戌。
pub const DAY_EPOCH_OFFSET: i64 = 25567 + 10;

/// 將任意整數化為長度 `modulus` 的循環中的零起算下標，結果恆在 `0..modulus`。
///
/// 地支用 12，天干須明確傳入 10。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::sexagenary::fix_index;
///
/// assert_eq!(0, fix_index(0, 12));
/// assert_eq!(11, fix_index(-1, 12));
/// assert_eq!(3, fix_index(13, 10));
/// ```
///
/// # Panics
///
/// `modulus` 為 0 時 panic。
pub fn fix_index(value: i64, modulus: u32) -> usize {
    value.rem_euclid(modulus as i64) as usize
}

/// 天干
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    /// 依甲至癸次序排列的全部天干
    pub const ALL: [Stem; 10] = {
        use Stem::*;
        [Jia, Yi, Bing, Ding, Wu, Ji, Geng, Xin, Ren, Gui]
    };

    /// 取得零起算下標處的天干，下標先按十取餘。
    pub fn from_index(index: i64) -> Self {
        Self::ALL[fix_index(index, 10)]
    }
    /// 零起算序號，甲為 0。
    pub fn index(self) -> usize {
        self as usize
    }
    /// 漢字名
    pub fn name(self) -> &'static str {
        HEAVENLY_STEMS[self.index()]
    }
    /// 五鼠遁：該日干之日，子時所起之干。
    ///
    /// 甲己還加甲，乙庚丙作初，丙辛從戊起，丁壬庚子居，戊癸何方發，壬子是真途。
    pub fn rat_rule(self) -> Stem {
        use Stem::*;
        match self {
            Jia | Ji => Jia,
            Yi | Geng => Bing,
            Bing | Xin => Wu,
            Ding | Ren => Geng,
            Wu | Gui => Ren,
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 地支
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    /// 依子至亥次序排列的全部地支
    pub const ALL: [Branch; 12] = {
        use Branch::*;
        [Zi, Chou, Yin, Mao, Chen, Si, Wu, Wei, Shen, You, Xu, Hai]
    };

    /// 取得零起算下標處的地支，下標先按十二取餘。
    pub fn from_index(index: i64) -> Self {
        Self::ALL[fix_index(index, 12)]
    }
    /// 零起算序號，子為 0。
    pub fn index(self) -> usize {
        self as usize
    }
    /// 漢字名
    pub fn name(self) -> &'static str {
        EARTHLY_BRANCHES[self.index()]
    }
    /// 所屬生肖
    ///
    /// ```
    /// use sizhu::chinese::sexagenary::Branch;
    ///
    /// assert_eq!("兔", Branch::Mao.zodiac());
    /// ```
    pub fn zodiac(self) -> &'static str {
        ZODIAC[self.index()]
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 一柱，即一對干支。
///
/// 由同一偏移量分別按十、十二取餘所得者，只有六十種組合（干支同奇偶）。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }
    /// 以同一偏移量取干支，0 為甲子。
    ///
    /// ```
    /// use sizhu::chinese::sexagenary::{Branch, Pillar, Stem};
    ///
    /// assert_eq!(Pillar::new(Stem::Gui, Branch::Hai), Pillar::from_offset(-1));
    /// ```
    pub fn from_offset(offset: i64) -> Self {
        Self {
            stem: Stem::from_index(offset),
            branch: Branch::from_index(offset),
        }
    }
    /// 干支序號，1 為甲子，60 為癸亥。
    ///
    /// 干支不同奇偶者不在六十甲子之中，返回 `None`。
    pub fn sexagenary(&self) -> Option<u32> {
        let (s, b) = (self.stem.index() as u32, self.branch.index() as u32);
        (0..6).map(|i| s + 10 * i).find(|n| n % 12 == b).map(|n| n + 1)
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

/// 時辰序號，`0..=11` 依次為子時（23:00–00:59）至亥時（21:00–22:59）；12 為「晚子時」，
/// 即當日 23:00–23:59，日柱須計入次日，時支仍為子。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct DoubleHour(u32);

impl DoubleHour {
    /// 晚子時
    pub const LATE_ZI: DoubleHour = DoubleHour(12);

    /// 以序號 `0..=12` 建立時辰。
    ///
    /// ```
    /// use sizhu::chinese::sexagenary::DoubleHour;
    ///
    /// assert!(DoubleHour::new(12).unwrap().is_late_zi());
    /// assert!(DoubleHour::new(13).is_err());
    /// ```
    pub fn new(index: u32) -> Result<Self> {
        if index > 12 {
            return Err(Error::InvalidDoubleHour { index });
        }
        Ok(Self(index))
    }
    /// 以鐘點 `0..=23` 取得時辰，23 點為晚子時，0 點為早子時。
    ///
    /// ```
    /// use sizhu::chinese::sexagenary::DoubleHour;
    ///
    /// assert_eq!(0, DoubleHour::from_hour(0).unwrap().index());
    /// assert_eq!(1, DoubleHour::from_hour(2).unwrap().index());
    /// assert_eq!(11, DoubleHour::from_hour(22).unwrap().index());
    /// assert_eq!(12, DoubleHour::from_hour(23).unwrap().index());
    /// ```
    pub fn from_hour(hour: u32) -> Result<Self> {
        match hour {
            0..=23 => Ok(Self((hour + 1) / 2)),
            _ => Err(Error::InvalidHour { hour }),
        }
    }
    /// 原始序號，`0..=12`
    pub fn index(self) -> u32 {
        self.0
    }
    /// 是否為晚子時
    pub fn is_late_zi(self) -> bool {
        self.0 == 12
    }
    /// 時支下標，晚子時歸為子（0）。
    pub fn branch_index(self) -> usize {
        fix_index(self.0 as i64, 12)
    }
}

impl TryFrom<u32> for DoubleHour {
    type Error = Error;
    fn try_from(index: u32) -> Result<Self> {
        Self::new(index)
    }
}

impl From<DoubleHour> for u32 {
    fn from(hour: DoubleHour) -> u32 {
        hour.0
    }
}

/// 年柱，`year` 為農曆年份。
///
/// 公元 4 年為甲子，故先減 3，再以一起算取餘：餘 0 者取第十干、第十二支。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::sexagenary::of_year;
///
/// assert_eq!("甲子", of_year(1984).to_string());
/// assert_eq!("癸卯", of_year(2023).to_string());
/// ```
pub fn of_year(year: i32) -> Pillar {
    let one_based = |modulus: i32| match (year - 3).rem_euclid(modulus) {
        0 => modulus,
        rem => rem,
    };
    let stem = one_based(10);
    let branch = one_based(12);
    Pillar::new(
        Stem::ALL[(stem - 1) as usize],
        Branch::ALL[(branch - 1) as usize],
    )
}

/// 月柱，`date` 為公曆日期。
///
/// 月柱以節（非中氣）為界：當月之節（第 `month * 2 - 1` 個節氣，1 為小寒）當日及其後，
/// 即屬次一干支月。節氣日由 `almanac` 提供，其錯誤原樣返回。
///
/// # 用例
///
/// ```
/// use sizhu::Date;
/// use sizhu::chinese::{Lunisolar, sexagenary::of_month};
///
/// let date = Date::from_gregorian(2023, 7, 4).unwrap();
/// assert_eq!("戊午", of_month(&Lunisolar, date).unwrap().to_string());
/// ```
pub fn of_month<A: Almanac + ?Sized>(almanac: &A, date: Date) -> Result<Pillar> {
    let (year, month, day) = date.gregorian();
    let term_day = almanac.solar_term_day(year, (month * 2 - 1) as u32)?;
    let offset = (year as i64 - 1900) * 12 + month as i64 + 11;
    let offset = if day as u32 >= term_day {
        offset + 1
    } else {
        offset
    };
    trace!(%date, term_day, offset, "month pillar offset");
    Ok(Pillar::from_offset(offset))
}

/// 日柱，`date` 為公曆日期。晚子時計入次日。
///
/// # 用例
///
/// ```
/// use sizhu::Date;
/// use sizhu::chinese::sexagenary::{DoubleHour, of_day};
///
/// let date = Date::from_gregorian(2000, 1, 1).unwrap();
/// assert_eq!("戊午", of_day(date, DoubleHour::new(0).unwrap()).to_string());
/// assert_eq!("己未", of_day(date, DoubleHour::LATE_ZI).to_string());
/// ```
pub fn of_day(date: Date, hour: DoubleHour) -> Pillar {
    let (_, _, day) = date.gregorian();
    let first_of_month = Date::from_jdn(date.jdn() - (day - 1) as u32);
    let mut offset = first_of_month.unix_days() + DAY_EPOCH_OFFSET + (day as i64 - 1);
    if hour.is_late_zi() {
        offset += 1;
    }
    Pillar::from_offset(offset)
}

/// 時柱（五鼠遁），`day_stem` 為當日日干。晚子時按子時計。
///
/// # 用例
///
/// ```
/// use sizhu::chinese::sexagenary::{DoubleHour, Stem, of_time};
///
/// assert_eq!("甲子", of_time(DoubleHour::new(0).unwrap(), Stem::Jia).to_string());
/// assert_eq!("甲寅", of_time(DoubleHour::new(2).unwrap(), Stem::Gui).to_string());
/// ```
pub fn of_time(hour: DoubleHour, day_stem: Stem) -> Pillar {
    let index = hour.branch_index() as i64;
    let start = day_stem.rat_rule();
    let stem = Stem::ALL[fix_index(start.index() as i64 + fix_index(index, 10) as i64, 10)];
    let branch = Branch::ALL[fix_index(index, 12)];
    Pillar::new(stem, branch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chinese::{LunarDate, Lunisolar};

    /// 只提供節氣日，每月之節都在 `0` 所示之日。
    struct TermsOn(u32);

    impl Almanac for TermsOn {
        fn solar_term_day(&self, _year: i32, _term: u32) -> Result<u32> {
            Ok(self.0)
        }
        fn lunar_to_solar(&self, _date: LunarDate) -> Result<Date> {
            unimplemented!()
        }
        fn solar_to_lunar(&self, _date: Date) -> Result<LunarDate> {
            unimplemented!()
        }
    }

    fn ymd(y: i32, m: i32, d: i32) -> Date {
        Date::from_gregorian(y, m, d).unwrap()
    }

    #[test]
    fn fix_index_is_periodic_and_in_range() {
        for modulus in [10, 12, 60] {
            for v in -200..200 {
                let idx = fix_index(v, modulus);
                assert!(idx < modulus as usize, "{v} mod {modulus}");
                assert_eq!(idx, fix_index(v + modulus as i64, modulus));
            }
        }
        assert_eq!(0, fix_index(0, 12));
        assert_eq!(0, fix_index(0, 10));
        assert_eq!(9, fix_index(-1, 10));
        assert_eq!(7, fix_index(i64::MAX, 12));
    }

    #[test]
    fn year_pillar() {
        for (std, year) in [
            ("甲子", 1984),
            ("癸亥", 1983),
            ("庚午", 1990),
            ("己卯", 1999),
            ("庚辰", 2000),
            ("癸卯", 2023),
            ("甲子", 4),
            ("癸亥", 3),
            ("丁巳", -3),
        ] {
            assert_eq!(std, of_year(year).to_string(), "{year}");
        }
    }

    #[test]
    fn year_pillar_period_60() {
        for year in -300..300 {
            assert_eq!(of_year(year), of_year(year + 60), "{year}");
            assert_ne!(of_year(year), of_year(year + 1), "{year}");
        }
    }

    #[test]
    fn year_rule_matches_offset_rule() {
        // 一起算減 3 與零起算減 4 結果相同
        for year in -300..300 {
            assert_eq!(Pillar::from_offset(year as i64 - 4), of_year(year), "{year}");
        }
    }

    #[test]
    fn month_pillar_boundary() {
        let almanac = TermsOn(6);
        for (std, day) in [("丙子", 5), ("丁丑", 6), ("丁丑", 7)] {
            let pillar = of_month(&almanac, ymd(2000, 1, day)).unwrap();
            assert_eq!(std, pillar.to_string(), "2000-01-{day:02}");
        }
        // 寅月始於立春
        assert_eq!("戊寅", of_month(&almanac, ymd(2000, 2, 6)).unwrap().to_string());
        assert_eq!("丙子", of_month(&almanac, ymd(1900, 1, 1)).unwrap().to_string());
    }

    #[test]
    fn month_pillar_with_astronomical_terms() {
        for (std, (y, m, d)) in [
            ("丙子", (2000, 1, 5)),
            ("丁丑", (2000, 1, 6)),
            ("丁丑", (2000, 2, 3)),
            ("戊寅", (2000, 2, 4)),
            ("甲寅", (2023, 2, 4)),
            ("戊午", (2023, 7, 6)),
            ("己未", (2023, 7, 7)),
        ] {
            let pillar = of_month(&Lunisolar, ymd(y, m, d)).unwrap();
            assert_eq!(std, pillar.to_string(), "{y}-{m}-{d}");
        }
    }

    #[test]
    fn month_pillar_propagates_errors() {
        assert_eq!(
            Err(Error::OutOfRange { year: 1850 }),
            of_month(&Lunisolar, ymd(1850, 6, 1))
        );
    }

    #[test]
    fn day_pillar() {
        let zi = DoubleHour::new(0).unwrap();
        for (std, (y, m, d)) in [
            ("甲戌", (1900, 1, 1)),
            ("辛巳", (1970, 1, 1)),
            ("戊午", (2000, 1, 1)),
            ("癸亥", (2023, 7, 4)),
            ("甲子", (2023, 7, 5)),
        ] {
            assert_eq!(std, of_day(ymd(y, m, d), zi).to_string(), "{y}-{m}-{d}");
        }
    }

    #[test]
    fn day_pillar_matches_julian_day_number() {
        let zi = DoubleHour::new(0).unwrap();
        let mut date = ymd(1899, 12, 1);
        while date < ymd(1901, 3, 1) {
            assert_eq!(
                Some(date.sexagenary() as u32),
                of_day(date, zi).sexagenary(),
                "{date}"
            );
            date = date + 1;
        }
    }

    #[test]
    fn consecutive_days_step_by_one() {
        let zi = DoubleHour::new(0).unwrap();
        let mut date = ymd(2023, 12, 1);
        let mut prev = of_day(date, zi).sexagenary().unwrap();
        for _ in 0..130 {
            date = date + 1;
            let cur = of_day(date, zi).sexagenary().unwrap();
            assert_eq!(prev % 60 + 1, cur, "{date}");
            prev = cur;
        }
    }

    #[test]
    fn late_zi_is_next_day() {
        let hai = DoubleHour::new(11).unwrap();
        for (y, m, d) in [(2000, 1, 31), (2000, 2, 29), (2023, 12, 31), (2023, 7, 4)] {
            let date = ymd(y, m, d);
            let late = of_day(date, DoubleHour::LATE_ZI).sexagenary().unwrap();
            let before = of_day(date, hai).sexagenary().unwrap();
            assert_eq!(before % 60 + 1, late);
            assert_eq!(of_day(date + 1, hai), of_day(date, DoubleHour::LATE_ZI));
        }
    }

    #[test]
    fn time_pillar() {
        let zi = DoubleHour::new(0).unwrap();
        assert_eq!(Pillar::new(Stem::Jia, Branch::Zi), of_time(zi, Stem::Jia));
        for (std, stem) in [
            ("甲子", Stem::Ji),
            ("丙子", Stem::Yi),
            ("戊子", Stem::Xin),
            ("庚子", Stem::Ding),
            ("壬子", Stem::Wu),
            ("壬子", Stem::Gui),
        ] {
            assert_eq!(std, of_time(zi, stem).to_string(), "{stem}");
        }
        // 甲日亥時為乙亥，壬日亥時為辛亥
        let hai = DoubleHour::new(11).unwrap();
        assert_eq!("乙亥", of_time(hai, Stem::Jia).to_string());
        assert_eq!("辛亥", of_time(hai, Stem::Ren).to_string());
        assert_eq!(of_time(zi, Stem::Bing), of_time(DoubleHour::LATE_ZI, Stem::Bing));
    }

    #[test]
    fn time_pillar_in_cycle() {
        for stem in Stem::ALL {
            for index in 0..12 {
                let pillar = of_time(DoubleHour::new(index).unwrap(), stem);
                assert!(pillar.sexagenary().is_some(), "{stem} {index}");
                assert_eq!(index as usize, pillar.branch.index());
            }
        }
    }

    #[test]
    fn pillar_numbering() {
        assert_eq!(Some(1), Pillar::new(Stem::Jia, Branch::Zi).sexagenary());
        assert_eq!(Some(60), Pillar::new(Stem::Gui, Branch::Hai).sexagenary());
        assert_eq!(Some(17), Pillar::new(Stem::Geng, Branch::Chen).sexagenary());
        assert_eq!(None, Pillar::new(Stem::Jia, Branch::Chou).sexagenary());
        for n in 0..60 {
            assert_eq!(Some(n as u32 + 1), Pillar::from_offset(n).sexagenary());
        }
    }

    #[test]
    fn double_hour() {
        assert_eq!(Err(Error::InvalidHour { hour: 24 }), DoubleHour::from_hour(24));
        let expected = [0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12];
        for (hour, std) in expected.into_iter().enumerate() {
            assert_eq!(std, DoubleHour::from_hour(hour as u32).unwrap().index(), "{hour}");
        }
        assert_eq!(0, DoubleHour::LATE_ZI.branch_index());
        assert_eq!(Ok(DoubleHour::LATE_ZI), DoubleHour::try_from(12));
    }

    #[test]
    fn names() {
        assert_eq!("甲乙丙丁戊己庚辛壬癸", Stem::ALL.map(Stem::name).concat());
        assert_eq!("子丑寅卯辰巳午未申酉戌亥", Branch::ALL.map(Branch::name).concat());
        assert_eq!("鼠", Branch::Zi.zodiac());
        assert_eq!("豬", Branch::Hai.zodiac());
    }
}
