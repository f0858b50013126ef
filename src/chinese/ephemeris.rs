//! 月相節氣曆表
//!
//! 以解析式即時推算，不依賴外部數據：
//!
//! - 太陽視黃經用 VSOP87 截斷級數加章動、光行差改正（Meeus《Astronomical Algorithms》第 25、32 章），
//!   誤差約 1″，即交節時刻誤差半分鐘左右；
//! - 朔用同書第 49 章平朔加週期改正，誤差在一分鐘內。
//!
//! 交節或合朔時刻恰在子夜前後一分鐘內者，所推日期可能與官方曆書相差一日。

use crate::date::jdn_from_gregorian;
use crate::time_scales::Tt;

/// 回歸年日數
const TROPICAL_YEAR: f64 = 365.2422;
/// 朔望月日數
const SYNODIC_MONTH: f64 = 29.530588861;
/// 每歲所列朔數，足以覆蓋閏年的十三個月及其前後
const NEW_MOONS: usize = 17;

/// 一歲的曆表數據
#[derive(Debug, Clone)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在公元年
    pub annus: i32,
    /// 從前一冬至開始的各節氣時刻，亦含本歲冬至以便計算末日
    pub solar_term: [Tt; 25],
    /// 自冬至前兩個朔起的連續各朔時刻
    pub new_moon: [Tt; NEW_MOONS],
}

impl Annus {
    /// 推算公元 `annus` 年對應的歲的曆表。
    pub fn compute(annus: i32) -> Self {
        let solar_term: [Tt; 25] = std::array::from_fn(|i| solar_term(annus, i));
        let k0 = ((solar_term[0].0 - NEW_MOON_EPOCH) / SYNODIC_MONTH).floor() as i64 - 2;
        let new_moon: [Tt; NEW_MOONS] = std::array::from_fn(|i| new_moon(k0 + i as i64));
        Annus {
            annus,
            solar_term,
            new_moon,
        }
    }
}

/// 求 `annus` 歲第 `idx` 個節氣的時刻，0 為前一冬至，24 為本歲冬至。
pub fn solar_term(annus: i32, idx: usize) -> Tt {
    let target = (270.0 + 15.0 * idx as f64).rem_euclid(360.0);
    let dec22 = jdn_from_gregorian(annus - 1, 12, 22) as f64;
    let mut jd = dec22 + idx as f64 * TROPICAL_YEAR / 24.0;
    for _ in 0..10 {
        let diff = (target - sun_apparent_longitude(Tt(jd)) + 540.0).rem_euclid(360.0) - 180.0;
        jd += diff * TROPICAL_YEAR / 360.0;
        if diff.abs() < 1e-7 {
            break;
        }
    }
    Tt(jd)
}

/// 太陽視黃經，單位為度，取值 `[0, 360)`。
///
/// 由地心日黃經（地球日心黃經加 180°）依次加 FK5 改正、黃經章動及光行差。
pub fn sun_apparent_longitude(tt: Tt) -> f64 {
    let t = tt.centuries();
    let tau = t / 10.0;
    let l = vsop87::series(&vsop87::L, tau).to_degrees();
    let r = vsop87::series(&vsop87::R, tau);
    let theta = l + 180.0;
    let fk5 = -0.09033 / 3600.0;
    let aberration = -20.4898 / 3600.0 / r;
    (theta + fk5 + nutation_in_longitude(t) + aberration).rem_euclid(360.0)
}

/// 黃經章動，單位為度，取主要四項，誤差約 0.5″。
fn nutation_in_longitude(t: f64) -> f64 {
    let omega = (125.04452 - 1934.136261 * t).to_radians();
    let l_sun = (280.4665 + 36000.7698 * t).to_radians();
    let l_moon = (218.3165 + 481267.8813 * t).to_radians();
    (-17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin())
        / 3600.0
}

/// 地球日心黃經、距離的 VSOP87 截斷級數（Meeus 附錄三），黃經誤差約 1″。
mod vsop87 {
    /// 一項 `(A, B, C)`，值為 `A cos(B + Cτ)`，單位 1e-8 弧度或 1e-8 天文單位。
    type Term = (f64, f64, f64);

    /// 求 `Σ τ^i Σ A cos(B + Cτ)`，`tau` 為自 J2000 起的儒略千年數。
    pub fn series(powers: &[&[Term]], tau: f64) -> f64 {
        powers
            .iter()
            .rev()
            .fold(0.0, |acc, terms| {
                acc * tau + terms.iter().map(|&(a, b, c)| a * (b + c * tau).cos()).sum::<f64>()
            })
            / 1e8
    }

    pub const L: [&[Term]; 6] = [L0, L1, L2, L3, L4, L5];
    pub const R: [&[Term]; 5] = [R0, R1, R2, R3, R4];

    const L0: &[Term] = &[
        (175347046.0, 0.0, 0.0),
        (3341656.0, 4.6692568, 6283.07585),
        (34894.0, 4.6261, 12566.1517),
        (3497.0, 2.7441, 5753.3849),
        (3418.0, 2.8289, 3.5231),
        (3136.0, 3.6277, 77713.7715),
        (2676.0, 4.4181, 7860.4194),
        (2343.0, 6.1352, 3930.2097),
        (1324.0, 0.7425, 11506.7698),
        (1273.0, 2.0371, 529.691),
        (1199.0, 1.1096, 1577.3435),
        (990.0, 5.233, 5884.927),
        (902.0, 2.045, 26.298),
        (857.0, 3.508, 398.149),
        (780.0, 1.179, 5223.694),
        (753.0, 2.533, 5507.553),
        (505.0, 4.583, 18849.228),
        (492.0, 4.205, 775.523),
        (357.0, 2.92, 0.067),
        (317.0, 5.849, 11790.629),
        (284.0, 1.899, 796.298),
        (271.0, 0.315, 10977.079),
        (243.0, 0.345, 5486.778),
        (206.0, 4.806, 2544.314),
        (205.0, 1.869, 5573.143),
        (202.0, 2.458, 6069.777),
        (156.0, 0.833, 213.299),
        (132.0, 3.411, 2942.463),
        (126.0, 1.083, 20.775),
        (115.0, 0.645, 0.98),
        (103.0, 0.636, 4694.003),
        (102.0, 0.976, 15720.839),
        (102.0, 4.267, 7.114),
        (99.0, 6.21, 2146.17),
        (98.0, 0.68, 155.42),
        (86.0, 5.98, 161000.69),
        (85.0, 1.3, 6275.96),
        (85.0, 3.67, 71430.7),
        (80.0, 1.81, 17260.15),
        (79.0, 3.04, 12036.46),
        (75.0, 1.76, 5088.63),
        (74.0, 3.5, 3154.69),
        (74.0, 4.68, 801.82),
        (70.0, 0.83, 9437.76),
        (62.0, 3.98, 8827.39),
        (61.0, 1.82, 7084.9),
        (57.0, 2.78, 6286.6),
        (56.0, 4.39, 14143.5),
        (56.0, 3.47, 6279.55),
        (52.0, 0.19, 12139.55),
        (52.0, 1.33, 1748.02),
        (51.0, 0.28, 5856.48),
        (49.0, 0.49, 1194.45),
        (41.0, 5.37, 8429.24),
        (41.0, 2.4, 19651.05),
        (39.0, 6.17, 10447.39),
        (37.0, 6.04, 10213.29),
        (37.0, 2.57, 1059.38),
        (36.0, 1.71, 2352.87),
        (36.0, 1.78, 6812.77),
        (33.0, 0.59, 17789.85),
        (30.0, 0.44, 83996.85),
        (30.0, 2.74, 1349.87),
        (25.0, 3.16, 4690.48),
    ];
    const L1: &[Term] = &[
        (628331966747.0, 0.0, 0.0),
        (206059.0, 2.678235, 6283.07585),
        (4303.0, 2.6351, 12566.1517),
        (425.0, 1.59, 3.523),
        (119.0, 5.796, 26.298),
        (109.0, 2.966, 1577.344),
        (93.0, 2.59, 18849.23),
        (72.0, 1.14, 529.69),
        (68.0, 1.87, 398.15),
        (67.0, 4.41, 5507.55),
        (59.0, 2.89, 5223.69),
        (56.0, 2.17, 155.42),
        (45.0, 0.4, 796.3),
        (36.0, 0.47, 775.52),
        (29.0, 2.65, 7.11),
        (21.0, 5.34, 0.98),
        (19.0, 1.85, 5486.78),
        (19.0, 4.97, 213.3),
        (17.0, 2.99, 6275.96),
        (16.0, 0.03, 2544.31),
        (16.0, 1.43, 2146.17),
        (15.0, 1.21, 10977.08),
        (12.0, 2.83, 1748.02),
        (12.0, 3.26, 5088.63),
        (12.0, 5.27, 1194.45),
        (12.0, 2.08, 4694.0),
        (11.0, 0.77, 553.57),
        (10.0, 1.3, 6286.6),
        (10.0, 4.24, 1349.87),
        (9.0, 2.7, 242.73),
        (9.0, 5.64, 951.72),
        (8.0, 5.3, 2352.87),
        (6.0, 2.65, 9437.76),
        (6.0, 4.67, 4690.48),
    ];
    const L2: &[Term] = &[
        (52919.0, 0.0, 0.0),
        (8720.0, 1.0721, 6283.0758),
        (309.0, 0.867, 12566.152),
        (27.0, 0.05, 3.52),
        (16.0, 5.19, 26.3),
        (16.0, 3.68, 155.42),
        (10.0, 0.76, 18849.23),
        (9.0, 2.06, 77713.77),
        (7.0, 0.83, 775.52),
        (5.0, 4.66, 1577.34),
        (4.0, 1.03, 7.11),
        (4.0, 3.44, 5573.14),
        (3.0, 5.14, 796.3),
        (3.0, 6.05, 5507.55),
        (3.0, 1.19, 242.73),
        (3.0, 6.12, 529.69),
        (3.0, 0.31, 398.15),
        (3.0, 2.28, 553.57),
        (2.0, 4.38, 5223.69),
        (2.0, 3.75, 0.98),
    ];
    const L3: &[Term] = &[
        (289.0, 5.844, 6283.076),
        (35.0, 0.0, 0.0),
        (17.0, 5.49, 12566.15),
        (3.0, 5.2, 155.42),
        (1.0, 4.72, 3.52),
        (1.0, 5.3, 18849.23),
        (1.0, 5.97, 242.73),
    ];
    const L4: &[Term] = &[(114.0, 3.142, 0.0), (8.0, 4.13, 6283.08), (1.0, 3.84, 12566.15)];
    const L5: &[Term] = &[(1.0, 3.14, 0.0)];

    const R0: &[Term] = &[
        (100013989.0, 0.0, 0.0),
        (1670700.0, 3.0984635, 6283.07585),
        (13956.0, 3.05525, 12566.1517),
        (3084.0, 5.1985, 77713.7715),
        (1628.0, 1.1739, 5753.3849),
        (1576.0, 2.8469, 7860.4194),
        (925.0, 5.453, 11506.77),
        (542.0, 4.564, 3930.21),
        (472.0, 3.661, 5884.927),
        (346.0, 0.964, 5507.553),
        (329.0, 5.9, 5223.694),
        (307.0, 0.299, 5573.143),
        (243.0, 4.273, 11790.629),
        (212.0, 5.847, 1577.344),
        (186.0, 5.022, 10977.079),
        (175.0, 3.012, 18849.228),
        (110.0, 5.055, 5486.778),
        (98.0, 0.89, 6069.78),
        (86.0, 5.69, 15720.84),
        (86.0, 1.27, 161000.69),
        (65.0, 0.27, 17260.15),
        (63.0, 0.92, 529.69),
        (57.0, 2.01, 83996.85),
        (56.0, 5.24, 71430.7),
        (49.0, 3.25, 2544.31),
        (47.0, 2.58, 775.52),
        (45.0, 5.54, 9437.76),
        (43.0, 6.01, 6275.96),
        (39.0, 5.36, 4694.0),
        (38.0, 2.39, 8827.39),
        (37.0, 0.83, 19651.05),
        (37.0, 4.9, 12139.55),
        (36.0, 1.67, 12036.46),
        (35.0, 1.84, 2942.46),
        (33.0, 0.24, 7084.9),
        (32.0, 0.18, 5088.63),
        (32.0, 1.78, 398.15),
        (28.0, 1.21, 6286.6),
        (28.0, 1.9, 6279.55),
        (26.0, 4.59, 10447.39),
    ];
    const R1: &[Term] = &[
        (103019.0, 1.10749, 6283.07585),
        (1721.0, 1.0644, 12566.1517),
        (702.0, 3.142, 0.0),
        (32.0, 1.02, 18849.23),
        (31.0, 2.84, 5507.55),
        (25.0, 1.32, 5223.69),
        (18.0, 1.42, 1577.34),
        (10.0, 5.91, 10977.08),
        (9.0, 1.42, 6275.96),
        (9.0, 0.27, 5486.78),
    ];
    const R2: &[Term] = &[
        (4359.0, 5.7846, 6283.0758),
        (124.0, 5.579, 12566.152),
        (12.0, 3.14, 0.0),
        (9.0, 3.63, 77713.77),
        (6.0, 1.87, 5573.14),
        (3.0, 5.47, 18849.23),
    ];
    const R3: &[Term] = &[(145.0, 4.273, 6283.076), (7.0, 3.92, 12566.15)];
    const R4: &[Term] = &[(4.0, 2.56, 6283.08)];
}

/// 第 0 個平朔（2000-01-06）的時刻
const NEW_MOON_EPOCH: f64 = 2451550.09766;

/// 求第 `k` 個朔的時刻，`k = 0` 為 2000 年 1 月 6 日之朔。
pub fn new_moon(k: i64) -> Tt {
    let k = k as f64;
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let jde = NEW_MOON_EPOCH + SYNODIC_MONTH * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;

    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let m = (2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3).to_radians();
    let mp = (201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3
        - 0.000000058 * t4)
        .to_radians();
    let f = (160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3
        + 0.000000011 * t4)
        .to_radians();
    let omega = (124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3).to_radians();

    let periodic = -0.40720 * mp.sin()
        + 0.17241 * e * m.sin()
        + 0.01608 * (2.0 * mp).sin()
        + 0.01039 * (2.0 * f).sin()
        + 0.00739 * e * (mp - m).sin()
        - 0.00514 * e * (mp + m).sin()
        + 0.00208 * e * e * (2.0 * m).sin()
        - 0.00111 * (mp - 2.0 * f).sin()
        - 0.00057 * (mp + 2.0 * f).sin()
        + 0.00056 * e * (2.0 * mp + m).sin()
        - 0.00042 * (3.0 * mp).sin()
        + 0.00042 * e * (m + 2.0 * f).sin()
        + 0.00038 * e * (m - 2.0 * f).sin()
        - 0.00024 * e * (2.0 * mp - m).sin()
        - 0.00017 * omega.sin()
        - 0.00007 * (mp + 2.0 * m).sin()
        + 0.00004 * (2.0 * mp - 2.0 * f).sin()
        + 0.00004 * (3.0 * m).sin()
        + 0.00003 * (mp + m - 2.0 * f).sin()
        + 0.00003 * (2.0 * mp + 2.0 * f).sin()
        - 0.00003 * (mp + m + 2.0 * f).sin()
        + 0.00003 * (mp - m + 2.0 * f).sin()
        - 0.00002 * (mp - m - 2.0 * f).sin()
        - 0.00002 * (3.0 * mp + m).sin()
        + 0.00002 * (4.0 * mp).sin();

    // 行星攝動改正：(係數, 初相, 每朔增量)
    const PLANETARY: [(f64, f64, f64); 14] = [
        (0.000325, 299.77, 0.107408),
        (0.000165, 251.88, 0.016321),
        (0.000164, 251.83, 26.651886),
        (0.000126, 349.42, 36.412478),
        (0.000110, 84.66, 18.206239),
        (0.000062, 141.74, 53.303771),
        (0.000060, 207.14, 2.453732),
        (0.000056, 154.84, 7.306860),
        (0.000047, 34.52, 27.261239),
        (0.000042, 207.19, 0.121824),
        (0.000040, 291.34, 1.844379),
        (0.000037, 161.72, 24.198154),
        (0.000035, 239.56, 25.513099),
        (0.000023, 331.55, 3.592518),
    ];
    let planetary: f64 = PLANETARY
        .iter()
        .enumerate()
        .map(|(i, &(coeff, phase, rate))| {
            let mut arg = phase + rate * k;
            if i == 0 {
                arg -= 0.009173 * t2;
            }
            coeff * arg.to_radians().sin()
        })
        .sum();

    Tt(jde + periodic + planetary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::Date;
    use crate::time_scales::Ut;

    fn date_cst(tt: Tt) -> Date {
        Ut::from_tt(tt).date_in_timezone(480)
    }

    #[test]
    fn solar_terms() {
        let annus = Annus::compute(2000);
        assert_eq!("1999-12-22", date_cst(annus.solar_term[0]).iso_gregorian());
        assert_eq!("2000-01-06", date_cst(annus.solar_term[1]).iso_gregorian());
        assert_eq!("2000-02-04", date_cst(annus.solar_term[3]).iso_gregorian());
        assert_eq!("2000-12-21", date_cst(annus.solar_term[24]).iso_gregorian());
    }

    #[test]
    fn longitude_at_solar_term() {
        let tt = solar_term(2023, 3);
        let lon = sun_apparent_longitude(tt);
        assert!((lon - 315.0).abs() < 1e-6, "{lon}");
    }

    #[test]
    fn apparent_longitude() {
        // Meeus, example 25.b: 1992-10-13T00:00 TD, λ = 199°54′21.818″
        let lon = sun_apparent_longitude(Tt(2448908.5));
        let std = 199.0 + 54.0 / 60.0 + 21.818 / 3600.0;
        assert!((lon - std).abs() < 0.001, "{lon}");
    }

    #[test]
    fn solar_term_near_midnight() {
        // 2014 驚蟄：2014-03-06 00:02 北京時間
        let annus = Annus::compute(2014);
        assert_eq!("2014-03-06", date_cst(annus.solar_term[5]).iso_gregorian());
        assert_eq!(
            "2014-03-06",
            date_cst(solar_term(2014, 5)).iso_gregorian()
        );
    }

    #[test]
    fn new_moons() {
        // Meeus, example 49.a: 1977-02-18T03:37:42 TD
        let tt = new_moon(-283);
        assert!((tt.0 - 2443192.65118).abs() < 1e-3, "{}", tt.0);

        let annus = Annus::compute(2000);
        assert_eq!("1999-11-08", date_cst(annus.new_moon[1]).iso_gregorian());
        assert_eq!("1999-12-08", date_cst(annus.new_moon[2]).iso_gregorian());
        assert_eq!("2000-01-07", date_cst(annus.new_moon[3]).iso_gregorian());
    }
}
