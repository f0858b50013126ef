#![cfg(feature = "serde")]

use sizhu::chinese::{DoubleHour, FourPillars, by_solar_date};

#[test]
fn four_pillars_round_trip_through_json() {
    let pillars = by_solar_date("2023-07-04", DoubleHour::new(2).unwrap()).unwrap();
    let json = serde_json::to_string(&pillars).unwrap();
    assert!(json.contains("\"yearly\":{\"stem\":\"Gui\",\"branch\":\"Mao\"}"), "{json}");
    let back: FourPillars = serde_json::from_str(&json).unwrap();
    assert_eq!(pillars, back);
}

#[test]
fn double_hour_is_a_plain_index() {
    assert_eq!("12", serde_json::to_string(&DoubleHour::LATE_ZI).unwrap());
    assert_eq!(
        DoubleHour::new(3).unwrap(),
        serde_json::from_str::<DoubleHour>("3").unwrap()
    );
    assert!(serde_json::from_str::<DoubleHour>("13").is_err());
}
