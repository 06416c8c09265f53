use chrono::NaiveDate;
use food_tracker::options::{VEGETABLES, is_allowed, resolve_option};
use food_tracker::{DayEntry, DayName, MealField, WeekSchedule};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn empty_week_has_seven_blank_days_keyed_by_monday() {
    let week = WeekSchedule::empty(d(2024, 6, 7));
    assert_eq!(week.week_start(), d(2024, 6, 3));
    assert_eq!(week.key(), "2024-06-03");
    let days: Vec<DayName> = week.iter().map(|(day, _)| day).collect();
    assert_eq!(days, DayName::ALL.to_vec());
    assert!(week.is_blank());
    assert_eq!(week.filled_days(), 0);
}

#[test]
fn setting_a_field_touches_only_that_day() {
    let mut week = WeekSchedule::empty(d(2024, 6, 3));
    week.set(DayName::Tuesday, MealField::Vegetable, "Carottes");
    assert_eq!(week.get(DayName::Tuesday, MealField::Vegetable), "Carottes");
    assert_eq!(week.get(DayName::Monday, MealField::Vegetable), "");
    assert_eq!(week.filled_days(), 1);
}

#[test]
fn day_names_parse_french_and_english() {
    assert_eq!("Mardi".parse::<DayName>().unwrap(), DayName::Tuesday);
    assert_eq!("sunday".parse::<DayName>().unwrap(), DayName::Sunday);
    assert_eq!("WED".parse::<DayName>().unwrap(), DayName::Wednesday);
    assert!("someday".parse::<DayName>().is_err());
    assert_eq!(DayName::Monday.order(), 1);
    assert_eq!(DayName::from_order(7), Some(DayName::Sunday));
    assert_eq!(DayName::from_order(8), None);
}

#[test]
fn day_names_serialize_as_stored_french_names() {
    let json = serde_json::to_string(&DayName::Wednesday).unwrap();
    assert_eq!(json, "\"Mercredi\"");
}

#[test]
fn null_columns_deserialize_as_empty_strings() {
    let entry: DayEntry =
        serde_json::from_str(r#"{"morning": null, "vegetable": "Carottes"}"#).unwrap();
    assert_eq!(entry.morning, "");
    assert_eq!(entry.vegetable, "Carottes");
    assert_eq!(entry.remarks, "");
}

#[test]
fn midday_parts_skip_unset_fields() {
    let mut entry = DayEntry::default();
    entry.vegetable = "Courgettes".into();
    entry.fruit_lunch = "Poire".into();
    assert_eq!(entry.midday_parts(), vec!["Courgettes", "Poire"]);
}

#[test]
fn snapshot_json_fills_missing_days() {
    let json = r#"{"week_start": "2024-06-05", "days": {"Lundi": {"vegetable": "Carottes"}}}"#;
    let week: WeekSchedule = serde_json::from_str(json).unwrap();
    assert_eq!(week.week_start(), d(2024, 6, 3));
    assert_eq!(week.get(DayName::Monday, MealField::Vegetable), "Carottes");
    assert!(week.day(DayName::Sunday).is_blank());
}

#[test]
fn catalog_fields_reject_unknown_values() {
    assert!(is_allowed(MealField::Vegetable, "Carottes"));
    assert!(!is_allowed(MealField::Vegetable, "Choux"));
    assert!(is_allowed(MealField::Vegetable, ""));
    assert!(is_allowed(MealField::Remarks, "anything at all"));
}

#[test]
fn options_resolve_by_index_and_prefix() {
    assert_eq!(
        resolve_option(MealField::Vegetable, "1"),
        Some(VEGETABLES[0].to_string())
    );
    assert_eq!(
        resolve_option(MealField::Vegetable, "brOc"),
        Some("Brocolis".to_string())
    );
    // ambiguous prefix
    assert_eq!(resolve_option(MealField::Protein, "10g"), None);
    assert_eq!(resolve_option(MealField::Vegetable, "99"), None);
    assert_eq!(
        resolve_option(MealField::Remarks, " a bien mangé "),
        Some("a bien mangé".to_string())
    );
}
