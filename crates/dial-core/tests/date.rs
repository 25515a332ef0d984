use dial_core::{
    AddResult, Augend, AugendKind, DateAugend, DateField, DateFormat, DateOptions, RuleConfig,
    TextRange,
};
use serde_json::json;

fn date(format: DateFormat, only_valid: bool) -> DateAugend {
    DateAugend::new(DateOptions { format, only_valid }).unwrap()
}

fn added(text: &str, cursor: usize) -> AddResult {
    AddResult {
        text: Some(text.to_string()),
        cursor: Some(cursor),
    }
}

#[test]
fn test_caret_column_selects_field() {
    let mut augend = date(DateFormat::IsoDate, false);
    let line = "due 2024-01-31.";

    // Caret on the first year digit: byte 4, column 5.
    let range = augend.find_stateful(line, Some(5)).unwrap();
    assert_eq!(range, Some(TextRange::new(4, 14)));
    assert_eq!(augend.field(), DateField::Year);

    augend.find_stateful(line, Some(10)).unwrap();
    assert_eq!(augend.field(), DateField::Month);

    augend.find_stateful(line, Some(13)).unwrap();
    assert_eq!(augend.field(), DateField::Day);

    // Caret before the token falls back to the day.
    augend.find_stateful(line, Some(1)).unwrap();
    assert_eq!(augend.field(), DateField::Day);
}

#[test]
fn test_day_carries_into_next_month() {
    let mut augend = date(DateFormat::IsoDate, false);
    augend.find_stateful("2024-01-31", None).unwrap();
    assert_eq!(augend.field(), DateField::Day);
    assert_eq!(
        augend.add("2024-01-31", 1, None).unwrap(),
        added("2024-02-01", 10)
    );
    assert_eq!(
        augend.add("2024-03-01", -1, None).unwrap(),
        added("2024-02-29", 10)
    );
}

#[test]
fn test_year_on_leap_day_rolls_forward() {
    let mut augend = date(DateFormat::IsoDate, false);
    augend.find_stateful("2024-02-29", Some(1)).unwrap();
    assert_eq!(
        augend.add("2024-02-29", 1, None).unwrap(),
        added("2025-03-01", 4)
    );
}

#[test]
fn test_month_overflow_spills_days() {
    let mut augend = date(DateFormat::SlashDate, false);
    augend.find_stateful("2024/01/31", Some(6)).unwrap();
    assert_eq!(augend.field(), DateField::Month);
    assert_eq!(
        augend.add("2024/01/31", 1, None).unwrap(),
        added("2024/03/02", 7)
    );
    assert_eq!(
        augend.add("2024/01/15", -1, None).unwrap(),
        added("2023/12/15", 7)
    );
}

#[test]
fn test_only_valid_skips_impossible_dates() {
    let loose = date(DateFormat::MonthDay, false);
    let strict = date(DateFormat::MonthDay, true);
    let line = "02/30 03/15";

    assert_eq!(loose.find(line, None).unwrap(), Some(TextRange::new(0, 5)));
    assert_eq!(strict.find(line, None).unwrap(), Some(TextRange::new(6, 11)));
    assert_eq!(strict.find("13/01", None).unwrap(), None);
}

#[test]
fn test_time_wraps_around_midnight() {
    let mut augend = date(DateFormat::HourMinuteSecond, false);
    augend.find_stateful("23:59:59", None).unwrap();
    assert_eq!(augend.field(), DateField::Second);
    assert_eq!(
        augend.add("23:59:59", 1, None).unwrap(),
        added("00:00:00", 8)
    );

    let mut augend = date(DateFormat::HourMinute, false);
    augend.find_stateful("at 23:30", Some(5)).unwrap();
    assert_eq!(augend.field(), DateField::Hour);
    assert_eq!(augend.add("23:30", 1, None).unwrap(), added("00:30", 2));
}

#[test]
fn test_minute_column_in_long_time() {
    let mut augend = date(DateFormat::HourMinuteSecond, false);
    augend.find_stateful("10:59:00", Some(4)).unwrap();
    assert_eq!(augend.field(), DateField::Minute);
    assert_eq!(augend.add("10:59:00", 1, None).unwrap(), added("11:00:00", 5));
}

#[test]
fn test_short_month_day_is_variable_width() {
    let mut augend = date(DateFormat::ShortMonthDay, false);
    assert_eq!(
        augend.find_stateful("on 12/31", None).unwrap(),
        Some(TextRange::new(3, 8))
    );
    assert_eq!(augend.add("12/31", 1, None).unwrap(), added("1/1", 3));

    augend.find_stateful("9/5", Some(1)).unwrap();
    assert_eq!(augend.field(), DateField::Month);
    assert_eq!(augend.add("9/5", 4, None).unwrap(), added("1/5", 1));
}

#[test]
fn test_unknown_format_is_a_configuration_error() {
    let rule = RuleConfig::new(AugendKind::Date, json!({ "format": "dd.MM.yyyy" }));
    let err = rule.build(None).unwrap_err();
    assert!(err.to_string().contains("date"), "{err}");
}

#[test]
fn test_only_ascii_digits_form_a_date() {
    let augend = date(DateFormat::IsoDate, false);
    let line = "２０２４-０１-０１ 2024-01-05";
    assert_eq!(augend.find(line, None).unwrap(), Some(TextRange::new(27, 37)));
    assert_eq!(augend.find("２０２４-０１-０１", None).unwrap(), None);
}
