use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

const KEY_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Monday of the week containing `date`.
///
/// Sunday belongs to the week that started six days earlier; any other day
/// steps back `weekday - 1` days with Monday counted as 1.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let back = match date.weekday() {
        Weekday::Sun => 6,
        other => i64::from(other.number_from_monday()) - 1,
    };
    date - Duration::days(back)
}

/// Moves `week_start` by `weeks` whole weeks and re-normalizes to a Monday.
pub fn shift_weeks(week_start: NaiveDate, weeks: i64) -> NaiveDate {
    week_start_of(week_start + Duration::days(7 * weeks))
}

pub fn current_week_start() -> NaiveDate {
    week_start_of(Local::now().date_naive())
}

pub fn is_week_start(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Mon
}

/// Last day (Sunday) of the week beginning at `week_start`.
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start_of(week_start) + Duration::days(6)
}

/// Date of each day in the week, Monday first.
pub fn days_of_week(week_start: NaiveDate) -> [NaiveDate; 7] {
    let monday = week_start_of(week_start);
    std::array::from_fn(|offset| monday + Duration::days(offset as i64))
}

/// ISO key used to partition stored rows, e.g. `2024-06-03`.
pub fn week_key(week_start: NaiveDate) -> String {
    week_start_of(week_start).format(KEY_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD` and normalizes it to the Monday of its week.
pub fn parse_week_key(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), KEY_FORMAT)
        .ok()
        .map(week_start_of)
}

/// `Semaine du 03/06/2024 au 09/06/2024`
pub fn format_week_range(week_start: NaiveDate) -> String {
    let start = week_start_of(week_start);
    format!(
        "Semaine du {} au {}",
        start.format(DISPLAY_FORMAT),
        week_end(start).format(DISPLAY_FORMAT)
    )
}
