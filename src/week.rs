use crate::calendar;
use crate::day::{DayEntry, DayName, MealField};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Seven day entries keyed by the Monday that starts the week.
///
/// The slot array is fixed-size so a schedule can never be missing a day,
/// and the constructor normalizes whatever date it is given to its Monday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSchedule {
    week_start: NaiveDate,
    days: [DayEntry; 7],
}

impl WeekSchedule {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            week_start: calendar::week_start_of(date),
            days: Default::default(),
        }
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn key(&self) -> String {
        calendar::week_key(self.week_start)
    }

    pub fn day(&self, day: DayName) -> &DayEntry {
        &self.days[day.index()]
    }

    pub fn day_mut(&mut self, day: DayName) -> &mut DayEntry {
        &mut self.days[day.index()]
    }

    pub fn set_day(&mut self, day: DayName, entry: DayEntry) {
        self.days[day.index()] = entry;
    }

    pub fn get(&self, day: DayName, field: MealField) -> &str {
        self.day(day).get(field)
    }

    pub fn set(&mut self, day: DayName, field: MealField, value: impl Into<String>) {
        self.day_mut(day).set(field, value);
    }

    /// Days in Monday→Sunday order.
    pub fn iter(&self) -> impl Iterator<Item = (DayName, &DayEntry)> {
        DayName::ALL.into_iter().zip(self.days.iter())
    }

    pub fn is_blank(&self) -> bool {
        self.days.iter().all(DayEntry::is_blank)
    }

    pub fn filled_days(&self) -> usize {
        self.days.iter().filter(|entry| !entry.is_blank()).count()
    }
}

#[derive(Serialize, Deserialize)]
struct WeekSnapshot {
    week_start: NaiveDate,
    #[serde(default)]
    days: BTreeMap<DayName, DayEntry>,
}

impl Serialize for WeekSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let snapshot = WeekSnapshot {
            week_start: self.week_start,
            days: self
                .iter()
                .map(|(day, entry)| (day, entry.clone()))
                .collect(),
        };
        snapshot.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WeekSchedule {
    /// Missing days come back empty; the key is re-normalized to its Monday.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = WeekSnapshot::deserialize(deserializer)?;
        let mut schedule = WeekSchedule::empty(snapshot.week_start);
        for (day, entry) in snapshot.days {
            schedule.set_day(day, entry);
        }
        Ok(schedule)
    }
}
