use super::{PersistenceError, PersistenceResult};
use crate::calendar;
use crate::day::{DayEntry, DayName};
use crate::week::WeekSchedule;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub fn save_week_to_json<P: AsRef<Path>>(schedule: &WeekSchedule, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    Ok(())
}

pub fn load_week_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<WeekSchedule> {
    let file = File::open(path)?;
    let schedule: WeekSchedule = serde_json::from_reader(file)?;
    Ok(schedule)
}

#[derive(Default, Serialize, Deserialize)]
struct DayCsvRecord {
    week_start: String,
    day_name: String,
    day_order: u8,
    #[serde(default)]
    morning: String,
    #[serde(default)]
    vegetable: String,
    #[serde(default)]
    protein: String,
    #[serde(default)]
    fruit_lunch: String,
    #[serde(default)]
    snack: String,
    #[serde(default)]
    evening: String,
    #[serde(default)]
    remarks: String,
}

impl DayCsvRecord {
    fn from_day(week_start: NaiveDate, day: DayName, entry: &DayEntry) -> Self {
        Self {
            week_start: calendar::week_key(week_start),
            day_name: day.as_str().to_string(),
            day_order: day.order(),
            morning: entry.morning.clone(),
            vegetable: entry.vegetable.clone(),
            protein: entry.protein.clone(),
            fruit_lunch: entry.fruit_lunch.clone(),
            snack: entry.snack.clone(),
            evening: entry.evening.clone(),
            remarks: entry.remarks.clone(),
        }
    }

    fn into_day(self) -> PersistenceResult<(NaiveDate, DayName, DayEntry)> {
        let week_start = calendar::parse_week_key(&self.week_start).ok_or_else(|| {
            PersistenceError::InvalidData(format!("invalid week_start '{}'", self.week_start))
        })?;
        let day = self
            .day_name
            .parse::<DayName>()
            .map_err(|err| PersistenceError::InvalidData(format!("invalid day_name: {err}")))?;
        if day.order() != self.day_order {
            return Err(PersistenceError::InvalidData(format!(
                "day_order {} does not match {}",
                self.day_order, day
            )));
        }
        let entry = DayEntry {
            morning: self.morning,
            vegetable: self.vegetable,
            protein: self.protein,
            fruit_lunch: self.fruit_lunch,
            snack: self.snack,
            evening: self.evening,
            remarks: self.remarks,
        };
        Ok((week_start, day, entry))
    }
}

/// One row per day, Monday first, using the `food_tracker` column names.
pub fn save_week_to_csv<P: AsRef<Path>>(schedule: &WeekSchedule, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for (day, entry) in schedule.iter() {
        writer.serialize(DayCsvRecord::from_day(schedule.week_start(), day, entry))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_week_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<WeekSchedule> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut schedule: Option<WeekSchedule> = None;
    for record in reader.deserialize::<DayCsvRecord>() {
        let (week_start, day, entry) = record?.into_day()?;
        let schedule = schedule.get_or_insert_with(|| WeekSchedule::empty(week_start));
        if schedule.week_start() != week_start {
            return Err(PersistenceError::InvalidData(format!(
                "CSV file mixes weeks {} and {}",
                schedule.key(),
                calendar::week_key(week_start)
            )));
        }
        schedule.set_day(day, entry);
    }
    schedule.ok_or_else(|| PersistenceError::InvalidData("CSV file contained no days".into()))
}
