use crate::day::{DayEntry, DayName};
use crate::week::WeekSchedule;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Name of the remote table holding one row per (week, day).
pub const TABLE_NAME: &str = "food_tracker";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("remote store is not configured")]
    NotConfigured,
    #[cfg(feature = "remote")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote store answered {status}: {body}")]
    Status { status: u16, body: String },
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// One row of the `food_tracker` table. Identity is `(week_start, day_name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub week_start: NaiveDate,
    pub day_name: DayName,
    pub day_order: u8,
    #[serde(flatten)]
    pub entry: DayEntry,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// RFC 3339, or a zone-less `timestamp` column read as UTC. Anything else
/// is `None`; nothing downstream depends on the value.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

impl DayRecord {
    pub fn new(week_start: NaiveDate, day_name: DayName, entry: DayEntry) -> Self {
        Self {
            week_start: crate::calendar::week_start_of(week_start),
            day_name,
            day_order: day_name.order(),
            entry,
            updated_at: None,
        }
    }

    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }
}

/// All seven rows of `schedule`, Monday first.
pub fn records_for(schedule: &WeekSchedule) -> Vec<DayRecord> {
    schedule
        .iter()
        .map(|(day, entry)| DayRecord::new(schedule.week_start(), day, entry.clone()))
        .collect()
}

/// Folds rows into a schedule after ordering them by `day_order`. Rows for
/// other weeks are rejected; days without a row stay empty.
pub fn fold_records(
    week_start: NaiveDate,
    mut records: Vec<DayRecord>,
) -> PersistenceResult<WeekSchedule> {
    let mut schedule = WeekSchedule::empty(week_start);
    records.sort_by_key(|record| record.day_order);
    for record in records {
        if crate::calendar::week_start_of(record.week_start) != schedule.week_start() {
            return Err(PersistenceError::InvalidData(format!(
                "row for week {} returned while loading week {}",
                record.week_start,
                schedule.key()
            )));
        }
        schedule.set_day(record.day_name, record.entry);
    }
    Ok(schedule)
}

/// Tabular store holding `food_tracker` rows.
///
/// Implementations report faults; degrading to empty results is the
/// adapter's job.
#[async_trait]
pub trait WeekTable: Send + Sync {
    /// Insert-or-overwrite on `(week_start, day_name)`.
    async fn upsert(&self, records: &[DayRecord]) -> PersistenceResult<()>;
    async fn select_week(&self, week_start: NaiveDate) -> PersistenceResult<Vec<DayRecord>>;
    async fn delete_week(&self, week_start: NaiveDate) -> PersistenceResult<()>;
    async fn has_week(&self, week_start: NaiveDate) -> PersistenceResult<bool>;
    /// Week keys of every stored row; may contain duplicates.
    async fn week_starts(&self) -> PersistenceResult<Vec<NaiveDate>>;
    fn describe(&self) -> String;
}

pub mod cache;
pub mod file;
#[cfg(feature = "remote")]
pub mod rest;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cache::LocalCache;
pub use file::{load_week_from_csv, load_week_from_json, save_week_to_csv, save_week_to_json};
