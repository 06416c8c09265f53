use super::{
    DayRecord, PersistenceError, PersistenceResult, TABLE_NAME, WeekTable, parse_timestamp,
};
use crate::calendar;
use crate::day::{DayEntry, DayName};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// The `food_tracker` table in a local SQLite file.
///
/// Statements run inline on the calling task: a local single-user file
/// answers in microseconds, so the async methods never hand off to a
/// blocking pool.
pub struct SqliteTable {
    connection: Mutex<Connection>,
    location: String,
}

impl SqliteTable {
    pub fn new<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let location: PathBuf = path.as_ref().to_path_buf();
        let connection = Connection::open(&location)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
            location: location.display().to_string(),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
            location: ":memory:".to_string(),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS food_tracker (
                id INTEGER PRIMARY KEY,
                week_start TEXT NOT NULL,
                day_name TEXT NOT NULL,
                day_order INTEGER NOT NULL CHECK (day_order BETWEEN 1 AND 7),
                morning TEXT NOT NULL DEFAULT '',
                vegetable TEXT NOT NULL DEFAULT '',
                protein TEXT NOT NULL DEFAULT '',
                fruit_lunch TEXT NOT NULL DEFAULT '',
                snack TEXT NOT NULL DEFAULT '',
                evening TEXT NOT NULL DEFAULT '',
                remarks TEXT NOT NULL DEFAULT '',
                updated_at TEXT,
                UNIQUE (week_start, day_name)
            );
            CREATE INDEX IF NOT EXISTS idx_food_tracker_week_start
                ON food_tracker(week_start);
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn upsert_blocking(&self, records: &[DayRecord]) -> PersistenceResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO food_tracker (
                    week_start, day_name, day_order, morning, vegetable, protein,
                    fruit_lunch, snack, evening, remarks, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                ON CONFLICT(week_start, day_name) DO UPDATE SET
                    day_order = excluded.day_order,
                    morning = excluded.morning,
                    vegetable = excluded.vegetable,
                    protein = excluded.protein,
                    fruit_lunch = excluded.fruit_lunch,
                    snack = excluded.snack,
                    evening = excluded.evening,
                    remarks = excluded.remarks,
                    updated_at = excluded.updated_at",
            )?;
            for record in records {
                let entry = &record.entry;
                stmt.execute(params![
                    calendar::week_key(record.week_start),
                    record.day_name.as_str(),
                    record.day_order,
                    entry.morning,
                    entry.vegetable,
                    entry.protein,
                    entry.fruit_lunch,
                    entry.snack,
                    entry.evening,
                    entry.remarks,
                    record.updated_at.map(|at| at.to_rfc3339()),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn select_blocking(&self, week_start: NaiveDate) -> PersistenceResult<Vec<DayRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT week_start, day_name, day_order, morning, vegetable, protein,
                    fruit_lunch, snack, evening, remarks, updated_at
             FROM food_tracker WHERE week_start = ?1 ORDER BY day_order ASC",
        )?;
        let rows = stmt.query_map(params![calendar::week_key(week_start)], read_raw_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    fn delete_blocking(&self, week_start: NaiveDate) -> PersistenceResult<()> {
        let conn = self.lock();
        conn.execute(
            "DELETE FROM food_tracker WHERE week_start = ?1",
            params![calendar::week_key(week_start)],
        )?;
        Ok(())
    }

    fn has_week_blocking(&self, week_start: NaiveDate) -> PersistenceResult<bool> {
        let conn = self.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM food_tracker WHERE week_start = ?1",
            params![calendar::week_key(week_start)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn week_starts_blocking(&self) -> PersistenceResult<Vec<NaiveDate>> {
        let conn = self.lock();
        let mut stmt =
            conn.prepare("SELECT week_start FROM food_tracker ORDER BY week_start DESC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for key in rows {
            let key = key?;
            keys.push(parse_date(&key)?);
        }
        Ok(keys)
    }
}

struct RawRow {
    week_start: String,
    day_name: String,
    day_order: u8,
    entry: DayEntry,
    updated_at: Option<String>,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        week_start: row.get(0)?,
        day_name: row.get(1)?,
        day_order: row.get(2)?,
        entry: DayEntry {
            morning: row.get(3)?,
            vegetable: row.get(4)?,
            protein: row.get(5)?,
            fruit_lunch: row.get(6)?,
            snack: row.get(7)?,
            evening: row.get(8)?,
            remarks: row.get(9)?,
        },
        updated_at: row.get(10)?,
    })
}

impl RawRow {
    fn into_record(self) -> PersistenceResult<DayRecord> {
        let day_name = self
            .day_name
            .parse::<DayName>()
            .map_err(|err| PersistenceError::InvalidData(format!("invalid day_name: {err}")))?;
        let updated_at = self.updated_at.as_deref().and_then(parse_timestamp);
        Ok(DayRecord {
            week_start: parse_date(&self.week_start)?,
            day_name,
            day_order: self.day_order,
            entry: self.entry,
            updated_at,
        })
    }
}

fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

#[async_trait]
impl WeekTable for SqliteTable {
    async fn upsert(&self, records: &[DayRecord]) -> PersistenceResult<()> {
        self.upsert_blocking(records)
    }

    async fn select_week(&self, week_start: NaiveDate) -> PersistenceResult<Vec<DayRecord>> {
        self.select_blocking(week_start)
    }

    async fn delete_week(&self, week_start: NaiveDate) -> PersistenceResult<()> {
        self.delete_blocking(week_start)
    }

    async fn has_week(&self, week_start: NaiveDate) -> PersistenceResult<bool> {
        self.has_week_blocking(week_start)
    }

    async fn week_starts(&self) -> PersistenceResult<Vec<NaiveDate>> {
        self.week_starts_blocking()
    }

    fn describe(&self) -> String {
        format!("sqlite:{}#{TABLE_NAME}", self.location)
    }
}
