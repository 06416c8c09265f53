//! Bridge between an in-memory [`WeekSchedule`] and the `food_tracker` table.
//!
//! The adapter never panics and never lets a store fault escape where the
//! caller expects a plain answer: writes report `bool`, listings come back
//! empty, existence checks come back `false`. Loads are the exception and
//! surface the fault when no cached copy can stand in for the remote one.

use crate::calendar;
use crate::persistence::{
    DayRecord, LocalCache, PersistenceError, PersistenceResult, WeekTable, fold_records,
    records_for,
};
use crate::week::WeekSchedule;
use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

/// Where a loaded schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekSource {
    Remote,
    Cache,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedWeek {
    pub schedule: WeekSchedule,
    pub source: WeekSource,
}

pub struct WeekStoreAdapter {
    table: Option<Box<dyn WeekTable>>,
    cache: LocalCache,
}

impl WeekStoreAdapter {
    pub fn new(table: Option<Box<dyn WeekTable>>, cache: LocalCache) -> Self {
        Self { table, cache }
    }

    /// Cache-only adapter; every remote operation degrades.
    pub fn offline(cache: LocalCache) -> Self {
        Self::new(None, cache)
    }

    pub fn is_configured(&self) -> bool {
        self.table.is_some()
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn describe(&self) -> String {
        match &self.table {
            Some(table) => table.describe(),
            None => "local cache only".to_string(),
        }
    }

    fn table(&self, operation: &str) -> Option<&dyn WeekTable> {
        let table = self.table.as_deref();
        if table.is_none() {
            warn!(target: "food_tracker::store", operation, "remote store not configured");
        }
        table
    }

    fn refresh_cache(&self, schedule: &WeekSchedule) {
        if let Err(err) = self.cache.write(schedule) {
            warn!(target: "food_tracker::cache", week = %schedule.key(), error = %err, "cache refresh failed");
        }
    }

    fn cached(&self, week_start: NaiveDate) -> Option<LoadedWeek> {
        self.cache.read(week_start).map(|schedule| LoadedWeek {
            schedule,
            source: WeekSource::Cache,
        })
    }

    /// Remote rows folded into a schedule, `Ok(None)` when the week has none.
    ///
    /// On a remote fault the cached snapshot of the same week is served. The
    /// fault is returned only when no snapshot exists.
    pub async fn load_week(&self, week_start: NaiveDate) -> PersistenceResult<Option<LoadedWeek>> {
        let week_start = calendar::week_start_of(week_start);
        let week = calendar::week_key(week_start);
        let Some(table) = self.table("load_week") else {
            return Ok(self.cached(week_start));
        };

        let fetched = match table.select_week(week_start).await {
            Ok(records) if records.is_empty() => return Ok(None),
            Ok(records) => fold_records(week_start, records),
            Err(err) => Err(err),
        };

        match fetched {
            Ok(schedule) => {
                debug!(target: "food_tracker::store", %week, "week loaded from remote");
                self.refresh_cache(&schedule);
                Ok(Some(LoadedWeek {
                    schedule,
                    source: WeekSource::Remote,
                }))
            }
            Err(err) => match self.cached(week_start) {
                Some(loaded) => {
                    warn!(target: "food_tracker::store", %week, error = %err, "remote load failed, serving cached copy");
                    Ok(Some(loaded))
                }
                None => {
                    warn!(target: "food_tracker::store", %week, error = %err, "remote load failed, no cached copy");
                    Err(err)
                }
            },
        }
    }

    /// Upserts all seven rows in one call.
    pub async fn save_week(&self, schedule: &WeekSchedule) -> bool {
        let Some(table) = self.table("save_week") else {
            return false;
        };
        let now = Utc::now();
        let records: Vec<DayRecord> = records_for(schedule)
            .into_iter()
            .map(|record| record.stamped(now))
            .collect();

        match table.upsert(&records).await {
            Ok(()) => {
                debug!(target: "food_tracker::store", week = %schedule.key(), "week saved");
                self.refresh_cache(schedule);
                true
            }
            Err(err) => {
                warn!(target: "food_tracker::store", week = %schedule.key(), error = %err, "save_week failed");
                false
            }
        }
    }

    /// Single-row upsert on the same `(week_start, day_name)` key.
    pub async fn save_day(&self, record: &DayRecord) -> bool {
        let Some(table) = self.table("save_day") else {
            return false;
        };
        let record = DayRecord::new(record.week_start, record.day_name, record.entry.clone())
            .stamped(Utc::now());
        let week_start = record.week_start;

        match table.upsert(std::slice::from_ref(&record)).await {
            Ok(()) => {
                let mut cached = self
                    .cache
                    .read(week_start)
                    .unwrap_or_else(|| WeekSchedule::empty(week_start));
                cached.set_day(record.day_name, record.entry);
                self.refresh_cache(&cached);
                true
            }
            Err(err) => {
                warn!(
                    target: "food_tracker::store",
                    week = %calendar::week_key(week_start),
                    day = %record.day_name,
                    error = %err,
                    "save_day failed"
                );
                false
            }
        }
    }

    pub async fn week_exists(&self, week_start: NaiveDate) -> bool {
        match self.check_week(week_start).await {
            Ok(exists) => exists,
            Err(err) => {
                warn!(
                    target: "food_tracker::store",
                    week = %calendar::week_key(week_start),
                    error = %err,
                    "week_exists failed"
                );
                false
            }
        }
    }

    /// Existence check that keeps "absent" apart from "could not ask".
    /// An unconfigured store is `Err(NotConfigured)`.
    pub async fn check_week(&self, week_start: NaiveDate) -> PersistenceResult<bool> {
        let table = self.table.as_deref().ok_or(PersistenceError::NotConfigured)?;
        table.has_week(calendar::week_start_of(week_start)).await
    }

    /// Deletes every row of the week, then its cached snapshot.
    ///
    /// An unconfigured or unreachable store is an error, never a silent
    /// success.
    pub async fn reset_week(&self, week_start: NaiveDate) -> PersistenceResult<()> {
        let week_start = calendar::week_start_of(week_start);
        let Some(table) = self.table("reset_week") else {
            return Err(PersistenceError::NotConfigured);
        };
        if let Err(err) = table.delete_week(week_start).await {
            warn!(
                target: "food_tracker::store",
                week = %calendar::week_key(week_start),
                error = %err,
                "reset_week failed"
            );
            return Err(err);
        }
        if let Err(err) = self.cache.remove(week_start) {
            warn!(target: "food_tracker::cache", error = %err, "cache entry not removed");
        }
        Ok(())
    }

    /// Distinct stored week keys, most recent first. Empty on any fault.
    pub async fn list_week_keys(&self) -> Vec<NaiveDate> {
        let Some(table) = self.table("list_week_keys") else {
            return Vec::new();
        };
        match table.week_starts().await {
            Ok(mut keys) => {
                keys.sort_unstable_by(|a, b| b.cmp(a));
                keys.dedup();
                keys
            }
            Err(err) => {
                warn!(target: "food_tracker::store", error = %err, "list_week_keys failed");
                Vec::new()
            }
        }
    }
}
