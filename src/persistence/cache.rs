use super::PersistenceResult;
use crate::calendar;
use crate::week::WeekSchedule;
use chrono::NaiveDate;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

pub const CACHE_KEY_PREFIX: &str = "foodTracker-";

/// Per-week snapshots on local disk, one JSON file per week-start key.
///
/// Lookups only ever return the snapshot for the exact key requested.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn open<P: AsRef<Path>>(dir: P) -> PersistenceResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_key(week_start: NaiveDate) -> String {
        format!("{CACHE_KEY_PREFIX}{}", calendar::week_key(week_start))
    }

    fn path_for(&self, week_start: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", Self::entry_key(week_start)))
    }

    /// Unreadable or corrupt entries are logged and treated as absent.
    pub fn read(&self, week_start: NaiveDate) -> Option<WeekSchedule> {
        let path = self.path_for(week_start);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(target: "food_tracker::cache", path = %path.display(), error = %err, "cache entry unreadable");
                return None;
            }
        };
        match serde_json::from_str::<WeekSchedule>(&raw) {
            Ok(schedule) if schedule.week_start() == calendar::week_start_of(week_start) => {
                Some(schedule)
            }
            Ok(schedule) => {
                warn!(
                    target: "food_tracker::cache",
                    path = %path.display(),
                    stored = %schedule.key(),
                    "cache entry holds another week"
                );
                None
            }
            Err(err) => {
                warn!(target: "food_tracker::cache", path = %path.display(), error = %err, "cache entry corrupt");
                None
            }
        }
    }

    /// Overwrites the snapshot for the schedule's week.
    pub fn write(&self, schedule: &WeekSchedule) -> PersistenceResult<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, schedule)?;
        tmp.flush()?;
        tmp.persist(self.path_for(schedule.week_start()))
            .map_err(|err| err.error)?;
        Ok(())
    }

    pub fn remove(&self, week_start: NaiveDate) -> PersistenceResult<()> {
        match fs::remove_file(self.path_for(week_start)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
