use crate::adapter::{LoadedWeek, WeekSource, WeekStoreAdapter};
use crate::calendar;
use crate::day::{DayName, MealField};
use crate::guidance;
use crate::options;
use crate::persistence::DayRecord;
use crate::report;
use crate::week::WeekSchedule;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Persistence state shown next to the week title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStatus {
    /// Nothing stored remotely for this week yet.
    Planning,
    /// The remote store holds this week.
    Saved,
    /// Remote store unconfigured or unreachable; edits live in the cache.
    LocalOnly,
}

impl WeekStatus {
    pub fn label(self) -> &'static str {
        match self {
            WeekStatus::Planning => "planification",
            WeekStatus::Saved => "sauvegardée",
            WeekStatus::LocalOnly => "hors ligne",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("'{value}' is not an option for {field}")]
    InvalidOption { field: MealField, value: String },
}

/// Top-level form state: the displayed week and everything derived from it.
///
/// Edits only touch the in-memory schedule and the local cache; the remote
/// store is written by explicit saves.
pub struct WeekForm {
    adapter: WeekStoreAdapter,
    schedule: WeekSchedule,
    status: WeekStatus,
    dirty: bool,
    message: Option<String>,
}

impl WeekForm {
    pub async fn open(adapter: WeekStoreAdapter, date: NaiveDate) -> Self {
        let mut form = Self {
            adapter,
            schedule: WeekSchedule::empty(date),
            status: WeekStatus::Planning,
            dirty: false,
            message: None,
        };
        form.load(date).await;
        form
    }

    pub fn week_start(&self) -> NaiveDate {
        self.schedule.week_start()
    }

    pub fn schedule(&self) -> &WeekSchedule {
        &self.schedule
    }

    pub fn status(&self) -> WeekStatus {
        self.status
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn adapter(&self) -> &WeekStoreAdapter {
        &self.adapter
    }

    pub fn week_label(&self) -> String {
        calendar::format_week_range(self.week_start())
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    fn cache_current(&self) {
        if let Err(err) = self.adapter.cache().write(&self.schedule) {
            warn!(target: "food_tracker::form", week = %self.schedule.key(), error = %err, "local save failed");
        }
    }

    /// Remote copy first, then the cached copy (which may hold unsaved
    /// edits), then a blank week.
    async fn load(&mut self, date: NaiveDate) {
        let week_start = calendar::week_start_of(date);
        self.message = None;
        self.dirty = false;

        let configured = self.adapter.is_configured();
        match self.adapter.load_week(week_start).await {
            Ok(Some(LoadedWeek {
                schedule,
                source: WeekSource::Remote,
            })) => {
                self.schedule = schedule;
                self.status = WeekStatus::Saved;
            }
            Ok(Some(LoadedWeek {
                schedule,
                source: WeekSource::Cache,
            })) => {
                self.schedule = schedule;
                self.status = WeekStatus::LocalOnly;
                if configured {
                    self.notify("Serveur injoignable, copie locale affichée");
                }
            }
            Ok(None) => {
                match self.adapter.cache().read(week_start) {
                    Some(draft) => {
                        self.schedule = draft;
                        self.dirty = !self.schedule.is_blank();
                    }
                    None => self.schedule = WeekSchedule::empty(week_start),
                }
                self.status = if configured {
                    WeekStatus::Planning
                } else {
                    WeekStatus::LocalOnly
                };
            }
            Err(err) => {
                self.schedule = WeekSchedule::empty(week_start);
                self.status = WeekStatus::LocalOnly;
                self.notify(format!("Chargement impossible : {err}"));
            }
        }
    }

    pub async fn go_to(&mut self, date: NaiveDate) {
        self.load(date).await;
    }

    pub async fn shift(&mut self, weeks: i64) {
        let target = calendar::shift_weeks(self.week_start(), weeks);
        self.load(target).await;
    }

    pub async fn next_week(&mut self) {
        self.shift(1).await;
    }

    pub async fn previous_week(&mut self) {
        self.shift(-1).await;
    }

    pub async fn current_week(&mut self) {
        self.load(calendar::current_week_start()).await;
    }

    /// Opens the week after the most recent stored week (or after the
    /// displayed one when nothing is stored) and starts it blank unless it
    /// already holds data.
    pub async fn new_week(&mut self) {
        let latest = self.adapter.list_week_keys().await.into_iter().next();
        let base = latest.map_or(self.week_start(), |key| key.max(self.week_start()));
        self.load(calendar::shift_weeks(base, 1)).await;
        if self.schedule.is_blank() {
            self.cache_current();
        } else {
            self.notify("Cette semaine contient déjà des données");
        }
    }

    /// Sets one field after checking it against the option catalog, then
    /// snapshots the week locally.
    pub fn set_field(
        &mut self,
        day: DayName,
        field: MealField,
        value: &str,
    ) -> Result<(), FormError> {
        if !options::is_allowed(field, value) {
            return Err(FormError::InvalidOption {
                field,
                value: value.to_string(),
            });
        }
        self.schedule.set(day, field, value);
        self.dirty = true;
        self.message = None;
        if field == MealField::Remarks {
            if let Some(food) = guidance::mentions_forbidden(value) {
                self.notify(format!("Attention : {food} fait partie des aliments à éviter"));
            }
        }
        self.cache_current();
        Ok(())
    }

    /// Replaces the displayed week wholesale (e.g. from an import); the form
    /// moves to the imported week.
    pub fn replace_schedule(&mut self, schedule: WeekSchedule) {
        if schedule.week_start() != self.week_start() {
            self.status = if self.adapter.is_configured() {
                WeekStatus::Planning
            } else {
                WeekStatus::LocalOnly
            };
        }
        self.schedule = schedule;
        self.dirty = true;
        self.cache_current();
    }

    /// Whole-week save: one upsert for all seven days.
    pub async fn save(&mut self) -> bool {
        if self.adapter.save_week(&self.schedule).await {
            self.status = WeekStatus::Saved;
            self.dirty = false;
            self.notify("Semaine sauvegardée");
            info!(target: "food_tracker::form", week = %self.schedule.key(), "week saved");
            true
        } else {
            self.cache_current();
            self.status = WeekStatus::LocalOnly;
            self.notify("Sauvegarde distante impossible, données conservées localement");
            false
        }
    }

    pub async fn save_day(&mut self, day: DayName) -> bool {
        let record = DayRecord::new(self.week_start(), day, self.schedule.day(day).clone());
        if self.adapter.save_day(&record).await {
            self.notify(format!("{day} sauvegardé"));
            true
        } else {
            self.cache_current();
            self.notify(format!("Sauvegarde de {day} impossible"));
            false
        }
    }

    /// Asks the remote store again and updates the status indicator. A store
    /// that cannot be asked shows as `LocalOnly`.
    pub async fn refresh_status(&mut self) -> WeekStatus {
        self.status = match self.adapter.check_week(self.week_start()).await {
            Ok(true) => WeekStatus::Saved,
            Ok(false) => WeekStatus::Planning,
            Err(_) => WeekStatus::LocalOnly,
        };
        self.status
    }

    /// Deletes the stored week and blanks the form.
    ///
    /// Only a store that confirms the week is absent lets the local draft
    /// be dropped; any fault leaves both the form and the cache untouched.
    pub async fn reset(&mut self) -> bool {
        let week_start = self.week_start();
        match self.adapter.check_week(week_start).await {
            Ok(true) => {}
            Ok(false) => {
                if let Err(err) = self.adapter.cache().remove(week_start) {
                    warn!(target: "food_tracker::form", error = %err, "cache entry not removed");
                }
                self.schedule = WeekSchedule::empty(week_start);
                self.status = WeekStatus::Planning;
                self.dirty = false;
                self.notify("Aucune donnée enregistrée pour cette semaine");
                return false;
            }
            Err(err) => {
                warn!(target: "food_tracker::form", week = %self.schedule.key(), error = %err, "reset refused");
                self.status = WeekStatus::LocalOnly;
                self.notify(format!("Réinitialisation impossible : {err}"));
                return false;
            }
        }
        match self.adapter.reset_week(week_start).await {
            Ok(()) => {
                self.schedule = WeekSchedule::empty(week_start);
                self.status = WeekStatus::Planning;
                self.dirty = false;
                self.notify("Semaine réinitialisée");
                true
            }
            Err(err) => {
                self.notify(format!("Réinitialisation impossible : {err}"));
                false
            }
        }
    }

    pub async fn history(&self) -> Vec<NaiveDate> {
        self.adapter.list_week_keys().await
    }

    /// Renders the displayed week into `dir`. Failures become a message and
    /// leave no file behind.
    pub fn export_pdf(&mut self, dir: &Path) -> Option<PathBuf> {
        match report::export_pdf(&self.schedule, dir) {
            Ok(path) => {
                self.notify(format!("PDF généré : {}", path.display()));
                Some(path)
            }
            Err(err) => {
                self.notify(format!("Erreur lors de la génération du PDF : {err}"));
                None
            }
        }
    }
}
