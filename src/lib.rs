pub mod adapter;
pub mod calendar;
pub mod config;
pub mod controller;
pub mod day;
pub mod guidance;
pub mod options;
pub mod persistence;
pub mod report;
pub mod week;

pub use adapter::{LoadedWeek, WeekSource, WeekStoreAdapter};
pub use config::{RemoteConfig, StoreConfig};
pub use controller::{FormError, WeekForm, WeekStatus};
pub use day::{DayEntry, DayName, MealField};
pub use persistence::{
    DayRecord, LocalCache, PersistenceError, PersistenceResult, WeekTable, load_week_from_csv,
    load_week_from_json, save_week_to_csv, save_week_to_json,
};
pub use report::{RenderError, ReportTable, export_pdf, render_pdf};
pub use week::WeekSchedule;
