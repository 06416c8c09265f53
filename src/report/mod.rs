//! Printable snapshot of one week: a single landscape page holding a
//! 7 × 6 table (day, morning, midday, snack, evening, remarks).

use crate::calendar;
use crate::day::DayName;
use crate::week::WeekSchedule;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, error};

pub mod layout;
pub mod pdf;
pub mod theme;

pub use layout::{CellBox, PageGeometry, TableLayout};
pub use theme::{ReportTheme, RgbColor};

pub const COLUMN_COUNT: usize = 6;
pub const REMARKS_COLUMN: usize = 5;
pub const HEADERS: [&str; COLUMN_COUNT] =
    ["Jour", "Matin", "Midi", "Goûter (16h)", "Soir", "Remarques"];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout failed: {0}")]
    Layout(String),
    #[error("pdf assembly failed: {0}")]
    Pdf(#[from] printpdf::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Cell text per row, each cell a list of lines. Unset fields give no lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub day: DayName,
    pub cells: [Vec<String>; COLUMN_COUNT],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub title: String,
    pub headers: [&'static str; COLUMN_COUNT],
    pub rows: Vec<ReportRow>,
}

fn single(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}

impl ReportTable {
    /// Always seven rows, Monday first, whether or not anything was entered.
    pub fn from_week(schedule: &WeekSchedule) -> Self {
        let rows = schedule
            .iter()
            .map(|(day, entry)| ReportRow {
                day,
                cells: [
                    vec![day.as_str().to_string()],
                    single(&entry.morning),
                    entry
                        .midday_parts()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                    single(&entry.snack),
                    single(&entry.evening),
                    single(&entry.remarks),
                ],
            })
            .collect();
        Self {
            title: format!(
                "Suivi alimentaire - {}",
                calendar::format_week_range(schedule.week_start())
            ),
            headers: HEADERS,
            rows,
        }
    }
}

pub fn report_file_name(week_start: NaiveDate) -> String {
    format!("suivi-alimentaire-{}.pdf", calendar::week_key(week_start))
}

pub fn layout_week(
    schedule: &WeekSchedule,
    theme: &ReportTheme,
    page: PageGeometry,
) -> Result<TableLayout, RenderError> {
    layout::layout(&ReportTable::from_week(schedule), theme, page)
}

/// The week as PDF bytes on an A4 landscape page.
pub fn render_pdf(schedule: &WeekSchedule) -> Result<Vec<u8>, RenderError> {
    render_pdf_with(schedule, &ReportTheme::default(), PageGeometry::A4_LANDSCAPE)
}

pub fn render_pdf_with(
    schedule: &WeekSchedule,
    theme: &ReportTheme,
    page: PageGeometry,
) -> Result<Vec<u8>, RenderError> {
    let layout = layout_week(schedule, theme, page)?;
    debug!(
        target: "food_tracker::report",
        week = %schedule.key(),
        scale = layout.scale,
        "table laid out"
    );
    pdf::render(&layout, theme)
}

/// Writes `suivi-alimentaire-<week>.pdf` into `dir` and returns its path.
///
/// The document goes to a temporary file first and is renamed into place
/// only once complete, so a failure never leaves a partial file behind.
pub fn export_pdf(schedule: &WeekSchedule, dir: &Path) -> Result<PathBuf, RenderError> {
    export_pdf_with(schedule, dir, &ReportTheme::default(), PageGeometry::A4_LANDSCAPE)
}

pub fn export_pdf_with(
    schedule: &WeekSchedule,
    dir: &Path,
    theme: &ReportTheme,
    page: PageGeometry,
) -> Result<PathBuf, RenderError> {
    let result = write_pdf(schedule, dir, theme, page);
    if let Err(err) = &result {
        error!(target: "food_tracker::report", week = %schedule.key(), error = %err, "pdf export failed");
    }
    result
}

fn write_pdf(
    schedule: &WeekSchedule,
    dir: &Path,
    theme: &ReportTheme,
    page: PageGeometry,
) -> Result<PathBuf, RenderError> {
    let bytes = render_pdf_with(schedule, theme, page)?;
    let target = dir.join(report_file_name(schedule.week_start()));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|err| err.error)?;
    Ok(target)
}
