#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use food_tracker::calendar::current_week_start;
use food_tracker::persistence::sqlite::SqliteTable;
use food_tracker::{
    DayName, FormError, LocalCache, MealField, WeekForm, WeekSchedule, WeekStatus,
    WeekStoreAdapter,
};
use tempfile::{TempDir, tempdir};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sqlite_adapter(dir: &TempDir) -> WeekStoreAdapter {
    let table = SqliteTable::new(dir.path().join("food.db")).unwrap();
    let cache = LocalCache::open(dir.path().join("cache")).unwrap();
    WeekStoreAdapter::new(Some(Box::new(table)), cache)
}

#[tokio::test]
async fn new_form_starts_blank_in_planning() {
    let dir = tempdir().unwrap();
    let form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 5)).await;
    assert_eq!(form.week_start(), d(2024, 6, 3));
    assert_eq!(form.status(), WeekStatus::Planning);
    assert!(form.schedule().is_blank());
    assert!(!form.is_dirty());
    assert_eq!(form.week_label(), "Semaine du 03/06/2024 au 09/06/2024");
}

#[tokio::test]
async fn edits_are_validated_against_the_catalog() {
    let dir = tempdir().unwrap();
    let mut form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 3)).await;

    let err = form
        .set_field(DayName::Monday, MealField::Vegetable, "Choux")
        .unwrap_err();
    assert_eq!(
        err,
        FormError::InvalidOption {
            field: MealField::Vegetable,
            value: "Choux".into()
        }
    );
    assert!(form.schedule().is_blank());

    form.set_field(DayName::Monday, MealField::Vegetable, "Carottes")
        .unwrap();
    assert!(form.is_dirty());
    assert_eq!(
        form.schedule().get(DayName::Monday, MealField::Vegetable),
        "Carottes"
    );
}

#[tokio::test]
async fn edits_are_cached_until_saved() {
    let dir = tempdir().unwrap();
    let mut form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 3)).await;
    form.set_field(DayName::Friday, MealField::Remarks, "Bonne journée")
        .unwrap();

    // Moving away and back restores the unsaved draft from the cache.
    form.next_week().await;
    assert_eq!(form.week_start(), d(2024, 6, 10));
    assert!(form.schedule().is_blank());
    form.previous_week().await;
    assert_eq!(form.week_start(), d(2024, 6, 3));
    assert_eq!(
        form.schedule().get(DayName::Friday, MealField::Remarks),
        "Bonne journée"
    );
    assert_eq!(form.status(), WeekStatus::Planning);
    assert!(form.is_dirty());
}

#[tokio::test]
async fn remarks_mentioning_foods_to_avoid_raise_a_warning() {
    let dir = tempdir().unwrap();
    let mut form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 3)).await;
    form.set_field(DayName::Monday, MealField::Remarks, "goûté un peu de choux")
        .unwrap();
    let message = form.message().unwrap_or_default();
    assert!(message.contains("Choux"), "{message}");
}

#[tokio::test]
async fn save_marks_the_week_saved_and_reopens_it() {
    let dir = tempdir().unwrap();
    let mut form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 3)).await;
    form.set_field(DayName::Tuesday, MealField::FruitLunch, "Banane")
        .unwrap();
    assert!(form.save().await);
    assert_eq!(form.status(), WeekStatus::Saved);
    assert!(!form.is_dirty());
    drop(form);

    let reopened = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 8)).await;
    assert_eq!(reopened.status(), WeekStatus::Saved);
    assert_eq!(
        reopened.schedule().get(DayName::Tuesday, MealField::FruitLunch),
        "Banane"
    );
}

#[tokio::test]
async fn save_day_persists_a_single_day() {
    let dir = tempdir().unwrap();
    let mut form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 3)).await;
    form.set_field(DayName::Thursday, MealField::Snack, "Laitage bébé seul")
        .unwrap();
    assert!(form.save_day(DayName::Thursday).await);
    assert_eq!(form.refresh_status().await, WeekStatus::Saved);
    assert_eq!(form.history().await, vec![d(2024, 6, 3)]);
}

#[tokio::test]
async fn reset_clears_a_saved_week() {
    let dir = tempdir().unwrap();
    let mut form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 3)).await;
    form.set_field(DayName::Monday, MealField::Protein, "10g viande blanche")
        .unwrap();
    assert!(form.save().await);

    assert!(form.reset().await);
    assert!(form.schedule().is_blank());
    assert_eq!(form.status(), WeekStatus::Planning);
    assert!(form.history().await.is_empty());

    // Nothing left to delete.
    assert!(!form.reset().await);
}

#[tokio::test]
async fn new_week_follows_the_latest_stored_week() {
    let dir = tempdir().unwrap();
    let far_future = current_week_start() + chrono::Duration::weeks(20);
    let mut form = WeekForm::open(sqlite_adapter(&dir), far_future).await;
    form.set_field(DayName::Monday, MealField::Vegetable, "Potirons")
        .unwrap();
    assert!(form.save().await);

    form.current_week().await;
    form.new_week().await;
    assert_eq!(form.week_start(), far_future + chrono::Duration::weeks(1));
    assert!(form.schedule().is_blank());
}

#[tokio::test]
async fn offline_form_works_from_the_cache() {
    let dir = tempdir().unwrap();
    let adapter = WeekStoreAdapter::offline(LocalCache::open(dir.path()).unwrap());
    let mut form = WeekForm::open(adapter, d(2024, 6, 3)).await;
    assert_eq!(form.status(), WeekStatus::LocalOnly);

    form.set_field(DayName::Sunday, MealField::Evening, "Petit pot légumes + biberon lait")
        .unwrap();
    assert!(!form.save().await);
    assert_eq!(form.status(), WeekStatus::LocalOnly);
    assert!(form.message().is_some());

    let cached: WeekSchedule = form.adapter().cache().read(d(2024, 6, 3)).unwrap();
    assert_eq!(
        cached.get(DayName::Sunday, MealField::Evening),
        "Petit pot légumes + biberon lait"
    );
}

#[tokio::test]
async fn pdf_export_reports_its_outcome() {
    let dir = tempdir().unwrap();
    let mut form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 3)).await;

    let path = form.export_pdf(dir.path()).expect("pdf written");
    assert!(path.ends_with("suivi-alimentaire-2024-06-03.pdf"));
    assert!(form.message().unwrap_or_default().contains("PDF"));

    let missing = dir.path().join("does-not-exist");
    assert!(form.export_pdf(&missing).is_none());
    assert!(form.message().unwrap_or_default().contains("Erreur"));
}

#[tokio::test]
async fn replacing_with_another_week_drops_the_saved_status() {
    let dir = tempdir().unwrap();
    let mut form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 3)).await;
    form.set_field(DayName::Monday, MealField::Vegetable, "Carottes")
        .unwrap();
    assert!(form.save().await);
    assert_eq!(form.status(), WeekStatus::Saved);

    let mut imported = WeekSchedule::empty(d(2024, 6, 17));
    imported.set(DayName::Friday, MealField::FruitLunch, "Poire");
    form.replace_schedule(imported);

    assert_eq!(form.week_start(), d(2024, 6, 17));
    assert_eq!(form.status(), WeekStatus::Planning);
    assert!(form.is_dirty());
    assert_eq!(form.refresh_status().await, WeekStatus::Planning);
}

#[tokio::test]
async fn replacing_the_same_week_keeps_its_status() {
    let dir = tempdir().unwrap();
    let mut form = WeekForm::open(sqlite_adapter(&dir), d(2024, 6, 3)).await;
    form.set_field(DayName::Monday, MealField::Vegetable, "Carottes")
        .unwrap();
    assert!(form.save().await);

    let mut imported = WeekSchedule::empty(d(2024, 6, 5));
    imported.set(DayName::Monday, MealField::Vegetable, "Courgettes");
    form.replace_schedule(imported);

    assert_eq!(form.status(), WeekStatus::Saved);
    assert!(form.is_dirty());
}

#[tokio::test]
async fn offline_reset_keeps_the_local_draft() {
    let dir = tempdir().unwrap();
    let adapter = WeekStoreAdapter::offline(LocalCache::open(dir.path()).unwrap());
    let mut form = WeekForm::open(adapter, d(2024, 6, 3)).await;
    form.set_field(DayName::Tuesday, MealField::Remarks, "important")
        .unwrap();

    assert!(!form.reset().await);
    assert_eq!(form.status(), WeekStatus::LocalOnly);
    assert_eq!(
        form.schedule().get(DayName::Tuesday, MealField::Remarks),
        "important"
    );
    let cached = form.adapter().cache().read(d(2024, 6, 3)).unwrap();
    assert_eq!(cached.get(DayName::Tuesday, MealField::Remarks), "important");
}
