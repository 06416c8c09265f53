#![cfg(feature = "remote")]

use chrono::NaiveDate;
use food_tracker::persistence::rest::SupabaseTable;
use food_tracker::{
    DayName, LocalCache, MealField, PersistenceError, WeekSchedule, WeekSource, WeekStoreAdapter,
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration as StdDuration;
use tempfile::{TempDir, tempdir};

const KEY: &str = "anon-test-key";
const PATH: &str = "/rest/v1/food_tracker";

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn remote_adapter(server: &MockServer) -> (WeekStoreAdapter, TempDir) {
    let dir = tempdir().unwrap();
    let table = SupabaseTable::new(&server.base_url(), KEY, StdDuration::from_secs(2)).unwrap();
    let cache = LocalCache::open(dir.path()).unwrap();
    (WeekStoreAdapter::new(Some(Box::new(table)), cache), dir)
}

fn tuesday_week() -> WeekSchedule {
    let mut week = WeekSchedule::empty(d(2024, 6, 3));
    week.set(
        DayName::Tuesday,
        MealField::Morning,
        "210ml eau + 7 mesures lait 2ème âge",
    );
    week
}

#[tokio::test]
async fn save_week_posts_seven_rows_with_upsert_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(PATH)
                .query_param("on_conflict", "week_start,day_name")
                .header("apikey", KEY)
                .header("authorization", format!("Bearer {KEY}"))
                .header("prefer", "resolution=merge-duplicates,return=minimal")
                .body_contains("\"day_name\":\"Mardi\"")
                .body_contains("\"week_start\":\"2024-06-03\"");
            then.status(201);
        })
        .await;

    let (adapter, _dir) = remote_adapter(&server);
    let week = tuesday_week();
    assert!(adapter.save_week(&week).await);
    mock.assert_async().await;

    assert_eq!(adapter.cache().read(d(2024, 6, 3)), Some(week));
}

#[tokio::test]
async fn load_week_folds_rows_by_day_order() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(PATH)
                .query_param("week_start", "eq.2024-06-03")
                .query_param("order", "day_order.asc");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([
                    {
                        "week_start": "2024-06-03",
                        "day_name": "Mardi",
                        "day_order": 2,
                        "morning": "210ml eau + 7 mesures lait 2ème âge",
                        "vegetable": null,
                        "protein": "",
                        "fruit_lunch": "",
                        "snack": "",
                        "evening": "",
                        "remarks": "",
                        "updated_at": "2024-06-04T08:00:00+00:00"
                    },
                    {
                        "week_start": "2024-06-03",
                        "day_name": "Lundi",
                        "day_order": 1,
                        "vegetable": "Carottes"
                    }
                ]));
        })
        .await;

    let (adapter, _dir) = remote_adapter(&server);
    let loaded = adapter
        .load_week(d(2024, 6, 5))
        .await
        .expect("load succeeds")
        .expect("week present");

    assert_eq!(loaded.source, WeekSource::Remote);
    assert_eq!(
        loaded.schedule.get(DayName::Tuesday, MealField::Morning),
        "210ml eau + 7 mesures lait 2ème âge"
    );
    assert_eq!(loaded.schedule.get(DayName::Tuesday, MealField::Vegetable), "");
    assert_eq!(
        loaded.schedule.get(DayName::Monday, MealField::Vegetable),
        "Carottes"
    );
    assert!(loaded.schedule.day(DayName::Sunday).is_blank());
}

#[tokio::test]
async fn empty_result_means_no_week() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(200).json_body(json!([]));
        })
        .await;

    let (adapter, _dir) = remote_adapter(&server);
    assert!(adapter.load_week(d(2024, 6, 3)).await.unwrap().is_none());
    assert!(!adapter.week_exists(d(2024, 6, 3)).await);
    assert!(adapter.list_week_keys().await.is_empty());
}

#[tokio::test]
async fn server_fault_serves_the_cached_copy() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(503).body("unavailable");
        })
        .await;

    let (adapter, _dir) = remote_adapter(&server);
    let week = tuesday_week();
    adapter.cache().write(&week).unwrap();

    let loaded = adapter.load_week(d(2024, 6, 3)).await.unwrap().unwrap();
    assert_eq!(loaded.source, WeekSource::Cache);
    assert_eq!(loaded.schedule, week);
}

#[tokio::test]
async fn server_fault_without_cache_is_an_error() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(500).body("boom");
        })
        .await;

    let (adapter, _dir) = remote_adapter(&server);
    match adapter.load_week(d(2024, 6, 3)).await {
        Err(PersistenceError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_writes_and_lookups_degrade_to_false_and_empty() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.path(PATH);
            then.status(401).body("invalid api key");
        })
        .await;

    let (adapter, _dir) = remote_adapter(&server);
    let week = tuesday_week();
    assert!(!adapter.save_week(&week).await);
    assert!(!adapter.week_exists(d(2024, 6, 3)).await);
    assert!(adapter.list_week_keys().await.is_empty());
    assert!(adapter.reset_week(d(2024, 6, 3)).await.is_err());
    assert!(adapter.cache().read(d(2024, 6, 3)).is_none());
}

#[tokio::test]
async fn week_keys_are_deduplicated() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(PATH)
                .query_param("select", "week_start")
                .query_param("order", "week_start.desc");
            then.status(200).json_body(json!([
                {"week_start": "2024-06-10"},
                {"week_start": "2024-06-10"},
                {"week_start": "2024-06-03"},
                {"week_start": "2024-06-03"}
            ]));
        })
        .await;

    let (adapter, _dir) = remote_adapter(&server);
    assert_eq!(
        adapter.list_week_keys().await,
        vec![d(2024, 6, 10), d(2024, 6, 3)]
    );
}

#[tokio::test]
async fn reset_deletes_by_week_filter() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path(PATH)
                .query_param("week_start", "eq.2024-06-03")
                .header("apikey", KEY);
            then.status(204);
        })
        .await;

    let (adapter, _dir) = remote_adapter(&server);
    adapter.cache().write(&tuesday_week()).unwrap();
    adapter.reset_week(d(2024, 6, 3)).await.expect("reset succeeds");
    mock.assert_async().await;
    assert!(adapter.cache().read(d(2024, 6, 3)).is_none());
}

#[tokio::test]
async fn rows_with_naive_timestamps_still_load() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(200).json_body(json!([
                {
                    "week_start": "2024-06-03",
                    "day_name": "Mardi",
                    "day_order": 2,
                    "morning": "210ml eau + 7 mesures lait 2ème âge",
                    "updated_at": "2024-06-04T08:00:00.123456"
                },
                {
                    "week_start": "2024-06-03",
                    "day_name": "Mercredi",
                    "day_order": 3,
                    "fruit_lunch": "Pomme",
                    "updated_at": "not a timestamp"
                }
            ]));
        })
        .await;

    let (adapter, _dir) = remote_adapter(&server);
    let loaded = adapter
        .load_week(d(2024, 6, 3))
        .await
        .expect("naive timestamps are accepted")
        .expect("week present");
    assert_eq!(loaded.source, WeekSource::Remote);
    assert_eq!(
        loaded.schedule.get(DayName::Tuesday, MealField::Morning),
        "210ml eau + 7 mesures lait 2ème âge"
    );
    assert_eq!(
        loaded.schedule.get(DayName::Wednesday, MealField::FruitLunch),
        "Pomme"
    );
}
