use super::{DayRecord, PersistenceError, PersistenceResult, TABLE_NAME, WeekTable};
use crate::calendar;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CONFLICT_KEY: &str = "week_start,day_name";

/// The `food_tracker` table behind a PostgREST endpoint (Supabase).
pub struct SupabaseTable {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
struct WeekKeyRow {
    week_start: NaiveDate,
}

impl SupabaseTable {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> PersistenceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .build()?;
        let endpoint = format!("{}/rest/v1/{TABLE_NAME}", base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(response: Response) -> PersistenceResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PersistenceError::Status {
            status: status.as_u16(),
            body,
        })
    }

    fn eq_filter(week_start: NaiveDate) -> String {
        format!("eq.{}", calendar::week_key(week_start))
    }
}

#[async_trait]
impl WeekTable for SupabaseTable {
    async fn upsert(&self, records: &[DayRecord]) -> PersistenceResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let request = self
            .client
            .post(&self.endpoint)
            .query(&[("on_conflict", CONFLICT_KEY)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(records);
        let response = self.authorized(request).send().await?;
        Self::check(response).await?;
        debug!(target: "food_tracker::store", rows = records.len(), "upserted rows");
        Ok(())
    }

    async fn select_week(&self, week_start: NaiveDate) -> PersistenceResult<Vec<DayRecord>> {
        let request = self.client.get(&self.endpoint).query(&[
            ("select", "*".to_string()),
            ("week_start", Self::eq_filter(week_start)),
            ("order", "day_order.asc".to_string()),
        ]);
        let response = Self::check(self.authorized(request).send().await?).await?;
        let records: Vec<DayRecord> = response.json().await?;
        debug!(
            target: "food_tracker::store",
            week = %calendar::week_key(week_start),
            rows = records.len(),
            "selected week"
        );
        Ok(records)
    }

    async fn delete_week(&self, week_start: NaiveDate) -> PersistenceResult<()> {
        let request = self
            .client
            .delete(&self.endpoint)
            .query(&[("week_start", Self::eq_filter(week_start))]);
        Self::check(self.authorized(request).send().await?).await?;
        Ok(())
    }

    async fn has_week(&self, week_start: NaiveDate) -> PersistenceResult<bool> {
        let request = self.client.get(&self.endpoint).query(&[
            ("select", "week_start".to_string()),
            ("week_start", Self::eq_filter(week_start)),
            ("limit", "1".to_string()),
        ]);
        let response = Self::check(self.authorized(request).send().await?).await?;
        let rows: Vec<WeekKeyRow> = response.json().await?;
        Ok(!rows.is_empty())
    }

    async fn week_starts(&self) -> PersistenceResult<Vec<NaiveDate>> {
        let request = self.client.get(&self.endpoint).query(&[
            ("select", "week_start"),
            ("order", "week_start.desc"),
        ]);
        let response = Self::check(self.authorized(request).send().await?).await?;
        let rows: Vec<WeekKeyRow> = response.json().await?;
        Ok(rows.into_iter().map(|row| row.week_start).collect())
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
