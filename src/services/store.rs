use crate::models::{AutomationLogEntry, Job, JobMatch, User};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Store returned error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the store; any name left out of the config keeps its default
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreTables {
    pub users: String,
    pub jobs: String,
    pub matches: String,
    pub automation_logs: String,
}

impl Default for StoreTables {
    fn default() -> Self {
        Self {
            users: "profiles".to_string(),
            jobs: "jobs".to_string(),
            matches: "job_matches".to_string(),
            automation_logs: "automation_logs".to_string(),
        }
    }
}

/// Row filter in the store's REST query syntax
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, String),
    Gte(&'static str, DateTime<Utc>),
}

impl Filter {
    fn to_query_pair(&self) -> String {
        match self {
            Filter::Eq(column, value) => {
                format!("{}=eq.{}", column, urlencoding::encode(value))
            }
            Filter::Gte(column, at) => {
                let ts = at.to_rfc3339_opts(SecondsFormat::Secs, true);
                format!("{}=gte.{}", column, urlencoding::encode(&ts))
            }
        }
    }
}

/// Record store REST client
///
/// Handles all communication with the hosted relational store:
/// - Fetching users and jobs by id or filter
/// - Upserting match rows on (user_id, job_id)
/// - Appending automation log entries
pub struct StoreClient {
    base_url: String,
    service_key: String,
    client: Client,
    tables: StoreTables,
}

impl StoreClient {
    /// Create a new store client
    pub fn new(
        base_url: String,
        service_key: String,
        tables: StoreTables,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            service_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    /// Select rows from a table
    ///
    /// Rows that fail to decode are skipped with a warning rather than failing the whole read.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
        order_desc: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<T>, StoreError> {
        let mut params = vec!["select=*".to_string()];
        params.extend(filters.iter().map(Filter::to_query_pair));
        if let Some(column) = order_desc {
            params.push(format!("order={}.desc", column));
        }
        if let Some(limit) = limit {
            params.push(format!("limit={}", limit));
        }

        let url = format!("{}?{}", self.table_url(table), params.join("&"));

        tracing::debug!("Selecting from store: {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = check_status(response, table).await?;

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Expected row array from {}: {}", table, e)))?;

        let total = rows.len();
        let parsed: Vec<T> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Skipping malformed row in {}: {}", table, e);
                    None
                }
            })
            .collect();

        tracing::debug!("Selected {} of {} rows from {}", parsed.len(), total, table);

        Ok(parsed)
    }

    /// Get a single user by primary key
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let rows = self
            .select::<User>(&self.tables.users, &[Filter::Eq("id", user_id.to_string())], None, Some(1))
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Get a single job by primary key
    pub async fn get_job(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        let rows = self
            .select::<Job>(&self.tables.jobs, &[Filter::Eq("id", job_id.to_string())], None, Some(1))
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Jobs created at or after `since`, optionally limited to one category
    pub async fn jobs_created_since(
        &self,
        since: DateTime<Utc>,
        category: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Job>, StoreError> {
        let mut filters = vec![Filter::Gte("created_at", since)];
        if let Some(category) = category {
            filters.push(Filter::Eq("category", category.to_string()));
        }

        self.select(&self.tables.jobs, &filters, Some("created_at"), limit)
            .await
    }

    /// Users created at or after `since`
    pub async fn users_created_since(&self, since: DateTime<Utc>) -> Result<Vec<User>, StoreError> {
        self.select(&self.tables.users, &[Filter::Gte("created_at", since)], None, None)
            .await
    }

    /// Upsert match rows, merging on (user_id, job_id)
    ///
    /// Sent as one request. A pair repeated within the batch keeps its last occurrence,
    /// since the store rejects an upsert that touches the same row twice.
    pub async fn upsert_matches(&self, matches: &[JobMatch]) -> Result<usize, StoreError> {
        if matches.is_empty() {
            return Ok(0);
        }

        let rows = dedupe_matches(matches);
        let url = format!("{}?on_conflict=user_id,job_id", self.table_url(&self.tables.matches));

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&rows)
            .send()
            .await?;
        check_status(response, &self.tables.matches).await?;

        tracing::debug!("Upserted {} match rows", rows.len());

        Ok(rows.len())
    }

    /// Append an automation log entry
    pub async fn append_log(&self, entry: &AutomationLogEntry) -> Result<(), StoreError> {
        let url = self.table_url(&self.tables.automation_logs);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(entry)
            .send()
            .await?;
        check_status(response, &self.tables.automation_logs).await?;

        tracing::debug!("Appended automation log {} ({})", entry.id, entry.mode.as_str());

        Ok(())
    }

    /// Cheap reachability probe
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        let url = format!("{}?select=id&limit=1", self.table_url(&self.tables.jobs));
        let response = self.authorized(self.client.get(&url)).send().await?;
        Ok(response.status().is_success())
    }
}

fn dedupe_matches(matches: &[JobMatch]) -> Vec<&JobMatch> {
    let mut by_pair: BTreeMap<(&str, &str), &JobMatch> = BTreeMap::new();
    for m in matches {
        by_pair.insert((m.user_id.as_str(), m.job_id.as_str()), m);
    }
    by_pair.into_values().collect()
}

async fn check_status(response: reqwest::Response, table: &str) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(StoreError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
    tracing::error!("Store request on {} failed: {} - {}", table, status, body);

    Err(StoreError::ApiError {
        status: status.as_u16(),
        message: body,
    })
}
