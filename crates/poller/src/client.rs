//! Typed HTTP client for the machwatch backend.
//!
//! Each endpoint the poller touches gets its own response type rather than
//! loosely-shaped JSON, so a server-side schema change fails loudly at
//! deserialization instead of silently rendering garbage.

use chrono::{DateTime, Utc};
use machwatch_core::types::DbId;
use serde::Deserialize;

/// One sensor reading as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveReading {
    pub id: DbId,
    pub machine_id: DbId,
    pub temperature1: f64,
    pub temperature2: f64,
    pub temperature3: f64,
    pub temperature4: f64,
    pub speed1: f64,
    pub speed2: f64,
    pub speed3: f64,
    pub speed4: f64,
    pub door1_open: bool,
    pub door2_open: bool,
    pub recorded_at: DateTime<Utc>,
}

/// One machine status row as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusRow {
    pub id: DbId,
    pub machine_id: DbId,
    pub status: String,
    pub changed_by: Option<DbId>,
    pub recorded_at: DateTime<Utc>,
}

/// Login response carrying the bearer token.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// HTTP client holding the base URL and an optional bearer token.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Log in and remember the bearer token for subsequent requests.
    pub async fn login(&mut self, username: &str, password: &str) -> anyhow::Result<()> {
        let url = format!("{}/api/users/login", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?
            .error_for_status()?;

        let body: LoginResponse = response.json().await?;
        self.token = Some(body.token);
        tracing::info!(username, "Logged in to backend");
        Ok(())
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.get(url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Fetch the latest sensor reading for a machine.
    pub async fn fetch_latest_reading(&self, machine_id: DbId) -> anyhow::Result<LiveReading> {
        let url = format!(
            "{}/api/sensor-data/machine/{machine_id}/latest",
            self.base_url
        );
        let reading = self
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(reading)
    }

    /// Fetch the current status for a machine.
    pub async fn fetch_current_status(&self, machine_id: DbId) -> anyhow::Result<StatusRow> {
        let url = format!(
            "{}/api/machine-status/machine/{machine_id}",
            self.base_url
        );
        let status = self
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(status)
    }
}
