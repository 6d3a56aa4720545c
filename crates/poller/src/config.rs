//! Poller configuration from environment variables.

use std::time::Duration;

use machwatch_core::types::DbId;

/// Default seconds between live sensor fetches.
const DEFAULT_SENSOR_POLL_SECS: u64 = 5;

/// Default seconds between machine status fetches.
const DEFAULT_STATUS_POLL_SECS: u64 = 30;

/// Default minimum spacing between manual refreshes.
const DEFAULT_REFRESH_DEBOUNCE_SECS: u64 = 2;

/// Runtime configuration for the poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Backend base URL, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// The machine this poller watches.
    pub machine_id: DbId,
    /// Interval between sensor reading fetches.
    pub sensor_interval: Duration,
    /// Interval between status fetches.
    pub status_interval: Duration,
    /// Minimum spacing between manual refresh triggers.
    pub refresh_debounce: Duration,
    /// Optional credentials for endpoints behind the auth gate.
    pub username: Option<String>,
    pub password: Option<String>,
}

impl PollerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                | Required | Default                 |
    /// |-------------------------|----------|-------------------------|
    /// | `API_BASE_URL`          | no       | `http://localhost:5000` |
    /// | `MACHINE_ID`            | **yes**  | --                      |
    /// | `SENSOR_POLL_SECS`      | no       | `5`                     |
    /// | `STATUS_POLL_SECS`      | no       | `30`                    |
    /// | `REFRESH_DEBOUNCE_SECS` | no       | `2`                     |
    /// | `POLLER_USERNAME`       | no       | --                      |
    /// | `POLLER_PASSWORD`       | no       | --                      |
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        let machine_id: DbId = std::env::var("MACHINE_ID")
            .map_err(|_| anyhow::anyhow!("MACHINE_ID environment variable is required"))?
            .parse()
            .map_err(|_| anyhow::anyhow!("MACHINE_ID must be a valid integer"))?;

        let read_secs = |name: &str, fallback: u64| -> u64 {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback)
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            machine_id,
            sensor_interval: Duration::from_secs(read_secs(
                "SENSOR_POLL_SECS",
                DEFAULT_SENSOR_POLL_SECS,
            )),
            status_interval: Duration::from_secs(read_secs(
                "STATUS_POLL_SECS",
                DEFAULT_STATUS_POLL_SECS,
            )),
            refresh_debounce: Duration::from_secs(read_secs(
                "REFRESH_DEBOUNCE_SECS",
                DEFAULT_REFRESH_DEBOUNCE_SECS,
            )),
            username: std::env::var("POLLER_USERNAME").ok(),
            password: std::env::var("POLLER_PASSWORD").ok(),
        })
    }
}
