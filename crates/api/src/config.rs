use chrono::Duration;
use machwatch_core::evaluator::{MonitorPolicy, ThresholdBand};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development; override via environment variables in production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How many days of sensor readings the retention job keeps
    /// (default: `30`).
    pub sensor_retention_days: i64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `5000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SENSOR_RETENTION_DAYS` | `30`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let sensor_retention_days: i64 = std::env::var("SENSOR_RETENTION_DAYS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SENSOR_RETENTION_DAYS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            sensor_retention_days,
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Load the threshold policy from environment variables.
///
/// | Env Var              | Default |
/// |----------------------|---------|
/// | `TEMP_WARNING_C`     | `70`    |
/// | `TEMP_CRITICAL_C`    | `85`    |
/// | `SPEED_WARNING_RPM`  | `800`   |
/// | `SPEED_CRITICAL_RPM` | `1200`  |
/// | `DOOR_GRACE_SECS`    | `60`    |
pub fn monitor_policy_from_env() -> MonitorPolicy {
    let defaults = MonitorPolicy::default();

    let read = |name: &str, fallback: f64| -> f64 {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(fallback)
    };

    MonitorPolicy {
        temperature: ThresholdBand {
            warning: read("TEMP_WARNING_C", defaults.temperature.warning),
            critical: read("TEMP_CRITICAL_C", defaults.temperature.critical),
        },
        speed: ThresholdBand {
            warning: read("SPEED_WARNING_RPM", defaults.speed.warning),
            critical: read("SPEED_CRITICAL_RPM", defaults.speed.critical),
        },
        door_grace: std::env::var("DOOR_GRACE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::seconds)
            .unwrap_or(defaults.door_grace),
    }
}
