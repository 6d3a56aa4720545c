//! Shared query-parameter and date-parsing helpers.

use chrono::{DateTime, NaiveDate, Utc};
use machwatch_core::alert::{AlertType, Severity};
use machwatch_core::error::CoreError;
use machwatch_core::types::{DbId, Timestamp};
use machwatch_db::models::alert::AlertFilter;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Parse a timestamp that may be a bare date (`YYYY-MM-DD`, taken as UTC
/// midnight) or a full RFC 3339 instant.
pub fn parse_flexible_timestamp(raw: &str) -> AppResult<Timestamp> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        // and_hms_opt(0, 0, 0) is always valid for midnight.
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            AppError::Core(CoreError::Internal("midnight construction failed".into()))
        })?;
        return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    Err(AppError::Core(CoreError::Validation(format!(
        "Invalid date '{raw}': expected YYYY-MM-DD or RFC 3339"
    ))))
}

/// Query parameters for the alert list endpoint. All optional; combined
/// with AND.
#[derive(Debug, Default, Deserialize)]
pub struct AlertListParams {
    pub machine_id: Option<DbId>,
    pub alert_type: Option<String>,
    pub severity: Option<String>,
    pub is_active: Option<bool>,
    /// Inclusive lower bound on creation time (date or RFC 3339).
    pub from: Option<String>,
    /// Inclusive upper bound on creation time (date or RFC 3339).
    pub to: Option<String>,
}

impl AlertListParams {
    /// Validate and convert into a repository-level [`AlertFilter`].
    pub fn into_filter(self) -> AppResult<AlertFilter> {
        let alert_type = self
            .alert_type
            .as_deref()
            .map(|s| s.parse::<AlertType>())
            .transpose()?;
        let severity = self
            .severity
            .as_deref()
            .map(|s| s.parse::<Severity>())
            .transpose()?;
        let from = self
            .from
            .as_deref()
            .map(parse_flexible_timestamp)
            .transpose()?;
        let to = self.to.as_deref().map(parse_flexible_timestamp).transpose()?;

        Ok(AlertFilter {
            machine_id: self.machine_id,
            alert_type,
            severity,
            is_active: self.is_active,
            from,
            to,
        })
    }
}
