//! Alert model and DTOs.

use machwatch_core::alert::{AlertType, Severity};
use machwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full alert row from the `alerts` table.
///
/// `is_active` is monotonic: true at creation, flipped to false exactly once
/// when resolved, never back.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub machine_id: DbId,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

/// DTO for raising a new alert.
#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub machine_id: DbId,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
}

/// Filters for the alert list endpoint. All fields optional and combined
/// with AND.
#[derive(Debug, Default)]
pub struct AlertFilter {
    pub machine_id: Option<DbId>,
    pub alert_type: Option<AlertType>,
    pub severity: Option<Severity>,
    pub is_active: Option<bool>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<Timestamp>,
}
