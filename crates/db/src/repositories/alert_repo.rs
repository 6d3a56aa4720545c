//! Repository for the `alerts` table.
//!
//! Alerts are append/flip only: rows are inserted active and later flipped
//! to resolved. Nothing here deletes an alert.

use machwatch_core::alert::AlertType;
use machwatch_core::types::DbId;
use sqlx::{PgPool, QueryBuilder};

use crate::models::alert::{Alert, AlertFilter, CreateAlert};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, machine_id, alert_type, severity, message, is_active, created_at, resolved_at";

/// Provides raise/resolve/list operations for alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Raise a new active alert.
    ///
    /// Guarded by the `uq_alerts_active_machine_type` partial unique index:
    /// if an active alert of the same (machine, type) already exists the
    /// insert is a no-op and `None` is returned. This is what makes
    /// concurrent evaluations of the same machine race-safe.
    pub async fn raise(pool: &PgPool, input: &CreateAlert) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (machine_id, alert_type, severity, message)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (machine_id, alert_type) WHERE is_active DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(input.machine_id)
            .bind(input.alert_type.as_str())
            .bind(input.severity.as_str())
            .bind(&input.message)
            .fetch_optional(pool)
            .await
    }

    /// Find an alert by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Flip an active alert to resolved, stamping `resolved_at`.
    ///
    /// Returns `None` when the row is absent *or* already resolved; callers
    /// distinguish the two with [`AlertRepo::find_by_id`]. Already-resolved
    /// rows are never touched, keeping resolution idempotent and
    /// `resolved_at` stable.
    pub async fn resolve(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET is_active = FALSE, resolved_at = NOW()
             WHERE id = $1 AND is_active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the active alert of a given type for a machine, if one exists.
    /// Used by the evaluator when a channel returns to normal.
    pub async fn resolve_for_machine_type(
        pool: &PgPool,
        machine_id: DbId,
        alert_type: AlertType,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET is_active = FALSE, resolved_at = NOW()
             WHERE machine_id = $1 AND alert_type = $2 AND is_active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(machine_id)
            .bind(alert_type.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Types of the currently active alerts for a machine.
    pub async fn active_types_for_machine(
        pool: &PgPool,
        machine_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT alert_type FROM alerts WHERE machine_id = $1 AND is_active",
        )
        .bind(machine_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(t,)| t).collect())
    }

    /// All active alerts across machines, newest first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE is_active ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Alert>(&query).fetch_all(pool).await
    }

    /// All alerts for a machine, newest first.
    pub async fn list_for_machine(
        pool: &PgPool,
        machine_id: DbId,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE machine_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(machine_id)
            .fetch_all(pool)
            .await
    }

    /// List alerts matching the filter, newest first.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &AlertFilter,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM alerts WHERE TRUE"));
        if let Some(machine_id) = filter.machine_id {
            qb.push(" AND machine_id = ").push_bind(machine_id);
        }
        if let Some(alert_type) = filter.alert_type {
            qb.push(" AND alert_type = ").push_bind(alert_type.as_str());
        }
        if let Some(severity) = filter.severity {
            qb.push(" AND severity = ").push_bind(severity.as_str());
        }
        if let Some(is_active) = filter.is_active {
            qb.push(" AND is_active = ").push_bind(is_active);
        }
        if let Some(from) = filter.from {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND created_at <= ").push_bind(to);
        }
        qb.push(" ORDER BY created_at DESC");
        qb.build_query_as::<Alert>().fetch_all(pool).await
    }
}
