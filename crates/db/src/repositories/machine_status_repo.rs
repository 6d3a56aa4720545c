//! Repository for the append-only `machine_status` log.

use machwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::machine_status::{CreateMachineStatus, MachineStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, machine_id, status, changed_by, recorded_at";

/// How many rows the history endpoint returns at most.
const HISTORY_LIMIT: i64 = 20;

/// Provides append/read operations for machine status transitions.
pub struct MachineStatusRepo;

impl MachineStatusRepo {
    /// Append a status transition, returning the stored row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMachineStatus,
    ) -> Result<MachineStatus, sqlx::Error> {
        let query = format!(
            "INSERT INTO machine_status (machine_id, status, changed_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MachineStatus>(&query)
            .bind(input.machine_id)
            .bind(input.status.as_str())
            .bind(input.changed_by)
            .fetch_one(pool)
            .await
    }

    /// The machine's current status: the max-timestamp row, if any.
    pub async fn latest_for_machine(
        pool: &PgPool,
        machine_id: DbId,
    ) -> Result<Option<MachineStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM machine_status
             WHERE machine_id = $1
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, MachineStatus>(&query)
            .bind(machine_id)
            .fetch_optional(pool)
            .await
    }

    /// The last 20 transitions for a machine, newest first.
    pub async fn history_for_machine(
        pool: &PgPool,
        machine_id: DbId,
    ) -> Result<Vec<MachineStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM machine_status
             WHERE machine_id = $1
             ORDER BY recorded_at DESC, id DESC
             LIMIT {HISTORY_LIMIT}"
        );
        sqlx::query_as::<_, MachineStatus>(&query)
            .bind(machine_id)
            .fetch_all(pool)
            .await
    }

    /// All status rows across machines, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<MachineStatus>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machine_status ORDER BY recorded_at DESC");
        sqlx::query_as::<_, MachineStatus>(&query)
            .fetch_all(pool)
            .await
    }
}
