//! Machine status log model and DTOs.

use chrono::Utc;
use machwatch_core::status::StatusKind;
use machwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One row of the append-only `machine_status` log.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MachineStatus {
    pub id: DbId,
    pub machine_id: DbId,
    /// One of `online`, `offline`, `maintenance`, `error`.
    pub status: String,
    /// NULL when the transition was made by the evaluator rather than a user.
    pub changed_by: Option<DbId>,
    pub recorded_at: Timestamp,
}

impl MachineStatus {
    /// Synthesized default for machines with no status history: offline, now.
    ///
    /// `id` is 0 to mark the row as synthetic.
    pub fn default_offline(machine_id: DbId) -> Self {
        Self {
            id: 0,
            machine_id,
            status: StatusKind::Offline.as_str().to_string(),
            changed_by: None,
            recorded_at: Utc::now(),
        }
    }
}

/// DTO for appending a status transition.
#[derive(Debug, Clone)]
pub struct CreateMachineStatus {
    pub machine_id: DbId,
    pub status: StatusKind,
    pub changed_by: Option<DbId>,
}
