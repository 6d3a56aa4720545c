//! Handlers for the machine status log.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use machwatch_core::error::CoreError;
use machwatch_core::status::StatusKind;
use machwatch_core::types::DbId;
use machwatch_db::models::machine_status::{CreateMachineStatus, MachineStatus};
use machwatch_db::repositories::{MachineRepo, MachineStatusRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireTechnician};
use crate::state::AppState;

/// Request body for recording a status transition.
#[derive(Debug, Deserialize)]
pub struct CreateStatusRequest {
    /// Target machine id.
    pub machine: DbId,
    /// One of `online`, `offline`, `maintenance`, `error`.
    pub status: String,
    /// Defaults to the authenticated user.
    pub changed_by: Option<DbId>,
}

/// POST /api/machine-status
pub async fn create_status(
    State(state): State<AppState>,
    RequireTechnician(user): RequireTechnician,
    Json(input): Json<CreateStatusRequest>,
) -> AppResult<(StatusCode, Json<MachineStatus>)> {
    let status: StatusKind = input.status.parse().map_err(AppError::Core)?;

    if !MachineRepo::exists(&state.pool, input.machine).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id: input.machine,
        }));
    }

    let row = MachineStatusRepo::create(
        &state.pool,
        &CreateMachineStatus {
            machine_id: input.machine,
            status,
            changed_by: input.changed_by.or(Some(user.user_id)),
        },
    )
    .await?;

    tracing::info!(
        machine_id = row.machine_id,
        status = %row.status,
        by = %user.username,
        "Status recorded"
    );

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/machine-status
///
/// Every status row across machines, newest first.
pub async fn list_statuses(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Vec<MachineStatus>>> {
    let rows = MachineStatusRepo::list(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/machine-status/machine/{id}
///
/// The machine's current status, synthesized as `offline` when the log is
/// empty.
pub async fn current_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MachineStatus>> {
    if !MachineRepo::exists(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }));
    }
    let row = MachineStatusRepo::latest_for_machine(&state.pool, id)
        .await?
        .unwrap_or_else(|| MachineStatus::default_offline(id));
    Ok(Json(row))
}

/// GET /api/machine-status/history/{id}
///
/// The last 20 transitions, newest first.
pub async fn status_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<MachineStatus>>> {
    if !MachineRepo::exists(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }));
    }
    let rows = MachineStatusRepo::history_for_machine(&state.pool, id).await?;
    Ok(Json(rows))
}
