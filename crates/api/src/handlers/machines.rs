//! Handlers for machine CRUD endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use machwatch_core::error::CoreError;
use machwatch_core::types::DbId;
use machwatch_db::models::machine::{CreateMachine, Machine, UpdateMachine};
use machwatch_db::repositories::MachineRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireTechnician};
use crate::query::parse_flexible_timestamp;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for creating a machine.
#[derive(Debug, Deserialize)]
pub struct CreateMachineRequest {
    pub name: String,
    pub model: String,
    pub machine_type: String,
    pub serial_number: String,
    pub location: String,
    /// `YYYY-MM-DD` or RFC 3339. Defaults to now when absent.
    pub last_service: Option<String>,
}

/// Request body for patching a machine. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateMachineRequest {
    pub name: Option<String>,
    pub model: Option<String>,
    pub machine_type: Option<String>,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339.
    pub last_service: Option<String>,
}

fn require_non_empty(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} is required"
        ))));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/machines
pub async fn list_machines(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Vec<Machine>>> {
    let machines = MachineRepo::list(&state.pool).await?;
    Ok(Json(machines))
}

/// GET /api/machines/{id}
pub async fn get_machine(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Machine>> {
    let machine = MachineRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }))?;
    Ok(Json(machine))
}

/// POST /api/machines
///
/// Duplicate serial numbers surface as 409 via `uq_machines_serial_number`.
pub async fn create_machine(
    State(state): State<AppState>,
    RequireTechnician(user): RequireTechnician,
    Json(input): Json<CreateMachineRequest>,
) -> AppResult<(StatusCode, Json<Machine>)> {
    require_non_empty(&input.name, "name")?;
    require_non_empty(&input.model, "model")?;
    require_non_empty(&input.machine_type, "machine_type")?;
    require_non_empty(&input.serial_number, "serial_number")?;
    require_non_empty(&input.location, "location")?;

    let last_service = input
        .last_service
        .as_deref()
        .map(parse_flexible_timestamp)
        .transpose()?;

    let machine = MachineRepo::create(
        &state.pool,
        &CreateMachine {
            name: input.name.trim().to_string(),
            model: input.model.trim().to_string(),
            machine_type: input.machine_type.trim().to_string(),
            serial_number: input.serial_number.trim().to_string(),
            location: input.location.trim().to_string(),
            last_service,
        },
    )
    .await?;

    tracing::info!(
        machine_id = machine.id,
        serial = %machine.serial_number,
        by = %user.username,
        "Machine created"
    );

    Ok((StatusCode::CREATED, Json(machine)))
}

/// PATCH /api/machines/{id}
pub async fn update_machine(
    State(state): State<AppState>,
    RequireTechnician(_user): RequireTechnician,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMachineRequest>,
) -> AppResult<Json<Machine>> {
    let last_service = input
        .last_service
        .as_deref()
        .map(parse_flexible_timestamp)
        .transpose()?;

    let update = UpdateMachine {
        name: input.name,
        model: input.model,
        machine_type: input.machine_type,
        serial_number: input.serial_number,
        location: input.location,
        last_service,
    };

    let machine = MachineRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }))?;

    Ok(Json(machine))
}

/// DELETE /api/machines/{id}
///
/// Readings, status rows, and alerts cascade away with the machine.
pub async fn delete_machine(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = MachineRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }));
    }
    tracing::info!(machine_id = id, by = %admin.username, "Machine deleted");
    Ok(StatusCode::NO_CONTENT)
}
