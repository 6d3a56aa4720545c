//! Handlers for sensor data ingestion and queries.
//!
//! Ingestion is the hot path: each accepted reading is stored, then run
//! through the threshold evaluator, and any resulting alert raises/resolves
//! and status transition are applied before the response goes out.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use machwatch_core::error::CoreError;
use machwatch_core::evaluator::{evaluate, AlertAction, MachineView, SensorSample};
use machwatch_core::status::StatusKind;
use machwatch_core::types::DbId;
use machwatch_db::models::alert::CreateAlert;
use machwatch_db::models::machine_status::CreateMachineStatus;
use machwatch_db::models::sensor_data::{CreateSensorReading, SensorReading};
use machwatch_db::repositories::{AlertRepo, MachineRepo, MachineStatusRepo, SensorDataRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for sensor data ingestion.
///
/// Machines on the floor post partial payloads; missing channels default to
/// zero and missing door flags to closed.
#[derive(Debug, Deserialize)]
pub struct CreateReadingRequest {
    /// Target machine id.
    pub machine: DbId,
    #[serde(default)]
    pub temperature1: f64,
    #[serde(default)]
    pub temperature2: f64,
    #[serde(default)]
    pub temperature3: f64,
    #[serde(default)]
    pub temperature4: f64,
    #[serde(default)]
    pub speed1: f64,
    #[serde(default)]
    pub speed2: f64,
    #[serde(default)]
    pub speed3: f64,
    #[serde(default)]
    pub speed4: f64,
    #[serde(default)]
    pub door1_state: bool,
    #[serde(default)]
    pub door2_state: bool,
}

/// Response body for the bulk purge endpoint.
#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/sensor-data
///
/// Store a reading and run the evaluator. No authentication: this is the
/// device ingestion endpoint and the shop-floor controllers hold no
/// credentials.
pub async fn create_reading(
    State(state): State<AppState>,
    Json(input): Json<CreateReadingRequest>,
) -> AppResult<(StatusCode, Json<SensorReading>)> {
    if !MachineRepo::exists(&state.pool, input.machine).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id: input.machine,
        }));
    }

    let create = CreateSensorReading {
        machine_id: input.machine,
        temperatures: [
            input.temperature1,
            input.temperature2,
            input.temperature3,
            input.temperature4,
        ],
        speeds: [input.speed1, input.speed2, input.speed3, input.speed4],
        doors_open: [input.door1_state, input.door2_state],
    };
    let reading = SensorDataRepo::create(&state.pool, &create).await?;

    run_evaluation(&state, &reading, &create).await?;

    Ok((StatusCode::CREATED, Json(reading)))
}

/// Fetch machine context, evaluate the sample, and apply the decided
/// alert and status mutations.
async fn run_evaluation(
    state: &AppState,
    reading: &SensorReading,
    create: &CreateSensorReading,
) -> AppResult<()> {
    let machine_id = create.machine_id;

    let active_alerts: HashSet<_> =
        AlertRepo::active_types_for_machine(&state.pool, machine_id)
            .await?
            .iter()
            .filter_map(|t| t.parse().ok())
            .collect();

    let current_status = match MachineStatusRepo::latest_for_machine(&state.pool, machine_id)
        .await?
    {
        Some(row) => row.status.parse().unwrap_or(StatusKind::Offline),
        None => StatusKind::Offline,
    };

    let closed = SensorDataRepo::door_closed_times(&state.pool, machine_id).await?;
    let last_closed = [closed.door1_last_closed, closed.door2_last_closed];
    let mut door_open_for = [None, None];
    for (idx, open) in create.doors_open.iter().enumerate() {
        if *open {
            // Open since the door was last seen closed; a door that has
            // never been seen closed counts from the oldest reading.
            let since = last_closed[idx].or(closed.first_reading);
            door_open_for[idx] =
                Some(since.map_or(chrono::Duration::zero(), |s| reading.recorded_at - s));
        }
    }

    let sample = SensorSample {
        temperatures: create.temperatures,
        speeds: create.speeds,
        doors_open: create.doors_open,
    };
    let view = MachineView {
        current_status,
        active_alerts,
        door_open_for,
    };

    let evaluation = evaluate(&sample, &view, &state.policy);

    for action in evaluation.actions {
        match action {
            AlertAction::Raise {
                alert_type,
                severity,
                message,
            } => {
                let raised = AlertRepo::raise(
                    &state.pool,
                    &CreateAlert {
                        machine_id,
                        alert_type,
                        severity,
                        message,
                    },
                )
                .await?;
                // None means a concurrent evaluation won the race.
                if let Some(alert) = raised {
                    tracing::warn!(
                        machine_id,
                        alert_id = alert.id,
                        alert_type = %alert.alert_type,
                        severity = %alert.severity,
                        "Alert raised"
                    );
                }
            }
            AlertAction::Resolve { alert_type } => {
                if let Some(alert) =
                    AlertRepo::resolve_for_machine_type(&state.pool, machine_id, alert_type)
                        .await?
                {
                    tracing::info!(
                        machine_id,
                        alert_id = alert.id,
                        alert_type = %alert.alert_type,
                        "Alert resolved"
                    );
                }
            }
        }
    }

    if let Some(status) = evaluation.transition {
        MachineStatusRepo::create(
            &state.pool,
            &CreateMachineStatus {
                machine_id,
                status,
                changed_by: None,
            },
        )
        .await?;
        tracing::info!(machine_id, status = %status, "Automatic status transition");
    }

    Ok(())
}

/// GET /api/sensor-data/machine/{id}/latest
///
/// The most recent reading, or an all-zero synthetic reading for machines
/// that have not reported yet.
pub async fn latest_reading(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SensorReading>> {
    if !MachineRepo::exists(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }));
    }
    let reading = SensorDataRepo::latest_for_machine(&state.pool, id)
        .await?
        .unwrap_or_else(|| SensorReading::zero_reading(id));
    Ok(Json(reading))
}

/// GET /api/sensor-data/machine/{id}
///
/// The last 100 readings, newest first.
pub async fn reading_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<SensorReading>>> {
    if !MachineRepo::exists(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }));
    }
    let readings = SensorDataRepo::history_for_machine(&state.pool, id).await?;
    Ok(Json(readings))
}

/// DELETE /api/sensor-data/all
///
/// Purge every stored reading. Admin-only maintenance operation.
pub async fn purge_all_readings(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<PurgeResponse>> {
    let deleted_count = SensorDataRepo::delete_all(&state.pool).await?;
    tracing::warn!(deleted_count, by = %admin.username, "All sensor data purged");
    Ok(Json(PurgeResponse { deleted_count }))
}
