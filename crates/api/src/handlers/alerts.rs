//! Handlers for alert listing, manual creation, and resolution.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use machwatch_core::alert::{AlertType, Severity};
use machwatch_core::error::CoreError;
use machwatch_core::types::DbId;
use machwatch_db::models::alert::{Alert, CreateAlert};
use machwatch_db::repositories::{AlertRepo, MachineRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireTechnician};
use crate::query::AlertListParams;
use crate::state::AppState;

/// Request body for manual alert creation.
#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    /// Target machine id.
    pub machine: DbId,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
}

/// GET /api/alerts
///
/// Filterable by machine, type, severity, active-state, and creation date
/// range. Newest first.
pub async fn list_alerts(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<AlertListParams>,
) -> AppResult<Json<Vec<Alert>>> {
    let filter = params.into_filter()?;
    let alerts = AlertRepo::list_filtered(&state.pool, &filter).await?;
    Ok(Json(alerts))
}

/// GET /api/alerts/active
pub async fn list_active_alerts(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Vec<Alert>>> {
    let alerts = AlertRepo::list_active(&state.pool).await?;
    Ok(Json(alerts))
}

/// GET /api/alerts/machine/{id}
pub async fn list_machine_alerts(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Alert>>> {
    if !MachineRepo::exists(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id,
        }));
    }
    let alerts = AlertRepo::list_for_machine(&state.pool, id).await?;
    Ok(Json(alerts))
}

/// POST /api/alerts
///
/// Manual alert creation (maintenance notes, observed faults). Subject to
/// the same one-active-per-type rule as evaluator-raised alerts: a
/// duplicate active alert answers 409.
pub async fn create_alert(
    State(state): State<AppState>,
    RequireTechnician(user): RequireTechnician,
    Json(input): Json<CreateAlertRequest>,
) -> AppResult<(StatusCode, Json<Alert>)> {
    let alert_type: AlertType = input.alert_type.parse().map_err(AppError::Core)?;
    let severity: Severity = input.severity.parse().map_err(AppError::Core)?;

    if input.message.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "message is required".into(),
        )));
    }

    if !MachineRepo::exists(&state.pool, input.machine).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Machine",
            id: input.machine,
        }));
    }

    let alert = AlertRepo::raise(
        &state.pool,
        &CreateAlert {
            machine_id: input.machine,
            alert_type,
            severity,
            message: input.message.trim().to_string(),
        },
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(format!(
            "An active {alert_type} alert already exists for this machine"
        )))
    })?;

    tracing::info!(
        alert_id = alert.id,
        machine_id = alert.machine_id,
        alert_type = %alert.alert_type,
        by = %user.username,
        "Manual alert created"
    );

    Ok((StatusCode::CREATED, Json(alert)))
}

/// PATCH /api/alerts/{id}/resolve
///
/// Idempotent: resolving an already-resolved alert returns the same
/// terminal row with its original `resolved_at`.
pub async fn resolve_alert(
    State(state): State<AppState>,
    RequireTechnician(user): RequireTechnician,
    Path(id): Path<DbId>,
) -> AppResult<Json<Alert>> {
    if let Some(alert) = AlertRepo::resolve(&state.pool, id).await? {
        tracing::info!(alert_id = id, by = %user.username, "Alert resolved");
        return Ok(Json(alert));
    }

    // Not flipped: either already resolved (return terminal state) or absent.
    let alert = AlertRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Alert",
            id,
        }))?;
    Ok(Json(alert))
}
