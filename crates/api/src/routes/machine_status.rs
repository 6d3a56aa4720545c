//! Route definitions for the machine status log.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::machine_status;
use crate::state::AppState;

/// Routes mounted at `/machine-status`.
///
/// ```text
/// POST /              -> create_status   (technician+)
/// GET  /              -> list_statuses   (auth)
/// GET  /machine/{id}  -> current_status
/// GET  /history/{id}  -> status_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(machine_status::create_status))
        .route("/", get(machine_status::list_statuses))
        .route("/machine/{id}", get(machine_status::current_status))
        .route("/history/{id}", get(machine_status::status_history))
}
