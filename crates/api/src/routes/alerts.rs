//! Route definitions for alerts.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// GET   /              -> list_alerts          (auth; filterable)
/// GET   /active        -> list_active_alerts   (auth)
/// GET   /machine/{id}  -> list_machine_alerts  (auth)
/// POST  /              -> create_alert         (technician+)
/// PATCH /{id}/resolve  -> resolve_alert        (technician+)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::list_alerts))
        .route("/", post(alerts::create_alert))
        .route("/active", get(alerts::list_active_alerts))
        .route("/machine/{id}", get(alerts::list_machine_alerts))
        .route("/{id}/resolve", patch(alerts::resolve_alert))
}
