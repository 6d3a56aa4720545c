//! Route definitions for sensor data ingestion and queries.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::sensor_data;
use crate::state::AppState;

/// Routes mounted at `/sensor-data`.
///
/// Ingestion and reads are open (device endpoint); the purge is admin-only.
///
/// ```text
/// POST   /                      -> create_reading
/// GET    /machine/{id}/latest   -> latest_reading
/// GET    /machine/{id}          -> reading_history
/// DELETE /all                   -> purge_all_readings  (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sensor_data::create_reading))
        .route("/machine/{id}/latest", get(sensor_data::latest_reading))
        .route("/machine/{id}", get(sensor_data::reading_history))
        .route("/all", delete(sensor_data::purge_all_readings))
}
