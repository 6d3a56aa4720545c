//! Route definitions, one module per resource.

pub mod alerts;
pub mod health;
pub mod machine_status;
pub mod machines;
pub mod sensor_data;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// All API routes, mounted under `/api` by the router builder.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/machines", machines::router())
        .nest("/sensor-data", sensor_data::router())
        .nest("/machine-status", machine_status::router())
        .nest("/alerts", alerts::router())
}
