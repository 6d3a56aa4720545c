//! Route definitions for machine CRUD.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::machines;
use crate::state::AppState;

/// Routes mounted at `/machines`.
///
/// ```text
/// GET    /      -> list_machines   (auth)
/// POST   /      -> create_machine  (technician+)
/// GET    /{id}  -> get_machine     (auth)
/// PATCH  /{id}  -> update_machine  (technician+)
/// DELETE /{id}  -> delete_machine  (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(machines::list_machines))
        .route("/", post(machines::create_machine))
        .route("/{id}", get(machines::get_machine))
        .route("/{id}", patch(machines::update_machine))
        .route("/{id}", delete(machines::delete_machine))
}
