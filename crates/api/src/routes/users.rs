//! Route definitions for user management and authentication.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// Register and login are public; everything else requires authentication
/// (enforced by handler extractors).
///
/// ```text
/// POST  /register             -> register
/// POST  /login                -> login
/// GET   /                     -> list_users           (auth)
/// PATCH /{id}                 -> update_user          (admin)
/// DELETE /{id}                -> delete_user          (admin)
/// PATCH /profile/{id}         -> update_profile       (self or admin)
/// POST  /change-password/{id} -> change_password      (self or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/", get(users::list_users))
        .route("/{id}", patch(users::update_user))
        .route("/{id}", delete(users::delete_user))
        .route("/profile/{id}", patch(users::update_profile))
        .route("/change-password/{id}", post(users::change_password))
}
