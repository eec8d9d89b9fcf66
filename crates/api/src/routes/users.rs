//! Route definitions for users and subscriptions, mounted at `/users`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list
/// GET    /me                -> me (requires auth)
/// GET    /subscriptions     -> subscriptions (requires auth)
/// GET    /{id}              -> get_by_id
/// POST   /{id}/subscribe    -> subscribe (requires auth)
/// DELETE /{id}/subscribe    -> unsubscribe (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/me", get(users::me))
        .route("/subscriptions", get(users::subscriptions))
        .route("/{id}", get(users::get_by_id))
        .route(
            "/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
}
