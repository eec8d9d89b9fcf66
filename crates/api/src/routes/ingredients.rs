//! Route definitions for the ingredient catalog, mounted at `/ingredients`.

use axum::routing::get;
use axum::Router;

use crate::handlers::ingredients;
use crate::state::AppState;

/// ```text
/// GET /        -> list (?name= prefix filter)
/// GET /{id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ingredients::list))
        .route("/{id}", get(ingredients::get_by_id))
}
