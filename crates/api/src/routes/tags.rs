//! Route definitions for tags, mounted at `/tags`.

use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// ```text
/// GET    /        -> list
/// POST   /        -> create (admin only)
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update (admin only)
/// DELETE /{id}    -> delete (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list).post(tags::create))
        .route(
            "/{id}",
            get(tags::get_by_id).patch(tags::update).delete(tags::delete),
        )
}
