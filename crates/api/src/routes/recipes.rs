//! Route definitions for recipes, mounted at `/recipes`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::recipes;
use crate::state::AppState;

/// ```text
/// GET    /                          -> list
/// POST   /                          -> create (requires auth)
/// GET    /download_shopping_cart    -> download_shopping_cart (requires auth)
/// GET    /{id}                      -> get_by_id
/// PATCH  /{id}                      -> update (author only)
/// DELETE /{id}                      -> delete (author only)
/// POST   /{id}/favorite             -> add_favorite
/// DELETE /{id}/favorite             -> remove_favorite
/// POST   /{id}/shopping_cart        -> add_to_cart
/// DELETE /{id}/shopping_cart        -> remove_from_cart
/// ```
///
/// `PUT /{id}` is not routed and answers 405.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list).post(recipes::create))
        .route(
            "/download_shopping_cart",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(recipes::get_by_id)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/{id}/favorite",
            post(recipes::add_favorite).delete(recipes::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        )
}
