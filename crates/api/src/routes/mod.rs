pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                                  list (public)
/// /users/me                               current user (requires auth)
/// /users/subscriptions                    followed authors (requires auth)
/// /users/{id}                             profile (public)
/// /users/{id}/subscribe                   follow, unfollow (requires auth)
///
/// /tags                                   list (public), create (admin)
/// /tags/{id}                              get (public), update, delete (admin)
///
/// /ingredients                            list with ?name= prefix (public)
/// /ingredients/{id}                       get (public)
///
/// /recipes                                list (public), create (requires auth)
/// /recipes/download_shopping_cart         plain-text shopping list (requires auth)
/// /recipes/{id}                           get (public), update, delete (author)
/// /recipes/{id}/favorite                  add, remove (requires auth)
/// /recipes/{id}/shopping_cart             add, remove (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/tags", tags::router())
        .nest("/ingredients", ingredients::router())
        .nest("/recipes", recipes::router())
}
