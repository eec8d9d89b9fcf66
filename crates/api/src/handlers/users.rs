//! Handlers for user profiles and subscriptions.
//!
//! Profiles are readable anonymously; `is_subscribed` reflects the viewer and
//! is `false` without a token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foodgram_core::error::CoreError;
use foodgram_core::types::DbId;
use foodgram_db::models::recipe::AuthorWithRecipes;
use foodgram_db::models::user::UserProfile;
use foodgram_db::repositories::{RecipeRepo, SubscriptionRepo, UserRepo};
use foodgram_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{PageParams, RecipesLimitParams, SubscriptionListParams};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// GET /api/users?page=&limit=
pub async fn list(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let window = params.resolve(state.config.page_size);
    let viewer_id = viewer.map(|v| v.user_id);

    let users =
        UserRepo::list_profiles(&state.pool, viewer_id, window.limit, window.offset()).await?;
    let total = UserRepo::count(&state.pool).await?;

    Ok(Json(PageResponse::new(users, total, window.page, window.limit)))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = find_profile(&state.pool, id, viewer.map(|v| v.user_id)).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/users/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profile = find_profile(&state.pool, auth.user_id, Some(auth.user_id)).await?;
    Ok(Json(DataResponse { data: profile }))
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// GET /api/users/subscriptions?page=&limit=&recipes_limit=
///
/// Authors the caller follows, each with a preview of their recipes.
pub async fn subscriptions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SubscriptionListParams>,
) -> AppResult<impl IntoResponse> {
    let window = params.page_params().resolve(state.config.page_size);

    let authors =
        SubscriptionRepo::list_authors(&state.pool, auth.user_id, window.limit, window.offset())
            .await?;
    let total = SubscriptionRepo::count_authors(&state.pool, auth.user_id).await?;

    let mut data = Vec::with_capacity(authors.len());
    for profile in authors {
        data.push(with_recipes(&state.pool, profile, params.recipes_limit).await?);
    }

    Ok(Json(PageResponse::new(data, total, window.page, window.limit)))
}

/// POST /api/users/{id}/subscribe?recipes_limit=
///
/// Follow an author. Repeating the request is rejected with `ALREADY_EXISTS`.
pub async fn subscribe(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(author_id): Path<DbId>,
    Query(params): Query<RecipesLimitParams>,
) -> AppResult<impl IntoResponse> {
    if author_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot subscribe to yourself".into(),
        )));
    }

    let profile = find_profile(&state.pool, author_id, Some(auth.user_id)).await?;

    let created = SubscriptionRepo::subscribe(&state.pool, author_id, auth.user_id).await?;
    if !created {
        return Err(AppError::Core(CoreError::AlreadyExists(format!(
            "Already subscribed to user {author_id}"
        ))));
    }

    tracing::info!(author_id, user_id = auth.user_id, "Subscribed to author");

    let profile = UserProfile {
        is_subscribed: true,
        ..profile
    };
    let data = with_recipes(&state.pool, profile, params.recipes_limit).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// DELETE /api/users/{id}/subscribe
pub async fn unsubscribe(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(author_id): Path<DbId>,
) -> AppResult<StatusCode> {
    UserRepo::find_by_id(&state.pool, author_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: author_id,
        }))?;

    let removed = SubscriptionRepo::unsubscribe(&state.pool, author_id, auth.user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: author_id,
        }));
    }

    tracing::info!(author_id, user_id = auth.user_id, "Unsubscribed from author");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_profile(
    pool: &DbPool,
    id: DbId,
    viewer_id: Option<DbId>,
) -> AppResult<UserProfile> {
    UserRepo::find_profile(pool, id, viewer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

async fn with_recipes(
    pool: &DbPool,
    profile: UserProfile,
    recipes_limit: Option<i64>,
) -> AppResult<AuthorWithRecipes> {
    let recipes =
        RecipeRepo::summaries_by_author(pool, profile.id, recipes_limit.map(|l| l.max(0))).await?;
    let recipes_count = RecipeRepo::count_by_author(pool, profile.id).await?;
    Ok(AuthorWithRecipes {
        profile,
        recipes,
        recipes_count,
    })
}
