//! Handlers for the `/tags` resource.
//!
//! Reads are public; writes require the admin role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foodgram_core::error::CoreError;
use foodgram_core::types::DbId;
use foodgram_db::models::tag::{CreateTag, UpdateTag};
use foodgram_db::repositories::TagRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/tags
///
/// List all tags ordered by name.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/tags/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))?;
    Ok(Json(DataResponse { data: tag }))
}

/// POST /api/tags
///
/// Create a tag. Admin only.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTag>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let tag = TagRepo::create(&state.pool, &input).await?;

    tracing::info!(tag_id = tag.id, user_id = admin.user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// PATCH /api/tags/{id}
///
/// Update a tag's name, color, and/or slug. Admin only.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let tag = TagRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))?;

    tracing::info!(tag_id = id, user_id = admin.user_id, "Tag updated");

    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/tags/{id}
///
/// Delete a tag and its recipe links. Admin only.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TagRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Tag", id }));
    }

    tracing::info!(tag_id = id, user_id = admin.user_id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
