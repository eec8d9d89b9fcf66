//! Handlers for the read-only `/ingredients` catalog.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use foodgram_core::error::CoreError;
use foodgram_core::types::DbId;
use foodgram_db::models::ingredient::IngredientListParams;
use foodgram_db::repositories::IngredientRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/ingredients?name=
///
/// List ingredients, optionally filtered by a case-insensitive name prefix.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IngredientListParams>,
) -> AppResult<impl IntoResponse> {
    let ingredients = IngredientRepo::list(&state.pool, params.name.as_deref()).await?;
    Ok(Json(DataResponse { data: ingredients }))
}

/// GET /api/ingredients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ingredient = IngredientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ingredient",
            id,
        }))?;
    Ok(Json(DataResponse { data: ingredient }))
}
