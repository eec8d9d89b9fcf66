//! Handlers for the `/recipes` resource, favorites, the shopping cart, and
//! the shopping list download.
//!
//! Create and update share one flow: the body is checked by
//! [`validate_recipe`], referenced tags and ingredients are confirmed to
//! exist, and only then is anything written. The write itself is a single
//! transaction in [`RecipeRepo`].

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foodgram_core::error::CoreError;
use foodgram_core::recipe::{validate_recipe, RecipeDraft, ValidatedRecipe};
use foodgram_core::shopping_list::{ShoppingList, SHOPPING_LIST_FILENAME};
use foodgram_core::types::DbId;
use foodgram_db::models::recipe::{Recipe, RecipeFilter, RecipePatch, RecipeSummary};
use foodgram_db::models::recipe_mark::MarkKind;
use foodgram_db::repositories::{IngredientRepo, RecipeMarkRepo, RecipeRepo, TagRepo};
use foodgram_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::query::RecipeListParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Recipe CRUD
// ---------------------------------------------------------------------------

/// GET /api/recipes?page=&limit=&author=&tags=&is_favorited=&is_in_shopping_cart=
///
/// `is_favorited` and `is_in_shopping_cart` only apply to an authenticated
/// caller and are ignored otherwise.
pub async fn list(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<impl IntoResponse> {
    let params = RecipeListParams::from_pairs(&pairs)?;
    let window = params.page_params().resolve(state.config.page_size);
    let viewer_id = viewer.map(|v| v.user_id);

    let filter = RecipeFilter {
        author_id: params.author,
        tag_slugs: params.tags,
        favorited_by: viewer_id.filter(|_| params.is_favorited),
        in_cart_of: viewer_id.filter(|_| params.is_in_shopping_cart),
    };

    let (recipes, total) =
        RecipeRepo::list_views(&state.pool, &filter, viewer_id, window.limit, window.offset())
            .await?;

    Ok(Json(PageResponse::new(recipes, total, window.page, window.limit)))
}

/// GET /api/recipes/{id}
pub async fn get_by_id(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let recipe = RecipeRepo::find_view(&state.pool, id, viewer.map(|v| v.user_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }))?;
    Ok(Json(DataResponse { data: recipe }))
}

/// POST /api/recipes
///
/// Create a recipe with its tags and ingredient amounts.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(draft): AppJson<RecipeDraft>,
) -> AppResult<impl IntoResponse> {
    let recipe = validate_recipe(&draft)?;
    ensure_references_exist(&state.pool, &recipe).await?;

    let created = RecipeRepo::create(&state.pool, auth.user_id, &recipe).await?;

    tracing::info!(
        recipe_id = created.id,
        user_id = auth.user_id,
        ingredients = recipe.ingredients.len(),
        "Recipe created",
    );

    let view = RecipeRepo::find_view(&state.pool, created.id, Some(auth.user_id))
        .await?
        .ok_or(AppError::InternalError(format!(
            "Recipe {} vanished after create",
            created.id
        )))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PATCH /api/recipes/{id}
///
/// Replace a recipe's tags and ingredients and update its fields. The body
/// has the same required fields as create; an omitted `image` keeps the
/// current one. Author only.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(draft): AppJson<RecipeDraft>,
) -> AppResult<impl IntoResponse> {
    let existing = find_recipe(&state.pool, id).await?;
    ensure_author(&existing, &auth)?;

    let recipe = validate_recipe(&draft)?;
    ensure_references_exist(&state.pool, &recipe).await?;

    let patch = RecipePatch {
        image: recipe.image.clone(),
        name: Some(recipe.name.clone()),
        text: Some(recipe.text.clone()),
        cooking_time: Some(recipe.cooking_time),
    };
    RecipeRepo::update(&state.pool, id, &patch, &recipe.tag_ids, &recipe.ingredients)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }))?;

    tracing::info!(
        recipe_id = id,
        user_id = auth.user_id,
        ingredients = recipe.ingredients.len(),
        "Recipe updated",
    );

    let view = RecipeRepo::find_view(&state.pool, id, Some(auth.user_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }))?;

    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/recipes/{id}
///
/// Author only. Associations, favorites and cart entries cascade.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_recipe(&state.pool, id).await?;
    ensure_author(&existing, &auth)?;

    if !RecipeRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }));
    }

    tracing::info!(recipe_id = id, user_id = auth.user_id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Favorites and shopping cart
// ---------------------------------------------------------------------------

/// POST /api/recipes/{id}/favorite
pub async fn add_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    add_mark(&state.pool, MarkKind::Favorite, &auth, id).await
}

/// DELETE /api/recipes/{id}/favorite
pub async fn remove_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    remove_mark(&state.pool, MarkKind::Favorite, &auth, id).await
}

/// POST /api/recipes/{id}/shopping_cart
pub async fn add_to_cart(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    add_mark(&state.pool, MarkKind::ShoppingCart, &auth, id).await
}

/// DELETE /api/recipes/{id}/shopping_cart
pub async fn remove_from_cart(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    remove_mark(&state.pool, MarkKind::ShoppingCart, &auth, id).await
}

/// GET /api/recipes/download_shopping_cart
///
/// Plain-text shopping list: every ingredient across the caller's cart,
/// summed per name and unit.
pub async fn download_shopping_cart(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = RecipeMarkRepo::cart_rows(&state.pool, auth.user_id).await?;
    let list = ShoppingList::aggregate(rows).map_err(CoreError::from)?;

    tracing::info!(
        user_id = auth.user_id,
        items = list.len(),
        "Shopping list rendered",
    );

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename={SHOPPING_LIST_FILENAME}"),
            ),
        ],
        list.render(),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_recipe(pool: &DbPool, id: DbId) -> AppResult<Recipe> {
    RecipeRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }))
}

fn ensure_author(recipe: &Recipe, auth: &AuthUser) -> AppResult<()> {
    if recipe.author_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author can modify this recipe".into(),
        )));
    }
    Ok(())
}

/// Reject the recipe if any referenced tag or ingredient does not exist.
async fn ensure_references_exist(pool: &DbPool, recipe: &ValidatedRecipe) -> AppResult<()> {
    if let Some(&id) = TagRepo::find_missing(pool, &recipe.tag_ids).await?.first() {
        return Err(AppError::Core(CoreError::NotFound { entity: "Tag", id }));
    }
    let ingredient_ids = recipe.ingredient_ids();
    if let Some(&id) = IngredientRepo::find_missing(pool, &ingredient_ids)
        .await?
        .first()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Ingredient",
            id,
        }));
    }
    Ok(())
}

async fn add_mark(
    pool: &DbPool,
    kind: MarkKind,
    auth: &AuthUser,
    recipe_id: DbId,
) -> AppResult<(StatusCode, Json<DataResponse<RecipeSummary>>)> {
    let summary = RecipeRepo::find_summary(pool, recipe_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id: recipe_id,
        }))?;

    if !RecipeMarkRepo::add(pool, kind, auth.user_id, recipe_id).await? {
        return Err(AppError::Core(CoreError::AlreadyExists(format!(
            "Recipe {recipe_id} is already in {}",
            kind.label()
        ))));
    }

    tracing::info!(
        recipe_id,
        user_id = auth.user_id,
        collection = kind.label(),
        "Recipe marked",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}

async fn remove_mark(
    pool: &DbPool,
    kind: MarkKind,
    auth: &AuthUser,
    recipe_id: DbId,
) -> AppResult<StatusCode> {
    find_recipe(pool, recipe_id).await?;

    if !RecipeMarkRepo::remove(pool, kind, auth.user_id, recipe_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: kind.entity(),
            id: recipe_id,
        }));
    }

    tracing::info!(
        recipe_id,
        user_id = auth.user_id,
        collection = kind.label(),
        "Recipe unmarked",
    );

    Ok(StatusCode::NO_CONTENT)
}
