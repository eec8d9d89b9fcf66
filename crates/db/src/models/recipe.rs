//! Recipe models: rows, viewer-aware views, and the update patch.

use foodgram_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::user::UserProfile;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `recipes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recipe {
    pub id: DbId,
    pub author_id: DbId,
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub created_at: Timestamp,
}

/// A recipe row plus the viewer's favorite/cart membership.
///
/// Both flags are `false` for anonymous viewers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecipeRow {
    pub id: DbId,
    pub author_id: DbId,
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub created_at: Timestamp,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Short recipe form used in favorite/cart responses and subscription lists.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RecipeSummary {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

/// One ingredient association joined with its catalog entry.
///
/// `id` is the ingredient id, matching the shape clients submit.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RecipeIngredientDetail {
    #[serde(skip)]
    pub recipe_id: DbId,
    pub id: DbId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// One tag attached to a recipe.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RecipeTagDetail {
    #[serde(skip)]
    pub recipe_id: DbId,
    pub id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub slug: Option<String>,
}

/// Full recipe view: the row enriched with tags, author profile, and
/// ingredient associations, as seen by one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: DbId,
    pub tags: Vec<RecipeTagDetail>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipeIngredientDetail>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
}

/// An author the viewer follows, with a preview of their recipes.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorWithRecipes {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: i64,
}

// ---------------------------------------------------------------------------
// Write-side structs
// ---------------------------------------------------------------------------

/// Scalar fields of a recipe update.
///
/// `None` keeps the stored value; there is no way to clear a field through a
/// patch.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

// ---------------------------------------------------------------------------
// Query filters
// ---------------------------------------------------------------------------

/// Filters for recipe listing. Empty/`None` filters match everything.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author_id: Option<DbId>,
    /// Tag slugs; a recipe matches if it carries any of them.
    pub tag_slugs: Vec<String>,
    /// Only recipes this user has favorited.
    pub favorited_by: Option<DbId>,
    /// Only recipes in this user's shopping cart.
    pub in_cart_of: Option<DbId>,
}
