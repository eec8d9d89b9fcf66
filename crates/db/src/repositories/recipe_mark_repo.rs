//! Repository for the per-user recipe sets (`favorites`, `shopping_cart`).
//!
//! Both tables share a shape, so one repository serves both, selected by
//! [`MarkKind`].

use foodgram_core::shopping_list::ShoppingListRow;
use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::recipe_mark::MarkKind;

/// Provides add/remove for favorites and cart, plus the cart ingredient rows.
pub struct RecipeMarkRepo;

impl RecipeMarkRepo {
    /// Mark a recipe for a user.
    ///
    /// Returns `false` when the mark already existed; no second row is added.
    pub async fn add(
        pool: &PgPool,
        kind: MarkKind,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, recipe_id) DO NOTHING",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a mark. Returns `true` if a row was deleted.
    pub async fn remove(
        pool: &PgPool,
        kind: MarkKind,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the user has marked the recipe.
    pub async fn exists(
        pool: &PgPool,
        kind: MarkKind,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND recipe_id = $2)",
            kind.table()
        );
        sqlx::query_scalar(&query)
            .bind(user_id)
            .bind(recipe_id)
            .fetch_one(pool)
            .await
    }

    /// Every ingredient association of every recipe in the user's cart,
    /// ordered by ingredient name then unit.
    ///
    /// Rows are not summed here; aggregation happens in
    /// [`foodgram_core::shopping_list::ShoppingList::aggregate`].
    pub async fn cart_rows(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ShoppingListRow>, sqlx::Error> {
        let rows: Vec<(String, String, i32)> = sqlx::query_as(
            "SELECT i.name, i.measurement_unit, ri.amount \
             FROM shopping_cart c \
             JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id \
             JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE c.user_id = $1 \
             ORDER BY i.name, i.measurement_unit, ri.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, unit, amount)| ShoppingListRow::new(name, unit, i64::from(amount)))
            .collect())
    }
}
