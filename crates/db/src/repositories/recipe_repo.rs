//! Repository for `recipes` and its association tables (`recipe_tags`,
//! `recipe_ingredients`).
//!
//! A recipe and its associations are always written together: create and
//! update each run in one transaction, and update replaces the full
//! ingredient and tag sets rather than patching them.

use std::collections::HashMap;

use foodgram_core::recipe::{IngredientAmount, ValidatedRecipe};
use foodgram_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::recipe::{
    Recipe, RecipeFilter, RecipeIngredientDetail, RecipePatch, RecipeRow, RecipeSummary,
    RecipeTagDetail, RecipeView,
};
use crate::repositories::UserRepo;

/// Column list for the `recipes` table.
const COLUMNS: &str = "id, author_id, name, text, image, cooking_time, created_at";

/// Viewer-aware column list for the `recipes r` alias.
///
/// `$1` is the viewer id; both flags are `false` when it is NULL.
const ROW_COLUMNS: &str = "\
    r.id, r.author_id, r.name, r.text, r.image, r.cooking_time, r.created_at, \
    EXISTS (SELECT 1 FROM favorites f \
            WHERE f.recipe_id = r.id AND f.user_id = $1) AS is_favorited, \
    EXISTS (SELECT 1 FROM shopping_cart c \
            WHERE c.recipe_id = r.id AND c.user_id = $1) AS is_in_shopping_cart";

/// Filter predicate over the `recipes r` alias; parameters `$2..=$5`.
const FILTER_PREDICATE: &str = "\
    ($2::bigint IS NULL OR r.author_id = $2) \
    AND (cardinality($3::text[]) = 0 OR EXISTS ( \
        SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
        WHERE rt.recipe_id = r.id AND t.slug = ANY($3))) \
    AND ($4::bigint IS NULL OR EXISTS ( \
        SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = $4)) \
    AND ($5::bigint IS NULL OR EXISTS ( \
        SELECT 1 FROM shopping_cart c WHERE c.recipe_id = r.id AND c.user_id = $5))";

/// Provides recipe CRUD and association reads.
pub struct RecipeRepo;

impl RecipeRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a recipe with its tags and ingredient associations.
    ///
    /// All rows are written in one transaction; on any error nothing is
    /// persisted.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &ValidatedRecipe,
    ) -> Result<Recipe, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO recipes (author_id, name, text, image, cooking_time) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let recipe = sqlx::query_as::<_, Recipe>(&query)
            .bind(author_id)
            .bind(&input.name)
            .bind(&input.text)
            .bind(&input.image)
            .bind(input.cooking_time)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_tags_inner(&mut tx, recipe.id, &input.tag_ids).await?;
        Self::insert_ingredients_inner(&mut tx, recipe.id, &input.ingredients).await?;

        tx.commit().await?;
        tracing::debug!(
            recipe_id = recipe.id,
            ingredients = input.ingredients.len(),
            "Recipe inserted",
        );
        Ok(recipe)
    }

    /// Replace a recipe's ingredient and tag sets and patch its scalar fields.
    ///
    /// The recipe row is locked first, so concurrent updates to the same
    /// recipe serialize instead of interleaving their delete/insert pairs.
    /// Returns `None` if the recipe does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &RecipePatch,
        tag_ids: &[DbId],
        ingredients: &[IngredientAmount],
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM recipes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_ingredients_inner(&mut tx, id, ingredients).await?;
        Self::set_tags_inner(&mut tx, id, tag_ids).await?;

        let query = format!(
            "UPDATE recipes SET \
                 image = COALESCE($2, image), \
                 name = COALESCE($3, name), \
                 text = COALESCE($4, text), \
                 cooking_time = COALESCE($5, cooking_time) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let recipe = sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .bind(&patch.image)
            .bind(&patch.name)
            .bind(&patch.text)
            .bind(patch.cooking_time)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(
            recipe_id = id,
            ingredients = ingredients.len(),
            "Recipe associations replaced",
        );
        Ok(Some(recipe))
    }

    /// Delete a recipe. Associations, favorites and cart marks cascade.
    ///
    /// Returns `true` if a recipe was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a recipe row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes WHERE id = $1");
        sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a recipe with the viewer's favorite/cart flags.
    pub async fn find_row(
        pool: &PgPool,
        id: DbId,
        viewer_id: Option<DbId>,
    ) -> Result<Option<RecipeRow>, sqlx::Error> {
        let query = format!("SELECT {ROW_COLUMNS} FROM recipes r WHERE r.id = $2");
        sqlx::query_as::<_, RecipeRow>(&query)
            .bind(viewer_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List recipes matching `filter`, newest first, then by name.
    pub async fn list(
        pool: &PgPool,
        filter: &RecipeFilter,
        viewer_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ROW_COLUMNS} FROM recipes r \
             WHERE {FILTER_PREDICATE} \
             ORDER BY r.created_at DESC, r.name, r.id \
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, RecipeRow>(&query)
            .bind(viewer_id)
            .bind(filter.author_id)
            .bind(&filter.tag_slugs)
            .bind(filter.favorited_by)
            .bind(filter.in_cart_of)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of recipes matching `filter`.
    pub async fn count(pool: &PgPool, filter: &RecipeFilter) -> Result<i64, sqlx::Error> {
        // `$1` is unused here but keeps parameter numbering shared with `list`.
        let query = format!(
            "SELECT COUNT(*) FROM recipes r \
             WHERE $1::bigint IS NULL AND {FILTER_PREDICATE}"
        );
        sqlx::query_scalar(&query)
            .bind(None::<DbId>)
            .bind(filter.author_id)
            .bind(&filter.tag_slugs)
            .bind(filter.favorited_by)
            .bind(filter.in_cart_of)
            .fetch_one(pool)
            .await
    }

    /// Short form of a recipe.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RecipeSummary>, sqlx::Error> {
        sqlx::query_as::<_, RecipeSummary>(
            "SELECT id, name, image, cooking_time FROM recipes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Short forms of an author's recipes, newest first. `limit = None`
    /// returns all of them.
    pub async fn summaries_by_author(
        pool: &PgPool,
        author_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<RecipeSummary>, sqlx::Error> {
        sqlx::query_as::<_, RecipeSummary>(
            "SELECT id, name, image, cooking_time FROM recipes \
             WHERE author_id = $1 \
             ORDER BY created_at DESC, name, id \
             LIMIT $2",
        )
        .bind(author_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Number of recipes written by `author_id`.
    pub async fn count_by_author(pool: &PgPool, author_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(pool)
            .await
    }

    /// Tags of every recipe in `recipe_ids`, ordered by tag name.
    pub async fn tags_for(
        pool: &PgPool,
        recipe_ids: &[DbId],
    ) -> Result<Vec<RecipeTagDetail>, sqlx::Error> {
        sqlx::query_as::<_, RecipeTagDetail>(
            "SELECT rt.recipe_id, t.id, t.name, t.color, t.slug \
             FROM recipe_tags rt \
             JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.recipe_id = ANY($1) \
             ORDER BY rt.recipe_id, t.name",
        )
        .bind(recipe_ids)
        .fetch_all(pool)
        .await
    }

    /// Ingredient associations of every recipe in `recipe_ids`, in insertion
    /// order per recipe.
    pub async fn ingredients_for(
        pool: &PgPool,
        recipe_ids: &[DbId],
    ) -> Result<Vec<RecipeIngredientDetail>, sqlx::Error> {
        sqlx::query_as::<_, RecipeIngredientDetail>(
            "SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount \
             FROM recipe_ingredients ri \
             JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE ri.recipe_id = ANY($1) \
             ORDER BY ri.recipe_id, ri.id",
        )
        .bind(recipe_ids)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Composed views
    // -----------------------------------------------------------------------

    /// Full view of one recipe as seen by `viewer_id`.
    pub async fn find_view(
        pool: &PgPool,
        id: DbId,
        viewer_id: Option<DbId>,
    ) -> Result<Option<RecipeView>, sqlx::Error> {
        match Self::find_row(pool, id, viewer_id).await? {
            Some(row) => {
                let mut views = Self::assemble_views(pool, vec![row], viewer_id).await?;
                Ok(views.pop())
            }
            None => Ok(None),
        }
    }

    /// One page of full views matching `filter`, plus the total match count.
    pub async fn list_views(
        pool: &PgPool,
        filter: &RecipeFilter,
        viewer_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<RecipeView>, i64), sqlx::Error> {
        let rows = Self::list(pool, filter, viewer_id, limit, offset).await?;
        let total = Self::count(pool, filter).await?;
        let views = Self::assemble_views(pool, rows, viewer_id).await?;
        Ok((views, total))
    }

    /// Attach tags, ingredients and author profiles to rows, keeping row order.
    ///
    /// Associations are fetched in one query each for the whole batch.
    async fn assemble_views(
        pool: &PgPool,
        rows: Vec<RecipeRow>,
        viewer_id: Option<DbId>,
    ) -> Result<Vec<RecipeView>, sqlx::Error> {
        let recipe_ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<DbId> = rows.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut tags: HashMap<DbId, Vec<RecipeTagDetail>> = HashMap::new();
        for tag in Self::tags_for(pool, &recipe_ids).await? {
            tags.entry(tag.recipe_id).or_default().push(tag);
        }

        let mut ingredients: HashMap<DbId, Vec<RecipeIngredientDetail>> = HashMap::new();
        for item in Self::ingredients_for(pool, &recipe_ids).await? {
            ingredients.entry(item.recipe_id).or_default().push(item);
        }

        let authors: HashMap<DbId, _> = UserRepo::find_profiles(pool, &author_ids, viewer_id)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            // The author FK cascades, so a recipe row always has its author.
            let Some(author) = authors.get(&row.author_id).cloned() else {
                return Err(sqlx::Error::RowNotFound);
            };
            views.push(RecipeView {
                id: row.id,
                tags: tags.remove(&row.id).unwrap_or_default(),
                author,
                ingredients: ingredients.remove(&row.id).unwrap_or_default(),
                is_favorited: row.is_favorited,
                is_in_shopping_cart: row.is_in_shopping_cart,
                name: row.name,
                image: row.image,
                text: row.text,
                cooking_time: row.cooking_time,
            });
        }
        Ok(views)
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    /// Replace the recipe's tag set.
    async fn set_tags_inner(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) \
             SELECT $1, tag_id FROM UNNEST($2::bigint[]) AS t(tag_id) \
             ON CONFLICT DO NOTHING",
        )
        .bind(recipe_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Bulk-insert one association row per entry, preserving entry order.
    async fn insert_ingredients_inner(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: DbId,
        ingredients: &[IngredientAmount],
    ) -> Result<(), sqlx::Error> {
        let ids: Vec<DbId> = ingredients.iter().map(|i| i.ingredient_id).collect();
        let amounts: Vec<i32> = ingredients.iter().map(|i| i.amount).collect();

        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) \
             SELECT $1, e.ingredient_id, e.amount \
             FROM UNNEST($2::bigint[], $3::int[]) WITH ORDINALITY AS e(ingredient_id, amount, ord) \
             ORDER BY e.ord",
        )
        .bind(recipe_id)
        .bind(&ids)
        .bind(&amounts)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
