//! Repository for the `ingredients` table.
//!
//! Ingredients are reference data: the API only reads them, and the catalog
//! loader inserts them.

use foodgram_core::ingredient_catalog::CatalogEntry;
use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::ingredient::{CatalogImportResult, Ingredient};

/// Column list for `ingredients` queries.
const COLUMNS: &str = "id, name, measurement_unit";

/// Provides read access and bulk import for ingredients.
pub struct IngredientRepo;

impl IngredientRepo {
    /// Find an ingredient by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ingredients WHERE id = $1");
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ingredients ordered by name, optionally filtered by a
    /// case-insensitive name prefix.
    pub async fn list(
        pool: &PgPool,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, sqlx::Error> {
        match name_prefix.map(str::trim).filter(|p| !p.is_empty()) {
            Some(prefix) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM ingredients \
                     WHERE lower(name) LIKE $1 ESCAPE '\\' \
                     ORDER BY name, measurement_unit"
                );
                sqlx::query_as::<_, Ingredient>(&query)
                    .bind(format!("{}%", escape_like(&prefix.to_lowercase())))
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM ingredients ORDER BY name, measurement_unit");
                sqlx::query_as::<_, Ingredient>(&query).fetch_all(pool).await
            }
        }
    }

    /// Return the subset of `ids` that do not exist, in input order.
    pub async fn find_missing(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT wanted.id \
             FROM UNNEST($1::bigint[]) WITH ORDINALITY AS wanted(id, ord) \
             WHERE NOT EXISTS (SELECT 1 FROM ingredients i WHERE i.id = wanted.id) \
             ORDER BY wanted.ord",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Insert catalog entries in one transaction, skipping `(name, unit)`
    /// pairs that already exist. Re-running with the same entries is a no-op.
    pub async fn import_catalog(
        pool: &PgPool,
        entries: &[CatalogEntry],
    ) -> Result<CatalogImportResult, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut result = CatalogImportResult::default();

        for entry in entries {
            let inserted = sqlx::query(
                "INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2) \
                 ON CONFLICT (name, measurement_unit) DO NOTHING",
            )
            .bind(&entry.name)
            .bind(&entry.measurement_unit)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if inserted > 0 {
                result.inserted += 1;
            } else {
                result.already_present += 1;
            }
        }

        tx.commit().await?;
        tracing::debug!(
            inserted = result.inserted,
            already_present = result.already_present,
            "Ingredient catalog imported",
        );
        Ok(result)
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
