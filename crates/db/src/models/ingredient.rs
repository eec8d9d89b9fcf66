//! Ingredient models.

use foodgram_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ingredients` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Ingredient {
    pub id: DbId,
    pub name: String,
    pub measurement_unit: String,
}

/// Query parameters for `GET /api/ingredients`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientListParams {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// Outcome of a catalog import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogImportResult {
    pub inserted: u64,
    pub already_present: u64,
}
