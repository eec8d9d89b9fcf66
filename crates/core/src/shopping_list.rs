//! Shopping list aggregation.
//!
//! Folds the flat `(ingredient name, unit, amount)` rows of every recipe in a
//! user's cart into one list keyed by `(name, unit)`, summing amounts. Keys keep
//! first-seen order, so callers that feed rows sorted by ingredient name get an
//! alphabetical report.
//!
//! Keying is by name and unit, not by ingredient id: two catalog entries that
//! share both are merged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// First line of every rendered report.
pub const SHOPPING_LIST_HEADER: &str = "СПИСОК ПОКУПОК:";

/// Suggested download filename for the rendered report.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// One ingredient association of one cart recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListRow {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

impl ShoppingListRow {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: i64) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// One line of the aggregated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Rows that upstream invariants should have made impossible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShoppingListError {
    #[error("non-positive amount {amount} for {name} ({measurement_unit})")]
    NonPositiveAmount {
        name: String,
        measurement_unit: String,
        amount: i64,
    },

    #[error("total amount overflow for {name} ({measurement_unit})")]
    AmountOverflow {
        name: String,
        measurement_unit: String,
    },
}

/// Aggregated shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    totals: IndexMap<(String, String), i64>,
}

impl ShoppingList {
    /// Fold rows into per-`(name, unit)` totals.
    ///
    /// A zero or negative amount is reported, never skipped.
    pub fn aggregate<I>(rows: I) -> Result<Self, ShoppingListError>
    where
        I: IntoIterator<Item = ShoppingListRow>,
    {
        let mut totals: IndexMap<(String, String), i64> = IndexMap::new();

        for row in rows {
            if row.amount <= 0 {
                return Err(ShoppingListError::NonPositiveAmount {
                    name: row.name,
                    measurement_unit: row.measurement_unit,
                    amount: row.amount,
                });
            }

            let key = (row.name, row.measurement_unit);
            let current = totals.get(&key).copied().unwrap_or(0);
            let Some(total) = current.checked_add(row.amount) else {
                return Err(ShoppingListError::AmountOverflow {
                    name: key.0,
                    measurement_unit: key.1,
                });
            };
            // Re-inserting an existing key keeps its original position.
            totals.insert(key, total);
        }

        Ok(Self { totals })
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Items in output order.
    pub fn items(&self) -> Vec<ShoppingListItem> {
        self.totals
            .iter()
            .map(|((name, unit), total)| ShoppingListItem {
                name: name.clone(),
                measurement_unit: unit.clone(),
                total: *total,
            })
            .collect()
    }

    /// Report lines, each terminated by `\n`: the header, then
    /// `- {name} ({unit}): {total} ` per item (note the trailing space).
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.totals.len() + 1);
        lines.push(format!("{SHOPPING_LIST_HEADER}\n"));
        for ((name, unit), total) in &self.totals {
            lines.push(format!("- {name} ({unit}): {total} \n"));
        }
        lines
    }

    /// The full plain-text report.
    pub fn render(&self) -> String {
        self.lines().concat()
    }
}
