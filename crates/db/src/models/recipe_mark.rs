//! Per-user recipe sets: favorites and the shopping cart.

use serde::Serialize;

/// Which per-user recipe set a mark belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkKind {
    Favorite,
    ShoppingCart,
}

impl MarkKind {
    /// Backing table name. Never derived from user input.
    pub fn table(self) -> &'static str {
        match self {
            MarkKind::Favorite => "favorites",
            MarkKind::ShoppingCart => "shopping_cart",
        }
    }

    /// Entity name used in not-found errors for a missing mark.
    pub fn entity(self) -> &'static str {
        match self {
            MarkKind::Favorite => "Favorite",
            MarkKind::ShoppingCart => "ShoppingCartEntry",
        }
    }

    /// Human-readable collection name for messages.
    pub fn label(self) -> &'static str {
        match self {
            MarkKind::Favorite => "favorites",
            MarkKind::ShoppingCart => "shopping cart",
        }
    }
}
