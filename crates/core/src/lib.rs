//! Foodgram domain logic.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and `api`
//! crates build on these types and rules.

pub mod error;
pub mod ingredient_catalog;
pub mod pagination;
pub mod recipe;
pub mod roles;
pub mod shopping_list;
pub mod tag;
pub mod types;
