//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches where the resource is writable

pub mod ingredient;
pub mod recipe;
pub mod recipe_mark;
pub mod tag;
pub mod user;
