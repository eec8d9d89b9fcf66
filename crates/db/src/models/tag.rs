//! Tag models and DTOs.

use foodgram_core::tag::{validate_hex_color, validate_slug, MAX_TAG_FIELD_LEN};
use foodgram_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tags` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub slug: Option<String>,
}

/// DTO for creating a tag.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTag {
    #[validate(length(min = 1, max = MAX_TAG_FIELD_LEN))]
    pub name: String,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
    #[validate(
        length(min = 1, max = MAX_TAG_FIELD_LEN),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,
}

/// DTO for updating a tag. Omitted fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTag {
    #[validate(length(min = 1, max = MAX_TAG_FIELD_LEN))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
    #[validate(
        length(min = 1, max = MAX_TAG_FIELD_LEN),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,
}
