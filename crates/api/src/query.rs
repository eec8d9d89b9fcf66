//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use foodgram_core::pagination::{clamp_limit, clamp_page, page_offset, MAX_PAGE_SIZE};
use foodgram_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Page-number pagination parameters (`?page=&limit=`).
///
/// `page` is 1-based. Values are clamped by [`PageParams::resolve`].
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
}

impl PageWindow {
    pub fn offset(&self) -> i64 {
        page_offset(self.page, self.limit)
    }
}

impl PageParams {
    /// Clamp to a valid page and limit, falling back to `default_limit`.
    pub fn resolve(&self, default_limit: i64) -> PageWindow {
        PageWindow {
            page: clamp_page(self.page),
            limit: clamp_limit(self.limit, default_limit, MAX_PAGE_SIZE),
        }
    }
}

/// Query parameters for `GET /users/subscriptions`.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Maximum number of recipes embedded per author.
    pub recipes_limit: Option<i64>,
}

impl SubscriptionListParams {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Query parameters for `POST /users/{id}/subscribe`.
#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimitParams {
    pub recipes_limit: Option<i64>,
}

/// Query parameters for `GET /recipes`.
///
/// Parsed from raw key/value pairs because `tags` may repeat
/// (`?tags=breakfast&tags=lunch`).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RecipeListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub author: Option<DbId>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeListParams {
    /// Build params from query pairs. Unknown keys are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> AppResult<Self> {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => params.page = Some(parse_int(key, value)?),
                "limit" => params.limit = Some(parse_int(key, value)?),
                "author" => params.author = Some(parse_int(key, value)?),
                "tags" => {
                    let slug = value.trim();
                    if !slug.is_empty() && !params.tags.iter().any(|t| t == slug) {
                        params.tags.push(slug.to_string());
                    }
                }
                "is_favorited" => params.is_favorited = parse_flag(key, value)?,
                "is_in_shopping_cart" => params.is_in_shopping_cart = parse_flag(key, value)?,
                _ => {}
            }
        }
        Ok(params)
    }

    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

fn parse_int(key: &str, value: &str) -> AppResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("`{key}` must be an integer")))
}

fn parse_flag(key: &str, value: &str) -> AppResult<bool> {
    match value.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(AppError::BadRequest(format!("`{key}` must be 0 or 1"))),
    }
}
