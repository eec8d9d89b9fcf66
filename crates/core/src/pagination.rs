//! Page-number pagination helpers shared by list endpoints.

/// Default page size when neither the client nor configuration provides one.
pub const DEFAULT_PAGE_SIZE: i64 = 6;

/// Maximum page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Normalize a 1-based page number; anything below 1 is page 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset of the first item on `page` (1-based) for the given `limit`.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit)
}

/// The page number after `page`, or `None` when `page` is the last one.
pub fn next_page(page: i64, limit: i64, total: i64) -> Option<i64> {
    if page_offset(page, limit).saturating_add(limit) < total {
        Some(page + 1)
    } else {
        None
    }
}
