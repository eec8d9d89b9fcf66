//! Shared response envelope types for API handlers.
//!
//! Single resources use a `{ "data": ... }` envelope; paginated lists use
//! [`PageResponse`].

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paginated list envelope: `{ "count", "next_page", "data" }`.
///
/// `count` is the total number of matching items across all pages;
/// `next_page` is `null` on the last page.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub count: i64,
    pub next_page: Option<i64>,
    pub data: Vec<T>,
}

impl<T: Serialize> PageResponse<T> {
    pub fn new(data: Vec<T>, count: i64, page: i64, limit: i64) -> Self {
        Self {
            count,
            next_page: foodgram_core::pagination::next_page(page, limit, count),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_page_is_none_on_last_page() {
        let page = PageResponse::new(vec![1, 2], 8, 2, 6);
        assert_eq!(page.next_page, None);
        let json = serde_json::to_value(&page).unwrap();
        assert!(json["next_page"].is_null());
        assert_eq!(json["count"], 8);
    }

    #[test]
    fn next_page_points_forward() {
        let page = PageResponse::new(vec![0; 6], 8, 1, 6);
        assert_eq!(page.next_page, Some(2));
    }
}
