//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// A request for a page of results.
///
/// Pages are 1-based to match the query parameters accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub page_size: u32,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Creates a new page request. Zero values are clamped to 1.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Creates a page request for the first page with the default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(1, Self::DEFAULT_PAGE_SIZE)
    }

    /// Returns the row offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.page_size as u64
    }

    /// Returns the row limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// A page of results together with its position in the full result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Paginated<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The total number of items across all pages.
    pub total: u64,
    /// The current page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub page_size: u32,
    /// The total number of pages.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    /// Creates a new page of results.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total: u64) -> Self {
        let total_pages = if page_size > 0 {
            total.div_ceil(u64::from(page_size))
        } else {
            0
        };

        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }

    /// Creates a page from a request and the total row count.
    #[must_use]
    pub fn from_request(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self::new(items, request.page, request.page_size, total)
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::from_request(Vec::new(), request, 0)
    }

    /// Maps the page items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }

    /// Returns true if the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> IntoIterator for Paginated<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset_calculation() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(2, 20).offset(), 20);
        assert_eq!(PageRequest::new(6, 15).offset(), 75);
        assert_eq!(PageRequest::new(3, 10).limit(), 10);
    }

    #[test]
    fn test_page_request_clamps_zero() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_request_default() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 10);
    }

    #[test]
    fn test_paginated_first_of_many() {
        let page: Paginated<i32> = Paginated::new(vec![1, 2, 3], 1, 10, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_paginated_last_page() {
        let page: Paginated<i32> = Paginated::new(vec![1, 2], 3, 10, 22);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_paginated_single_page() {
        let page = Paginated::new(vec![1, 2, 3], 1, 10, 3);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_paginated_beyond_last_page() {
        let page: Paginated<i32> = Paginated::new(vec![], 5, 10, 12);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next);
        assert!(page.has_prev);
        assert!(page.is_empty());
    }

    #[test]
    fn test_paginated_empty() {
        let page: Paginated<i32> = Paginated::empty(PageRequest::first());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_paginated_map_keeps_position() {
        let page = Paginated::new(vec![1, 2, 3], 2, 3, 11);
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total_pages, 4); // ceil(11/3)
        assert_eq!(mapped.page, 2);
        assert!(mapped.has_next);
    }
}
