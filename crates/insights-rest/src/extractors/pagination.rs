//! Pagination query helpers.

use insights_config::PaginationConfig;
use insights_core::PageRequest;

/// Serde default for the 1-based `page` query parameter.
pub const fn default_page() -> u32 {
    1
}

/// Builds a page request from query values, falling back to the configured
/// default size and never exceeding the configured maximum.
pub fn page_request(page: u32, page_size: Option<u32>, config: &PaginationConfig) -> PageRequest {
    let size = page_size
        .unwrap_or(config.default_page_size)
        .min(config.max_page_size);
    PageRequest::new(page, size)
}
