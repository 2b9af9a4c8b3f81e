//! Cache key generators for consistent key naming.
//!
//! Keys are `{name}:{args...}`; the cache backend prepends the configured
//! prefix. Every key scoped to a page embeds its slug so that
//! [`page_pattern`] finds it on refresh.

/// Detail view of a page.
#[must_use]
pub fn page_detail(slug: &str) -> String {
    format!("page_detail:{slug}")
}

/// Detail view of a post, with or without its comments.
#[must_use]
pub fn post_detail(post_id: &str, include_comments: bool) -> String {
    format!("post_detail:{post_id}:{include_comments}")
}

/// Newest posts of a page.
#[must_use]
pub fn recent_posts(slug: &str, limit: u32) -> String {
    format!("recent_posts:{slug}:{limit}")
}

/// Statistics-only summary of a page.
#[must_use]
pub fn quick_summary(slug: &str) -> String {
    format!("quick_summary:{slug}")
}

/// Generated AI summary of a page.
#[must_use]
pub fn ai_summary(slug: &str) -> String {
    format!("ai_summary:{slug}")
}

/// Pattern matching every key that mentions the page.
#[must_use]
pub fn page_pattern(slug: &str) -> String {
    format!("*{slug}*")
}
