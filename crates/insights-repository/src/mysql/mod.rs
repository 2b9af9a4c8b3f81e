//! MySQL implementations of the repository traits.

mod comment_repository;
mod employee_repository;
mod page_repository;
mod post_repository;

pub use comment_repository::MySqlCommentRepository;
pub use employee_repository::MySqlEmployeeRepository;
pub use page_repository::MySqlPageRepository;
pub use post_repository::MySqlPostRepository;

use insights_core::Paginated;

/// Builds a `LIKE` pattern for a case-insensitive substring match.
///
/// `%`, `_` and `\` in the input are escaped so they match literally.
pub(crate) fn contains_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub(crate) fn paginated<T>(items: Vec<T>, page: insights_core::PageRequest, total: i64) -> Paginated<T> {
    Paginated::from_request(items, page, u64::try_from(total).unwrap_or(0))
}
