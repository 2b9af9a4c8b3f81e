//! Result type aliases for the insights service.

use crate::InsightsError;

/// A specialized `Result` type for insights operations.
pub type InsightsResult<T> = Result<T, InsightsError>;
