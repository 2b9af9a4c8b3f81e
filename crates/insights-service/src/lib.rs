//! # Insights Service
//!
//! Business logic for the LinkedIn insights service: page sync from the
//! source API, cached reads of pages, posts and people, and AI summaries.
//!
//! Every service is a shaku component behind a trait, so the REST layer
//! only sees `Arc<dyn PageService>` and friends.

pub mod ai;
pub mod cache;
pub mod dto;
pub mod insight_service;
pub mod metrics;
pub mod page_service;
pub mod post_service;
pub mod source;
pub mod sync_service;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::*;
pub use dto::*;
pub use insight_service::*;
pub use page_service::*;
pub use post_service::*;
pub use sync_service::*;
