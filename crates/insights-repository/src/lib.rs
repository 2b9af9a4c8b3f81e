//! # Insights Repository
//!
//! MySQL persistence for pages, posts, comments and employees.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn PageRepository>    (repository interface)
//! MySqlPageRepository             (SQLx implementation)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```
//!
//! Every write is an upsert keyed on the row's external identifier, so a
//! repeated sync never duplicates data. Deleting a page cascades to its
//! posts, comments and employees through foreign keys.

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
