//! # Insights Core
//!
//! Core types shared by every layer of the LinkedIn insights service: the
//! unified error, pagination, typed ids, stored entities and the tracing
//! bootstrap.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
