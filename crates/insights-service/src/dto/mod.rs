//! Data Transfer Objects (DTOs).

mod employee_dto;
mod insight_dto;
mod page_dto;
mod post_dto;

pub use employee_dto::*;
pub use insight_dto::*;
pub use page_dto::*;
pub use post_dto::*;
