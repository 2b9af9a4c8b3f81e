//! REST API controllers.

pub mod ai_controller;
pub mod health_controller;
pub mod page_controller;
pub mod post_controller;

pub use health_controller::*;
