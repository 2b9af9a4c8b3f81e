//! # Insights Config
//!
//! Layered configuration for the LinkedIn insights service: TOML files,
//! a `.env` file and `INSIGHTS__*` environment variables, validated on load.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
