//! # Insights REST
//!
//! REST API layer using Axum for the LinkedIn Insights service.
//! Provides endpoints for pages, posts, AI summaries, health checks and
//! Prometheus metrics.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
