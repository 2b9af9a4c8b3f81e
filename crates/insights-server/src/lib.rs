//! # Insights Server Library
//!
//! Dependency injection wiring and startup helpers for the LinkedIn Insights
//! server binary.

pub mod di;
pub mod startup;
