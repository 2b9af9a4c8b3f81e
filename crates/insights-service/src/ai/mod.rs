//! Chat-completion backed page analysis.
//!
//! [`SummaryGenerator`] is the only call leaving the process. Everything
//! around it (context aggregation, prompt text, shaping the answer and the
//! fallback when the call fails) is plain data transformation in
//! [`analysis`].

pub mod analysis;
mod openai_client;

pub use openai_client::{OpenAiClient, OpenAiClientParameters};

use async_trait::async_trait;
use insights_core::{InsightsResult, Interface};
use serde_json::Value as JsonValue;

/// A chat-completion model answering in JSON.
#[async_trait]
pub trait SummaryGenerator: Interface + Send + Sync {
    /// Returns false when no credentials are configured; callers then skip
    /// the call and use their fallback.
    fn is_configured(&self) -> bool;

    /// Sends a system and a user message and parses the reply as JSON.
    async fn complete_json(&self, system: &str, prompt: &str) -> InsightsResult<JsonValue>;
}
