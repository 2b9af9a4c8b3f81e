//! OpenAI-compatible chat-completion client.

use super::SummaryGenerator;
use async_trait::async_trait;
use insights_config::AiConfig;
use insights_core::{InsightsError, InsightsResult};
use insights_resilience::with_timeout;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use shaku::Component;
use tracing::{debug, info};

const SERVICE: &str = "openai";

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// Chat-completion client requesting `json_object` responses.
#[derive(Component)]
#[shaku(interface = SummaryGenerator)]
pub struct OpenAiClient {
    http: Client,
    config: AiConfig,
}

impl OpenAiClient {
    /// Creates a new client.
    pub fn new(config: AiConfig) -> InsightsResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| InsightsError::Internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn send(&self, system: &str, prompt: &str) -> InsightsResult<JsonValue> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt},
            ],
            "response_format": {"type": "json_object"},
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InsightsError::external(SERVICE, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(InsightsError::external(
                SERVICE,
                format!("chat completion returned {status}: {detail}"),
            ));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| InsightsError::external(SERVICE, format!("invalid completion body: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| InsightsError::external(SERVICE, "completion has no content"))?;

        serde_json::from_str(&content)
            .map_err(|e| InsightsError::external(SERVICE, format!("completion is not JSON: {e}")))
    }
}

impl From<OpenAiClient> for OpenAiClientParameters {
    fn from(client: OpenAiClient) -> Self {
        Self {
            http: client.http,
            config: client.config,
        }
    }
}

#[async_trait]
impl SummaryGenerator for OpenAiClient {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn complete_json(&self, system: &str, prompt: &str) -> InsightsResult<JsonValue> {
        if !self.is_configured() {
            return Err(InsightsError::Configuration(
                "AI API key is not configured".to_string(),
            ));
        }

        debug!("Requesting chat completion from model {}", self.config.model);
        let answer = with_timeout(self.config.timeout(), "chat completion", self.send(system, prompt)).await?;
        info!("Chat completion received from model {}", self.config.model);
        Ok(answer)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}
