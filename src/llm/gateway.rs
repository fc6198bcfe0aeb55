use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{LlmConfig, ANTHROPIC_VERSION};
use crate::llm::fallback::summarize;

pub const NO_RESPONSE: &str = "I couldn't generate a response.";

/// Client for the Anthropic Messages API that never fails: any problem
/// degrades to the local summary of the prompt.
pub struct LlmGateway {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmGateway {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Answer the prompt in `context`. Single attempt, no retry.
    pub async fn answer(&self, context: &str) -> String {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::warn!("LLM API key not configured, using fallback response");
            return summarize(context);
        };

        match self.call_messages_api(api_key, context).await {
            Ok(Some(text)) => text,
            Ok(None) => NO_RESPONSE.to_string(),
            Err(e) => {
                tracing::error!("LLM call failed, using fallback response: {e:#}");
                summarize(context)
            }
        }
    }

    /// `Ok(None)` when the API answered but without a text block.
    async fn call_messages_api(&self, api_key: &str, context: &str) -> Result<Option<String>> {
        let req = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user".to_string(),
                content: format!("You are a helpful FAQ assistant. Please help with: {context}"),
            }],
        };

        let resp = self
            .client
            .post(&self.config.api_url)
            .timeout(Duration::from_secs(self.config.timeout_secs.max(1)))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&req)
            .send()
            .await
            .context("Failed to reach LLM API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("LLM API returned {status}: {body}");
        }

        let body: MessagesResponse = resp
            .json()
            .await
            .context("Failed to parse LLM API response")?;

        Ok(first_text(body))
    }
}

fn first_text(body: MessagesResponse) -> Option<String> {
    body.content.into_iter().next().and_then(|block| block.text)
}

// ─── Request/Response types ────────────────────────────

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}
