//! Gateway client
//!
//! Posts `{ prompt, model, system }` to the text-generation endpoint and
//! returns the generated text. Input checks (empty prompt, missing
//! credential) happen before any network I/O. One round trip per call; the
//! caller decides whether anything is retried.

use quill_core::{Error, Result};
use quill_store::SeedSource;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::prompts::{self, QuickAction, DEFAULT_SYSTEM};

/// Configuration for the AI gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Generation endpoint URL.
    pub endpoint: String,
    /// Provider credential. Absence is a configuration failure surfaced on
    /// the first call, not at construction.
    pub api_key: Option<String>,
    /// Model identifier forwarded to the provider.
    pub model: String,
}

impl GatewayConfig {
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";

    /// Read configuration from `QUILL_AI_ENDPOINT`, `QUILL_AI_API_KEY`, and
    /// `QUILL_AI_MODEL`.
    pub fn from_env() -> Self {
        GatewayConfig {
            endpoint: std::env::var("QUILL_AI_ENDPOINT")
                .unwrap_or_else(|_| "https://api.openai.com/v1/responses".to_string()),
            api_key: std::env::var("QUILL_AI_API_KEY").ok(),
            model: std::env::var("QUILL_AI_MODEL")
                .unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string()),
        }
    }
}

/// Success body from the endpoint.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    content: String,
}

/// Failure body from the endpoint.
#[derive(Debug, Deserialize)]
struct GenerateError {
    error: String,
}

/// Single-call adapter for the hosted text-generation endpoint.
pub struct GatewayClient {
    agent: ureq::Agent,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        GatewayClient {
            agent: ureq::AgentBuilder::new().build(),
            config,
        }
    }

    /// Generate text for `prompt`, with `system` overriding the default
    /// semantic-HTML instruction.
    ///
    /// Fails with `EmptyPrompt` or `MissingCredential` before any network
    /// call. Endpoint failures surface the endpoint's error message when the
    /// body is parseable, a generic message otherwise.
    pub fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(Error::EmptyPrompt);
        }
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::MissingCredential)?;

        let system = system.unwrap_or(DEFAULT_SYSTEM.as_str());
        debug!(model = %self.config.model, prompt_len = prompt.len(), "requesting generation");

        let response = self
            .agent
            .post(&self.config.endpoint)
            .set("Authorization", &format!("Bearer {api_key}"))
            .send_json(serde_json::json!({
                "prompt": prompt,
                "model": self.config.model,
                "system": system,
            }));

        match response {
            Ok(response) => {
                let body: GenerateResponse = response
                    .into_json()
                    .map_err(|e| Error::Provider(format!("malformed response: {e}")))?;
                Ok(body.content)
            }
            Err(ureq::Error::Status(status, response)) => {
                let message = response
                    .into_json::<GenerateError>()
                    .map(|body| body.error)
                    .unwrap_or_else(|_| format!("endpoint returned status {status}"));
                warn!(status, %message, "generation request rejected");
                Err(Error::Provider(message))
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!(error = %transport, "generation request failed in transport");
                Err(Error::Provider(transport.to_string()))
            }
        }
    }

    /// Run an editor quick action over `text` (selection or document text,
    /// per the action).
    pub fn quick_action(&self, action: QuickAction, text: &str) -> Result<String> {
        let prompt = action.prompt(text)?;
        self.generate(&prompt, None)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

impl SeedSource for GatewayClient {
    /// Seed-content generator: one topic drawn uniformly at random from the
    /// fixed list, ≤150 words requested.
    fn generate_seed_post(&self) -> Result<(String, String)> {
        let topic = prompts::BLOG_TOPICS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(prompts::BLOG_TOPICS[0]);
        let content = self.generate(&prompts::seed_prompt(topic), None)?;
        Ok((topic.to_string(), content))
    }
}
