// External dependencies
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

// Internal dependencies
use crate::config::Settings;

/// One text-in/text-out completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Anything able to turn a system and user instruction into a single completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

// ============================================================================
// Chat Completions API Structures
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct OpenAiClient {
    client: Client,
    base_url: Url,
    model_name: String,
    api_key: String,
}

// ============================================================================
// Client Implementation
// ============================================================================

impl OpenAiClient {
    /// Creates a client from settings, reading the API key from the configured
    /// environment variable.
    pub fn new(settings: &Settings) -> Result<Self> {
        let key_var = &settings.model.api_key_env;
        let api_key = std::env::var(key_var)
            .with_context(|| format!("Environment variable {key_var} is not set"))?;

        Self::with_api_key(settings, api_key)
    }

    pub fn with_api_key(settings: &Settings, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.model.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&settings.model.base_url)
            .with_context(|| format!("Invalid model base URL: {}", settings.model.base_url))?;

        Ok(Self {
            client,
            base_url,
            model_name: settings.model.model.clone(),
            api_key: api_key.into(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        // Keep any path prefix of the base URL (e.g. a proxy mount point)
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path_with_slash = format!("{}/", base.path());
            base.set_path(&path_with_slash);
        }
        base.join(path)
            .with_context(|| format!("Failed to build {path} URL"))
    }

    /// Verifies the API is reachable and the key is accepted
    pub async fn verify_connection(&self) -> Result<()> {
        debug!("Verifying completion API connection");

        let url = self.endpoint("v1/models")?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to connect to completion API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Completion API returned {status}: {}",
                provider_message(&body)
            ));
        }

        info!("Completion API connection verified");
        Ok(())
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = self.endpoint("v1/chat/completions")?;

        let body = ChatCompletionRequest {
            model: &self.model_name,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            "Sending completion request to {}, model {}, prompt length: {}",
            url,
            self.model_name,
            request.system.len() + request.user.len()
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send completion request")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Completion request failed ({status}): {}",
                provider_message(&text)
            ));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Completion response contained no choices"))?;

        if choice.finish_reason.as_deref() == Some("length") {
            warn!("Completion was truncated at max_tokens");
        }

        let content = choice.message.content.unwrap_or_default();
        debug!("Completion length: {}", content.len());
        Ok(content)
    }
}

/// Pulls `error.message` out of a provider error body, falling back to the raw text.
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "no error details".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
