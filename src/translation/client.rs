use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::TranslateConfig;

/// OpenRouter chat-completions URL.
pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

// Attribution headers OpenRouter uses to identify the calling app.
pub const HTTP_REFERER: &str = "https://github.com/book2ru";
pub const X_TITLE: &str = "book2ru CLI";
pub const USER_AGENT: &str = concat!("book2ru/", env!("CARGO_PKG_VERSION"));

const TEMPERATURE: f64 = 0.1;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// One chat-completion exchange with the remote model.
///
/// Implementations make exactly one attempt; retrying is the caller's job.
#[allow(async_fn_in_trait)]
pub trait CompletionApi {
    /// Sends `user_message` as the only message and returns the first
    /// choice's content verbatim.
    async fn complete(&self, model: &str, user_message: &str) -> Result<String>;
}

/// [`CompletionApi`] over HTTP against an OpenRouter-compatible endpoint.
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn from_config(config: &TranslateConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )
    }
}

impl CompletionApi for OpenRouterClient {
    async fn complete(&self, model: &str, user_message: &str) -> Result<String> {
        let chat_request = ChatCompletionRequest {
            model,
            messages: vec![Message {
                role: "user",
                content: user_message,
            }],
            temperature: TEMPERATURE,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", HTTP_REFERER)
            .header("X-Title", X_TITLE)
            .json(&chat_request)
            .send()
            .await
            .with_context(|| format!("Failed to connect to API endpoint: {}", self.endpoint))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            bail!("API request failed with status {status}: {body}");
        }

        let body = response
            .text()
            .await
            .context("Failed to read API response body")?;

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).context("Failed to decode API response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| anyhow!("No choices returned from API"))
    }
}
