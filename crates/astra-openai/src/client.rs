//! Async HTTP client for the chat-completions endpoint.

use std::time::Duration;

use astra_core::{
  model::{ChatModel, CompletionRequest},
  persona::DEFAULT_MODEL,
};
use reqwest::Client;

use crate::{
  Error, Result,
  wire::{ChatCompletionRequest, ChatCompletionResponse},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for the model service.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
  /// Read once at start-up. Without one every completion fails, which the
  /// relay turns into its fallback reply.
  pub api_key:  Option<String>,
  pub base_url: String,
  pub model:    String,
  pub timeout:  Duration,
}

impl Default for OpenAiConfig {
  fn default() -> Self {
    Self {
      api_key:  None,
      base_url: DEFAULT_BASE_URL.to_string(),
      model:    DEFAULT_MODEL.to_string(),
      timeout:  Duration::from_secs(60),
    }
  }
}

/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenAiClient {
  client: Client,
  config: OpenAiConfig,
}

impl OpenAiClient {
  pub fn new(config: OpenAiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

impl ChatModel for OpenAiClient {
  type Error = Error;

  async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
    let api_key = self.config.api_key.as_deref().ok_or(Error::MissingApiKey)?;
    let body = ChatCompletionRequest::new(&self.config.model, request);

    let resp = self
      .client
      .post(self.url())
      .bearer_auth(api_key)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status, body });
    }

    let parsed: ChatCompletionResponse = resp.json().await?;
    tracing::debug!(model = %self.config.model, "completion received");
    Ok(parsed.into_text())
  }
}
