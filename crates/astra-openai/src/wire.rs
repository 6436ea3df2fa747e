//! Request and response bodies of `POST /chat/completions`.

use astra_core::model::CompletionRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
  pub model:       &'a str,
  pub messages:    [Message<'a>; 2],
  pub max_tokens:  u32,
  pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct Message<'a> {
  pub role:    &'static str,
  pub content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
  pub fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
    Self {
      model,
      messages: [
        Message { role: "system", content: &request.system },
        Message { role: "user", content: &request.user },
      ],
      max_tokens: request.max_tokens,
      temperature: request.temperature,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
  #[serde(default)]
  pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
  pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
  pub content: Option<String>,
}

impl ChatCompletionResponse {
  /// Text of the first choice, if the model produced any.
  pub fn into_text(self) -> Option<String> {
    self
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message)
      .and_then(|m| m.content)
  }
}
