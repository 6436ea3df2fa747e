//! The `ChatModel` trait: the seam to the hosted language model.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// A single stateless completion: one system instruction, one user message.
/// No earlier turns are ever included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
  pub system:      String,
  pub user:        String,
  pub max_tokens:  u32,
  pub temperature: f32,
}

/// Abstraction over a hosted chat-completion model.
pub trait ChatModel: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run one completion. `Ok(None)` means the model answered without any
  /// text content.
  fn complete<'a>(
    &'a self,
    request: &'a CompletionRequest,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;
}
