//! Handler for `POST /chat`.
//!
//! | Status | Body | When |
//! |--------|------|------|
//! | `200` | `{"reply": "..."}` | any request carrying a message, even if the model failed |
//! | `400` | `{"error": "Message is required"}` | `message` missing, null or blank |
//! | `500` | `{"error": "Failed to process message"}` | body is not the expected JSON |

use std::sync::Arc;

use astra_core::{
  chat::{ChatReply, ChatRequest},
  model::ChatModel,
};
use axum::{Json, body::Bytes, extract::State};

use crate::{error::ApiError, relay::relay};

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const PROCESSING_FAILED: &str = "Failed to process message";

/// `POST /chat`: body: `{"message": "...", "childName": "..."}`
pub async fn handler<M>(
  State(model): State<Arc<M>>,
  body: Bytes,
) -> Result<Json<ChatReply>, ApiError>
where
  M: ChatModel + 'static,
{
  let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
    tracing::error!(error = %e, "unreadable chat request");
    ApiError::Internal(PROCESSING_FAILED.to_owned())
  })?;

  let message = request
    .message
    .as_deref()
    .filter(|m| !m.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest(MESSAGE_REQUIRED.to_owned()))?;

  let outcome = relay(model.as_ref(), message, request.child_name.as_deref()).await;
  if outcome.is_degraded() {
    tracing::warn!(?outcome, "chat reply degraded");
  }

  Ok(Json(ChatReply { reply: outcome.into_reply() }))
}
