//! `GET /chat`: opens a fresh conversation with the mentor.
//!
//! The conversation is not stored; clients keep it and post each message to
//! `/api/chat`.

use astra_core::{
  chat::{ChatMessage, Conversation},
  gateway::Backend,
  model::ChatModel,
  navigation::Page,
};
use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
  AppState, access::visit, error::Error, handlers::dashboard::DEFAULT_NAME,
  session::SessionToken,
};

#[derive(Debug, Serialize)]
pub struct ChatView {
  pub page:       Page,
  pub child_name: String,
  pub messages:   Vec<ChatMessage>,
  pub endpoint:   &'static str,
}

pub async fn show<B, M>(
  State(state): State<AppState<B, M>>,
  token: SessionToken,
) -> Result<Json<ChatView>, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  let (_, profile) = visit(&state.gateway, token.as_deref(), Page::Chat)
    .await?
    .with_profile()?;

  let child_name = profile.display_name().unwrap_or(DEFAULT_NAME).to_string();
  let conversation = Conversation::welcome(&child_name);

  Ok(Json(ChatView {
    page: Page::Chat,
    child_name,
    messages: conversation.into_messages(),
    endpoint: "/api/chat",
  }))
}
