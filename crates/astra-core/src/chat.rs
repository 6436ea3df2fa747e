//! Chat messages, the client-side conversation, and the relay wire types.
//!
//! Messages are never persisted: a [`Conversation`] lives only as long as the
//! chat screen that owns it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::persona::{FALLBACK_REPLY, UNCLEAR_REPLY, welcome_message};

// ─── Wire types ──────────────────────────────────────────────────────────────

/// Body of `POST /api/chat`.
///
/// `message` is optional at the type level so a missing field can be told
/// apart from a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
  #[serde(default)]
  pub message:    Option<String>,
  #[serde(
    default,
    rename = "childName",
    skip_serializing_if = "Option::is_none"
  )]
  pub child_name: Option<String>,
}

/// Successful response of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
  pub reply: String,
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
  User,
  Astra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id:        Uuid,
  pub text:      String,
  pub sender:    Sender,
  pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
  fn new(text: impl Into<String>, sender: Sender) -> Self {
    Self {
      id: Uuid::new_v4(),
      text: text.into(),
      sender,
      timestamp: Utc::now(),
    }
  }
}

// ─── Conversation ────────────────────────────────────────────────────────────

/// The in-memory message list of one chat screen.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
  messages: Vec<ChatMessage>,
}

impl Conversation {
  /// Start a conversation with Astra's greeting for `child_name`.
  pub fn welcome(child_name: &str) -> Self {
    Self {
      messages: vec![ChatMessage::new(
        welcome_message(child_name),
        Sender::Astra,
      )],
    }
  }

  /// Record what the child typed. Blank input is ignored and yields `None`.
  pub fn push_user(&mut self, text: &str) -> Option<&ChatMessage> {
    let text = text.trim();
    if text.is_empty() {
      return None;
    }
    Some(self.push(ChatMessage::new(text, Sender::User)))
  }

  /// Record Astra's answer; an absent or blank reply becomes
  /// [`UNCLEAR_REPLY`].
  pub fn push_reply(&mut self, reply: Option<String>) -> &ChatMessage {
    let text = reply
      .filter(|r| !r.trim().is_empty())
      .unwrap_or_else(|| UNCLEAR_REPLY.to_owned());
    self.push(ChatMessage::new(text, Sender::Astra))
  }

  /// Record that the relay could not be reached at all.
  pub fn push_failure(&mut self) -> &ChatMessage {
    self.push(ChatMessage::new(FALLBACK_REPLY, Sender::Astra))
  }

  fn push(&mut self, message: ChatMessage) -> &ChatMessage {
    let idx = self.messages.len();
    self.messages.push(message);
    &self.messages[idx]
  }

  pub fn messages(&self) -> &[ChatMessage] { &self.messages }

  pub fn into_messages(self) -> Vec<ChatMessage> { self.messages }
}
