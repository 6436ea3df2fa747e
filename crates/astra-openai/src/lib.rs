//! [`ChatModel`](astra_core::model::ChatModel) backed by the OpenAI
//! chat-completions API.
//!
//! One request per completion, no streaming, no retries. Any OpenAI-compatible
//! server can be targeted by pointing `base_url` at it.

mod client;
mod wire;

pub mod error;

pub use client::{DEFAULT_BASE_URL, OpenAiClient, OpenAiConfig};
pub use error::{Error, Result};
