//! JSON API for Astra.
//!
//! Exposes an axum [`Router`] backed by any [`astra_core::model::ChatModel`].
//! Sessions, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", astra_api::api_router(model.clone()))
//! ```

pub mod chat;
pub mod error;
pub mod relay;

use std::sync::Arc;

use astra_core::model::ChatModel;
use axum::{Router, routing::post};

pub use error::ApiError;
pub use relay::{RelayOutcome, relay};

/// Build the API router for `model`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<M>(model: Arc<M>) -> Router<()>
where
  M: ChatModel + 'static,
{
  Router::new()
    .route("/chat", post(chat::handler::<M>))
    .with_state(model)
}
