//! Page layer for Astra.
//!
//! Exposes an axum [`Router`] with one controller per screen, backed by a
//! [`Gateway`] over any [`Backend`] and a [`ChatModel`] for the relay
//! endpoint mounted under `/api`.
//!
//! Every controller answers with JSON: a view object tagged with its
//! `page`, or a `303 See Other` naming where the visitor belongs instead.

pub mod access;
pub mod error;
pub mod handlers;
pub mod session;

#[cfg(test)]
mod tests;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use astra_core::{
  gateway::{Backend, Gateway},
  model::ChatModel,
  persona::DEFAULT_MODEL,
};
use astra_openai::DEFAULT_BASE_URL;
use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use handlers::{auth, chat, dashboard, landing, onboarding, parent, role_select, sign_out};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ASTRA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  /// SQLite file backing identities and profiles. Without one the server
  /// still starts, but every page reports a configuration error.
  #[serde(default)]
  pub store_path:         Option<PathBuf>,
  #[serde(default = "default_session_ttl_hours")]
  pub session_ttl_hours:  i64,
  /// Mark the session cookie `Secure`. Enable behind TLS.
  #[serde(default)]
  pub secure_cookies:     bool,
  #[serde(default)]
  pub openai_api_key:     Option<String>,
  #[serde(default = "default_openai_base_url")]
  pub openai_base_url:    String,
  #[serde(default = "default_model")]
  pub model:              String,
  #[serde(default = "default_model_timeout_secs")]
  pub model_timeout_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }
fn default_session_ttl_hours() -> i64 {
  astra_store_sqlite::DEFAULT_SESSION_TTL_HOURS
}
fn default_openai_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_model_timeout_secs() -> u64 { 60 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               default_host(),
      port:               default_port(),
      store_path:         None,
      session_ttl_hours:  default_session_ttl_hours(),
      secure_cookies:     false,
      openai_api_key:     None,
      openai_base_url:    default_openai_base_url(),
      model:              default_model(),
      model_timeout_secs: default_model_timeout_secs(),
    }
  }
}

/// Longest session lifetime the server accepts: ten years.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

impl ServerConfig {
  /// The session lifetime, or `None` unless `session_ttl_hours` lies in
  /// `1..=MAX_SESSION_TTL_HOURS`.
  pub fn session_ttl(&self) -> Option<chrono::Duration> {
    (1..=MAX_SESSION_TTL_HOURS)
      .contains(&self.session_ttl_hours)
      .then(|| chrono::Duration::hours(self.session_ttl_hours))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all page controllers.
pub struct AppState<B, M> {
  pub gateway: Gateway<B>,
  pub model:   Arc<M>,
  pub config:  Arc<ServerConfig>,
}

impl<B, M> Clone for AppState<B, M> {
  fn clone(&self) -> Self {
    Self {
      gateway: self.gateway.clone(),
      model:   self.model.clone(),
      config:  self.config.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: page controllers at the root, the relay
/// under `/api`.
pub fn router<B, M>(state: AppState<B, M>) -> Router
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  let api = astra_api::api_router(state.model.clone());

  Router::new()
    .route("/",            get(landing::show::<B, M>))
    .route("/auth",        get(auth::show::<B, M>).post(auth::submit::<B, M>))
    .route("/role-select", get(role_select::show::<B, M>).post(role_select::submit::<B, M>))
    .route("/onboarding",  get(onboarding::show::<B, M>).post(onboarding::submit::<B, M>))
    .route("/dashboard",   get(dashboard::show::<B, M>))
    .route("/chat",        get(chat::show::<B, M>))
    .route("/parent",      get(parent::show::<B, M>))
    .route("/sign-out",    post(sign_out::submit::<B, M>))
    .with_state(state)
    .nest("/api", api)
    .layer(CookieManagerLayer::new())
    .layer(TraceLayer::new_for_http())
}
