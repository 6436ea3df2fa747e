//! Error types and axum `IntoResponse` implementation.

use astra_core::navigation::{AuthMode, Page};
use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::access::see_other;

pub const CONFIGURATION_MESSAGE: &str =
  "Configuration error. Please check your environment variables.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load profile";

#[derive(Debug, Error)]
pub enum Error {
  /// The backend client was never constructed.
  #[error("configuration error")]
  Configuration,

  /// A page could not read the visitor's user or profile.
  #[error("failed to load profile: {0}")]
  LoadFailed(#[source] astra_core::Error),

  /// A form submission was rejected; re-render `page` with the message.
  #[error("{message}")]
  Form {
    page:    Page,
    mode:    Option<AuthMode>,
    message: String,
  },

  /// Not a failure: the visitor belongs on another page.
  #[error("redirect to {}", .0.path())]
  Redirect(Page),
}

impl Error {
  /// Inline error for a form on `page`. A missing backend is still reported
  /// as a configuration error.
  pub fn form(page: Page, e: astra_core::Error) -> Self {
    match e {
      astra_core::Error::NotInitialized => Self::Configuration,
      e => Self::Form { page, mode: None, message: e.to_string() },
    }
  }

  pub fn auth_form(mode: AuthMode, e: astra_core::Error) -> Self {
    match Self::form(Page::Auth, e) {
      Self::Form { page, message, .. } => {
        Self::Form { page, mode: Some(mode), message }
      }
      other => other,
    }
  }
}

impl Error {
  /// Inline error for a body that could not be read as the form on `page`.
  pub fn unreadable_form(page: Page, mode: Option<AuthMode>, rejection: JsonRejection) -> Self {
    Self::Form { page, mode, message: rejection.body_text() }
  }
}

impl From<astra_core::Error> for Error {
  fn from(e: astra_core::Error) -> Self {
    match e {
      astra_core::Error::NotInitialized => Self::Configuration,
      e => Self::LoadFailed(e),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Configuration => {
        tracing::error!("backend client not initialized");
        (
          StatusCode::SERVICE_UNAVAILABLE,
          Json(json!({
            "page":  "error",
            "error": CONFIGURATION_MESSAGE,
            "retry": true,
          })),
        )
          .into_response()
      }
      Error::LoadFailed(e) => {
        tracing::error!(error = %e, "error loading profile");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": LOAD_FAILED_MESSAGE })),
        )
          .into_response()
      }
      Error::Form { page, mode, message } => {
        let mut body = json!({ "page": page, "error": message });
        if let Some(mode) = mode {
          body["mode"] = json!(mode);
        }
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
      }
      Error::Redirect(page) => see_other(page.path()),
    }
  }
}
