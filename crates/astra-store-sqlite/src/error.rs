//! Error type for `astra-store-sqlite`.
//!
//! Display strings double as the user-facing messages shown next to forms,
//! so they are phrased for people, not for logs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] astra_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("corrupt row: {0}")]
  CorruptRow(String),

  #[error("unable to validate email address: invalid format")]
  InvalidEmail,

  #[error("password is required")]
  EmptyPassword,

  #[error("session lifetime {0} is out of range")]
  SessionExpiryOutOfRange(chrono::Duration),

  #[error("user already registered")]
  EmailTaken,

  #[error("invalid login credentials")]
  InvalidCredentials,

  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error("user not found: {0}")]
  UserNotFound(uuid::Uuid),

  #[error("a profile already exists for user {0}")]
  ProfileExists(uuid::Uuid),

  #[error("profile not found: {0}")]
  ProfileNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
