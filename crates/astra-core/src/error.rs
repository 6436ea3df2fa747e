//! Error types for `astra-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The backend client could not be constructed; no call was attempted.
  #[error("backend client not initialized")]
  NotInitialized,

  /// The identity/data provider rejected the call. The display string is the
  /// provider's own human-readable message.
  #[error("{0}")]
  Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("{0}")]
  InvalidUpdate(String),

  #[error("unknown role: {0:?}")]
  UnknownRole(String),
}

impl Error {
  pub fn provider<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Provider(Box::new(e))
  }

  pub fn is_not_initialized(&self) -> bool {
    matches!(self, Self::NotInitialized)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
