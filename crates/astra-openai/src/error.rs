//! Error type for `astra-openai`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no API key configured")]
  MissingApiKey,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("model service returned {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
