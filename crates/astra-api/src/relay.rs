//! The model relay and its degradation policy.
//!
//! A relay call never fails from the caller's point of view: a model error
//! becomes [`FALLBACK_REPLY`] and an empty answer becomes [`UNCLEAR_REPLY`].
//! Each call is stateless and is attempted exactly once.

use astra_core::{
  model::ChatModel,
  persona::{FALLBACK_REPLY, UNCLEAR_REPLY, completion_request},
};

/// What a relay call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
  /// The model's text, verbatim.
  Answered(String),
  /// The model answered without any text.
  Unclear,
  /// The model call failed, timeouts included.
  ModelFailed,
}

impl RelayOutcome {
  /// The reply shown to the child.
  pub fn into_reply(self) -> String {
    match self {
      Self::Answered(text) => text,
      Self::Unclear => UNCLEAR_REPLY.to_owned(),
      Self::ModelFailed => FALLBACK_REPLY.to_owned(),
    }
  }

  pub fn is_degraded(&self) -> bool { !matches!(self, Self::Answered(_)) }
}

/// Send `message` to the model under the mentor persona.
pub async fn relay<M: ChatModel>(
  model: &M,
  message: &str,
  child_name: Option<&str>,
) -> RelayOutcome {
  let request = completion_request(message, child_name);
  match model.complete(&request).await {
    // A whitespace-only answer is treated the same as no answer.
    Ok(Some(text)) if !text.trim().is_empty() => RelayOutcome::Answered(text),
    Ok(_) => RelayOutcome::Unclear,
    Err(e) => {
      tracing::error!(error = %e, "model call failed; sending fallback reply");
      RelayOutcome::ModelFailed
    }
  }
}
