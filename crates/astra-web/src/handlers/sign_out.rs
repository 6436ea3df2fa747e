//! `POST /sign-out`: ends the session and returns to the landing page.

use astra_core::{gateway::Backend, model::ChatModel, navigation::Page};
use axum::{extract::State, response::Response};
use tower_cookies::Cookies;

use crate::{
  AppState, access::see_other, error::Error,
  session::{SessionToken, cleared_cookie},
};

pub async fn submit<B, M>(
  State(state): State<AppState<B, M>>,
  cookies: Cookies,
  token: SessionToken,
) -> Result<Response, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  if let Some(token) = token.as_deref() {
    match state.gateway.sign_out(token).await {
      Ok(()) => tracing::info!("signed out"),
      Err(e) if e.is_not_initialized() => return Err(Error::Configuration),
      // The cookie is cleared regardless; a stale server-side session
      // expires on its own.
      Err(e) => tracing::warn!(error = %e, "error signing out"),
    }
  }

  cookies.add(cleared_cookie(state.config.secure_cookies));
  Ok(see_other(Page::Landing.path()))
}
