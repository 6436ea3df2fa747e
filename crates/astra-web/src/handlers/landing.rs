//! `GET /`: the public landing page. Signed-in visitors are sent home.

use astra_core::{gateway::Backend, model::ChatModel, navigation::Page};
use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
  AppState, access::visit, error::Error, handlers::Link, session::SessionToken,
};

#[derive(Debug, Serialize)]
pub struct LandingView {
  pub page:     Page,
  pub title:    &'static str,
  pub subtitle: &'static str,
  pub links:    [Link; 2],
}

pub async fn show<B, M>(
  State(state): State<AppState<B, M>>,
  token: SessionToken,
) -> Result<Json<LandingView>, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  visit(&state.gateway, token.as_deref(), Page::Landing).await?;

  Ok(Json(LandingView {
    page:     Page::Landing,
    title:    "Meet Astra",
    subtitle: "Your friendly AI mentor is here to help you grow and learn new skills!",
    links:    [
      Link::get("Get Started", "/auth"),
      Link::get("I Already Have an Account", "/auth?mode=signin"),
    ],
  }))
}
