//! `GET /parent`: placeholder for the parent dashboard.

use astra_core::{gateway::Backend, model::ChatModel, navigation::Page};
use axum::{Json, extract::State};
use serde::Serialize;

use crate::{AppState, access::visit, error::Error, session::SessionToken};

#[derive(Debug, Serialize)]
pub struct ParentView {
  pub page:     Page,
  pub title:    &'static str,
  pub status:   &'static str,
  pub heading:  &'static str,
  pub upcoming: [&'static str; 4],
}

pub async fn show<B, M>(
  State(state): State<AppState<B, M>>,
  token: SessionToken,
) -> Result<Json<ParentView>, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  visit(&state.gateway, token.as_deref(), Page::Parent).await?;

  Ok(Json(ParentView {
    page:     Page::Parent,
    title:    "Parent Dashboard",
    status:   "Coming Soon",
    heading:  "We're Building Something Amazing!",
    upcoming: [
      "Monitor your child's learning progress",
      "View conversation insights with Astra",
      "Set learning goals and preferences",
      "Access detailed skill development reports",
    ],
  }))
}
