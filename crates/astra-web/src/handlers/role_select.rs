//! `GET /role-select` and `POST /role-select`: pick child or parent.
//!
//! Only reachable by a signed-in user who has no profile yet; the chosen
//! role is fixed from then on.

use astra_core::{
  gateway::Backend,
  model::ChatModel,
  navigation::{Page, after_role_select},
  profile::{NewProfile, Role},
};
use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  response::Response,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  access::{see_other, visit},
  error::Error,
  session::SessionToken,
};

#[derive(Debug, Default, Deserialize)]
pub struct RoleForm {
  #[serde(default)]
  pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RoleChoice {
  pub role:  Role,
  pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RoleSelectView {
  pub page:        Page,
  pub title:       &'static str,
  pub description: &'static str,
  pub choices:     [RoleChoice; 2],
}

pub async fn show<B, M>(
  State(state): State<AppState<B, M>>,
  token: SessionToken,
) -> Result<Json<RoleSelectView>, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  visit(&state.gateway, token.as_deref(), Page::RoleSelect).await?;

  Ok(Json(RoleSelectView {
    page:        Page::RoleSelect,
    title:       "Who Are You?",
    description: "Choose your role to get started with Astra",
    choices:     [
      RoleChoice { role: Role::Child, label: "I'm a kid" },
      RoleChoice { role: Role::Parent, label: "I'm a parent" },
    ],
  }))
}

pub async fn submit<B, M>(
  State(state): State<AppState<B, M>>,
  token: SessionToken,
  form: Result<Json<RoleForm>, JsonRejection>,
) -> Result<Response, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  let (user, _) = visit(&state.gateway, token.as_deref(), Page::RoleSelect)
    .await?
    .signed_in()?;

  let Json(form) =
    form.map_err(|e| Error::unreadable_form(Page::RoleSelect, None, e))?;

  let role = Role::parse(form.role.trim())
    .map_err(|e| Error::form(Page::RoleSelect, e))?;

  state
    .gateway
    .create_profile(NewProfile { id: user.id, email: user.email, role })
    .await
    .map_err(|e| Error::form(Page::RoleSelect, e))?;

  tracing::info!(user = %user.id, %role, "profile created");
  Ok(see_other(after_role_select(role).path()))
}
