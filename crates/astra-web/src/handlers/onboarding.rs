//! `GET /onboarding` and `POST /onboarding`: a new child introduces
//! themselves.

use astra_core::{
  gateway::Backend,
  model::ChatModel,
  navigation::Page,
  profile::{ONBOARDING_AGES, ProfileUpdate},
};
use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  response::Response,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  AppState,
  access::{see_other, visit},
  error::Error,
  session::SessionToken,
};

/// `interests` is the raw comma-separated text field. `age` is whatever the
/// select sent, a number or numeric text.
#[derive(Debug, Default, Deserialize)]
pub struct OnboardingForm {
  #[serde(default)]
  pub name:      String,
  #[serde(default)]
  pub age:       Option<Value>,
  #[serde(default)]
  pub interests: String,
}

#[derive(Debug, Serialize)]
pub struct OnboardingView {
  pub page:           Page,
  pub title:          &'static str,
  pub description:    &'static str,
  pub ages:           Vec<u8>,
  pub interests_hint: &'static str,
}

pub async fn show<B, M>(
  State(state): State<AppState<B, M>>,
  token: SessionToken,
) -> Result<Json<OnboardingView>, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  visit(&state.gateway, token.as_deref(), Page::Onboarding).await?;

  Ok(Json(OnboardingView {
    page:           Page::Onboarding,
    title:          "Let's Get to Know You!",
    description:    "Tell Astra a bit about yourself so she can help you better",
    ages:           ONBOARDING_AGES.collect(),
    interests_hint: "Separate multiple interests with commas",
  }))
}

pub async fn submit<B, M>(
  State(state): State<AppState<B, M>>,
  token: SessionToken,
  form: Result<Json<OnboardingForm>, JsonRejection>,
) -> Result<Response, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  let (user, _) = visit(&state.gateway, token.as_deref(), Page::Onboarding)
    .await?
    .signed_in()?;

  let Json(form) =
    form.map_err(|e| Error::unreadable_form(Page::Onboarding, None, e))?;
  let age = parse_age(form.age.as_ref())?;
  let update = ProfileUpdate::onboarding(&form.name, age, &form.interests)
    .map_err(|e| Error::form(Page::Onboarding, e))?;

  state
    .gateway
    .update_profile(user.id, update)
    .await
    .map_err(|e| Error::form(Page::Onboarding, e))?;

  tracing::info!(user = %user.id, "onboarding complete");
  Ok(see_other(Page::Dashboard.path()))
}

/// Read the submitted age; the allowed range is checked by
/// [`ProfileUpdate::onboarding`].
fn parse_age(age: Option<&Value>) -> Result<i64, Error> {
  let invalid = |message: &str| Error::Form {
    page:    Page::Onboarding,
    mode:    None,
    message: message.to_string(),
  };
  let not_whole = || invalid("age must be a whole number");

  match age {
    None | Some(Value::Null) => Err(invalid("age is required")),
    Some(Value::String(s)) if s.trim().is_empty() => Err(invalid("age is required")),
    Some(Value::String(s)) => s.trim().parse().map_err(|_| not_whole()),
    Some(Value::Number(n)) => n.as_i64().ok_or_else(not_whole),
    Some(_) => Err(not_whole()),
  }
}
