//! `GET /auth` and `POST /auth`: sign up or sign in.
//!
//! The sub-mode travels in `?mode=`; anything but `signin` means sign-up.
//! A successful submission sets the session cookie and redirects to the
//! page the account belongs on.

use astra_core::{
  gateway::Backend,
  model::ChatModel,
  navigation::{AuthMode, Page, home_page},
  user::Session,
};
use axum::{
  Json,
  extract::{Query, State, rejection::JsonRejection},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_cookies::Cookies;

use crate::{
  AppState, error::Error, handlers::Link, session::session_cookie,
};

#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
  pub mode: Option<String>,
}

impl AuthQuery {
  fn mode(&self) -> AuthMode { AuthMode::from_query(self.mode.as_deref()) }
}

#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthView {
  pub page:        Page,
  pub mode:        AuthMode,
  pub title:       &'static str,
  pub description: &'static str,
  pub submit:      &'static str,
  pub toggle:      Link,
}

impl AuthView {
  fn new(mode: AuthMode) -> Self {
    let (title, description, submit, toggle) = match mode {
      AuthMode::Signup => (
        "Join Astra!",
        "Create your account to start your learning journey",
        "Create Account",
        "Already have an account? Sign in",
      ),
      AuthMode::Signin => (
        "Welcome Back!",
        "Sign in to continue your adventure with Astra",
        "Sign In",
        "Don't have an account? Sign up",
      ),
    };
    Self {
      page: Page::Auth,
      mode,
      title,
      description,
      submit,
      toggle: Link::get(toggle, mode.toggled().path()),
    }
  }
}

/// The auth form always renders, signed in or not.
pub async fn show<B, M>(
  State(state): State<AppState<B, M>>,
  Query(query): Query<AuthQuery>,
) -> Result<Json<AuthView>, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  if !state.gateway.is_initialized() {
    return Err(Error::Configuration);
  }
  Ok(Json(AuthView::new(query.mode())))
}

pub async fn submit<B, M>(
  State(state): State<AppState<B, M>>,
  cookies: Cookies,
  Query(query): Query<AuthQuery>,
  form: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  let mode = query.mode();
  let gateway = &state.gateway;
  if !gateway.is_initialized() {
    return Err(Error::Configuration);
  }
  let Json(form) =
    form.map_err(|e| Error::unreadable_form(Page::Auth, Some(mode), e))?;

  let (session, target) = match mode {
    AuthMode::Signup => {
      let session = gateway
        .sign_up(&form.email, &form.password)
        .await
        .map_err(|e| Error::auth_form(mode, e))?;
      tracing::info!(user = %session.user.id, "signed up");
      (session, Page::RoleSelect)
    }
    AuthMode::Signin => {
      let session = gateway
        .sign_in(&form.email, &form.password)
        .await
        .map_err(|e| Error::auth_form(mode, e))?;
      let profile = gateway.get_profile(session.user.id).await?;
      tracing::info!(user = %session.user.id, "signed in");
      (session, home_page(profile.as_ref()))
    }
  };

  cookies.add(session_cookie(
    session.access_token.clone(),
    state.config.secure_cookies,
  ));
  Ok(signed_in_response(session, target))
}

/// Like [`see_other`](crate::access::see_other), but also hands the token to
/// clients that do not keep cookies.
fn signed_in_response(session: Session, target: Page) -> Response {
  (
    StatusCode::SEE_OTHER,
    [(header::LOCATION, target.path())],
    Json(json!({
      "redirect":     target.path(),
      "access_token": session.access_token,
    })),
  )
    .into_response()
}
