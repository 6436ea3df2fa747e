//! Per-request access check shared by every page controller.

use astra_core::{
  gateway::{Backend, Gateway},
  navigation::{AccessState, Page, resolve_access_state},
  profile::Profile,
  user::User,
};
use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::Error;

/// Who is looking at a page, as loaded for this request.
#[derive(Debug, Clone)]
pub struct Visitor {
  pub user:    Option<User>,
  pub profile: Option<Profile>,
}

impl Visitor {
  /// The signed-in user. Only public pages admit visitors without one.
  pub fn signed_in(self) -> Result<(User, Option<Profile>), Error> {
    match self.user {
      Some(user) => Ok((user, self.profile)),
      None => Err(Error::Redirect(Page::Auth)),
    }
  }

  /// The signed-in user together with their profile.
  pub fn with_profile(self) -> Result<(User, Profile), Error> {
    match self.signed_in()? {
      (user, Some(profile)) => Ok((user, profile)),
      (_, None) => Err(Error::Redirect(Page::RoleSelect)),
    }
  }
}

/// Load the visitor behind `token` and decide whether `page` may render.
///
/// Fails with [`Error::Redirect`] when the visitor belongs elsewhere and
/// with [`Error::Configuration`] when there is no backend at all.
pub async fn visit<B: Backend>(
  gateway: &Gateway<B>,
  token: Option<&str>,
  page: Page,
) -> Result<Visitor, Error> {
  if !gateway.is_initialized() {
    return Err(Error::Configuration);
  }

  let user = match token {
    Some(token) => gateway.current_user(token).await?,
    None => None,
  };
  let profile = match &user {
    Some(user) => gateway.get_profile(user.id).await?,
    None => None,
  };

  match resolve_access_state(page, user.as_ref(), profile.as_ref()) {
    AccessState::Proceed => Ok(Visitor { user, profile }),
    AccessState::RedirectTo(target) => {
      tracing::debug!(from = page.path(), to = target.path(), "redirecting visitor");
      Err(Error::Redirect(target))
    }
  }
}

/// `303 See Other` to `path`, with the target repeated in the body.
pub fn see_other(path: &str) -> Response {
  (
    StatusCode::SEE_OTHER,
    [(header::LOCATION, path.to_string())],
    Json(json!({ "redirect": path })),
  )
    .into_response()
}
