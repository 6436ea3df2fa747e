//! Session token extractor and cookie helpers.
//!
//! Browsers carry the token in the `astra_session` cookie; other clients
//! may send `Authorization: Bearer <token>` instead.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use tower_cookies::{Cookie, Cookies, cookie::SameSite};

pub const SESSION_COOKIE: &str = "astra_session";

/// The access token presented with a request, if any. Whether it still
/// names a live session is for the gateway to decide.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
  pub fn as_deref(&self) -> Option<&str> { self.0.as_deref() }
}

/// Token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
}

/// A bearer header wins over the cookie.
impl<S: Send + Sync> FromRequestParts<S> for SessionToken {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    if let Some(token) = bearer_token(&parts.headers) {
      return Ok(SessionToken(Some(token)));
    }

    let from_cookie = Cookies::from_request_parts(parts, state)
      .await
      .ok()
      .and_then(|cookies| cookies.get(SESSION_COOKIE).map(|c| c.value().to_string()))
      .filter(|v| !v.is_empty());
    Ok(SessionToken(from_cookie))
  }
}

/// The cookie that carries `token`.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
  Cookie::build((SESSION_COOKIE, token))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(secure)
    .build()
}

/// A cookie that makes the browser drop the session.
pub fn cleared_cookie(secure: bool) -> Cookie<'static> {
  let mut cookie = session_cookie(String::new(), secure);
  cookie.make_removal();
  cookie
}
