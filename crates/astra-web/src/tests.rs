use std::sync::Arc;

use astra_core::{
  gateway::Gateway,
  model::{ChatModel, CompletionRequest},
  persona::welcome_message,
};
use astra_store_sqlite::SqliteStore;
use axum::{
  body::Body,
  http::{HeaderMap, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{
  AppState, ServerConfig,
  error::{CONFIGURATION_MESSAGE, LOAD_FAILED_MESSAGE},
  router,
};

/// Answers every message by quoting it back.
struct EchoModel;

impl ChatModel for EchoModel {
  type Error = std::io::Error;

  async fn complete(
    &self,
    request: &CompletionRequest,
  ) -> Result<Option<String>, std::io::Error> {
    Ok(Some(format!("You said: {}", request.user)))
  }
}

type TestState = AppState<SqliteStore, EchoModel>;

async fn make_state() -> TestState {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState {
    gateway: Gateway::new(Arc::new(store)),
    model:   Arc::new(EchoModel),
    config:  Arc::new(ServerConfig::default()),
  }
}

fn uninitialized_state() -> TestState {
  AppState {
    gateway: Gateway::uninitialized(),
    model:   Arc::new(EchoModel),
    config:  Arc::new(ServerConfig::default()),
  }
}

struct Reply {
  status:  StatusCode,
  headers: HeaderMap,
  body:    Value,
}

impl Reply {
  fn location(&self) -> &str {
    self
      .headers
      .get(header::LOCATION)
      .and_then(|v| v.to_str().ok())
      .unwrap_or("")
  }

  fn assert_redirect(&self, path: &str) {
    assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
    assert_eq!(self.location(), path);
    assert_eq!(self.body["redirect"], path);
  }
}

async fn send(
  state: TestState,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> Reply {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };

  let resp = router(state).oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let headers = resp.headers().clone();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  Reply {
    status,
    headers,
    body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
  }
}

async fn get(state: &TestState, uri: &str, token: Option<&str>) -> Reply {
  send(state.clone(), "GET", uri, token, None).await
}

async fn post(state: &TestState, uri: &str, token: Option<&str>, body: Value) -> Reply {
  send(state.clone(), "POST", uri, token, Some(body)).await
}

async fn sign_up(state: &TestState, email: &str) -> String {
  let reply = post(
    state,
    "/auth?mode=signup",
    None,
    json!({ "email": email, "password": "hunter22" }),
  )
  .await;
  reply.assert_redirect("/role-select");
  reply.body["access_token"].as_str().unwrap().to_string()
}

/// Sign up, pick the child role, and finish onboarding as `name`.
async fn onboarded_child(state: &TestState, email: &str, name: &str) -> String {
  let token = sign_up(state, email).await;
  post(state, "/role-select", Some(&token), json!({ "role": "child" }))
    .await
    .assert_redirect("/onboarding");
  post(
    state,
    "/onboarding",
    Some(&token),
    json!({ "name": name, "age": 10, "interests": "art, , soccer" }),
  )
  .await
  .assert_redirect("/dashboard");
  token
}

// ── Anonymous visitors ───────────────────────────────────────────────────────

#[tokio::test]
async fn landing_renders_for_anonymous_visitor() {
  let state = make_state().await;
  let reply = get(&state, "/", None).await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["page"], "landing");
  assert_eq!(reply.body["links"][1]["href"], "/auth?mode=signin");
}

#[tokio::test]
async fn protected_pages_send_anonymous_visitor_to_auth() {
  let state = make_state().await;
  for path in ["/role-select", "/onboarding", "/dashboard", "/chat", "/parent"] {
    get(&state, path, None).await.assert_redirect("/auth");
  }
}

#[tokio::test]
async fn unknown_token_is_treated_as_signed_out() {
  let state = make_state().await;
  get(&state, "/dashboard", Some("not-a-real-token"))
    .await
    .assert_redirect("/auth");
}

#[tokio::test]
async fn auth_view_follows_mode_query() {
  let state = make_state().await;

  let signup = get(&state, "/auth", None).await;
  assert_eq!(signup.status, StatusCode::OK);
  assert_eq!(signup.body["mode"], "signup");
  assert_eq!(signup.body["toggle"]["href"], "/auth?mode=signin");

  let signin = get(&state, "/auth?mode=signin", None).await;
  assert_eq!(signin.body["mode"], "signin");
  assert_eq!(signin.body["title"], "Welcome Back!");
  assert_eq!(signin.body["toggle"]["href"], "/auth");

  let other = get(&state, "/auth?mode=bogus", None).await;
  assert_eq!(other.body["mode"], "signup");
}

// ── Sign up / sign in ────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_up_sets_session_cookie() {
  let state = make_state().await;
  let reply = post(
    &state,
    "/auth?mode=signup",
    None,
    json!({ "email": "kid@example.com", "password": "hunter22" }),
  )
  .await;
  reply.assert_redirect("/role-select");

  let cookie = reply.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
  let token = reply.body["access_token"].as_str().unwrap();
  assert!(cookie.starts_with(&format!("astra_session={token};")));
  assert!(cookie.contains("HttpOnly"));
  assert!(cookie.contains("SameSite=Lax"));
  assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn session_cookie_is_accepted() {
  let state = make_state().await;
  let token = sign_up(&state, "kid@example.com").await;

  let req = Request::builder()
    .uri("/role-select")
    .header(header::COOKIE, format!("astra_session={token}"))
    .body(Body::empty())
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_sign_up_renders_provider_message() {
  let state = make_state().await;
  sign_up(&state, "kid@example.com").await;

  let reply = post(
    &state,
    "/auth?mode=signup",
    None,
    json!({ "email": "KID@example.com", "password": "other-pass" }),
  )
  .await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(reply.body["page"], "auth");
  assert_eq!(reply.body["mode"], "signup");
  assert_eq!(reply.body["error"], "user already registered");
}

#[tokio::test]
async fn wrong_password_renders_inline_error() {
  let state = make_state().await;
  sign_up(&state, "kid@example.com").await;

  let reply = post(
    &state,
    "/auth?mode=signin",
    None,
    json!({ "email": "kid@example.com", "password": "wrong" }),
  )
  .await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(reply.body["mode"], "signin");
  assert_eq!(reply.body["error"], "invalid login credentials");
  assert!(reply.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn sign_in_lands_on_home_page() {
  let state = make_state().await;

  // No profile yet.
  sign_up(&state, "new@example.com").await;
  post(
    &state,
    "/auth?mode=signin",
    None,
    json!({ "email": "new@example.com", "password": "hunter22" }),
  )
  .await
  .assert_redirect("/role-select");

  onboarded_child(&state, "kid@example.com", "Mia").await;
  post(
    &state,
    "/auth?mode=signin",
    None,
    json!({ "email": "kid@example.com", "password": "hunter22" }),
  )
  .await
  .assert_redirect("/dashboard");
}

// ── Routing by profile ───────────────────────────────────────────────────────

#[tokio::test]
async fn user_without_profile_goes_to_role_select() {
  let state = make_state().await;
  let token = sign_up(&state, "kid@example.com").await;

  for path in ["/", "/onboarding", "/dashboard", "/chat", "/parent"] {
    get(&state, path, Some(&token)).await.assert_redirect("/role-select");
  }
  let view = get(&state, "/role-select", Some(&token)).await;
  assert_eq!(view.status, StatusCode::OK);
  assert_eq!(view.body["choices"][0]["role"], "child");
}

#[tokio::test]
async fn child_flow_through_onboarding() {
  let state = make_state().await;
  let token = sign_up(&state, "kid@example.com").await;

  post(&state, "/role-select", Some(&token), json!({ "role": "child" }))
    .await
    .assert_redirect("/onboarding");

  // Not onboarded yet.
  get(&state, "/dashboard", Some(&token)).await.assert_redirect("/onboarding");
  get(&state, "/role-select", Some(&token)).await.assert_redirect("/onboarding");
  let view = get(&state, "/onboarding", Some(&token)).await;
  assert_eq!(view.status, StatusCode::OK);
  assert_eq!(view.body["ages"], json!([8, 9, 10, 11, 12, 13]));

  post(
    &state,
    "/onboarding",
    Some(&token),
    json!({ "name": "Mia", "age": 9, "interests": "reading, , art " }),
  )
  .await
  .assert_redirect("/dashboard");

  get(&state, "/onboarding", Some(&token)).await.assert_redirect("/dashboard");
  get(&state, "/parent", Some(&token)).await.assert_redirect("/dashboard");

  let dash = get(&state, "/dashboard", Some(&token)).await;
  assert_eq!(dash.status, StatusCode::OK);
  assert_eq!(dash.body["name"], "Mia");
  assert_eq!(dash.body["profile"]["age"], 9);
  assert_eq!(dash.body["profile"]["interests"], json!(["reading", "art"]));
  assert_eq!(dash.body["total_xp"], 0);
  assert_eq!(dash.body["xp_to_next_level"], 1000);
  assert_eq!(dash.body["level_percent"], 0);
  assert_eq!(dash.body["skills"].as_array().unwrap().len(), 3);
  assert_eq!(dash.body["skills"][0]["name"], "Communication");
  assert_eq!(dash.body["skills"][0]["percent"], 0);
}

#[tokio::test]
async fn chat_page_opens_with_welcome() {
  let state = make_state().await;
  let token = onboarded_child(&state, "kid@example.com", "Mia").await;

  let chat = get(&state, "/chat", Some(&token)).await;
  assert_eq!(chat.status, StatusCode::OK);
  assert_eq!(chat.body["child_name"], "Mia");
  let messages = chat.body["messages"].as_array().unwrap();
  assert_eq!(messages.len(), 1);
  assert_eq!(messages[0]["sender"], "astra");
  assert_eq!(messages[0]["text"], welcome_message("Mia"));
}

#[tokio::test]
async fn parent_flow() {
  let state = make_state().await;
  let token = sign_up(&state, "mum@example.com").await;

  post(&state, "/role-select", Some(&token), json!({ "role": "parent" }))
    .await
    .assert_redirect("/parent");

  let view = get(&state, "/parent", Some(&token)).await;
  assert_eq!(view.status, StatusCode::OK);
  assert_eq!(view.body["status"], "Coming Soon");
  assert_eq!(view.body["upcoming"].as_array().unwrap().len(), 4);

  for path in ["/", "/role-select", "/onboarding", "/dashboard", "/chat"] {
    get(&state, path, Some(&token)).await.assert_redirect("/parent");
  }
}

// ── Form validation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_role_is_rejected_inline() {
  let state = make_state().await;
  let token = sign_up(&state, "kid@example.com").await;

  let reply =
    post(&state, "/role-select", Some(&token), json!({ "role": "teacher" })).await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(reply.body["page"], "role_select");
  assert!(reply.body.get("mode").is_none());

  // Still no profile.
  get(&state, "/dashboard", Some(&token)).await.assert_redirect("/role-select");
}

#[tokio::test]
async fn onboarding_validates_name_and_age() {
  let state = make_state().await;
  let token = sign_up(&state, "kid@example.com").await;
  post(&state, "/role-select", Some(&token), json!({ "role": "child" })).await;

  for form in [
    json!({ "name": "  ", "age": 10, "interests": "" }),
    json!({ "name": "Mia", "age": 15, "interests": "" }),
    json!({ "name": "Mia", "interests": "art" }),
  ] {
    let reply = post(&state, "/onboarding", Some(&token), form.clone()).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY, "{form}");
    assert_eq!(reply.body["page"], "onboarding");
    assert!(reply.body["error"].as_str().is_some_and(|e| !e.is_empty()));
  }

  get(&state, "/dashboard", Some(&token)).await.assert_redirect("/onboarding");
}

#[tokio::test]
async fn onboarding_reports_mistyped_ages_inline() {
  let state = make_state().await;
  let token = sign_up(&state, "kid@example.com").await;
  post(&state, "/role-select", Some(&token), json!({ "role": "child" })).await;

  for age in [json!(300), json!(-1), json!("ten"), json!(9.5)] {
    let form = json!({ "name": "Mia", "age": age, "interests": "" });
    let reply = post(&state, "/onboarding", Some(&token), form).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY, "age {age}");
    assert_eq!(reply.body["page"], "onboarding", "age {age}");
    assert!(reply.body["error"].as_str().is_some_and(|e| !e.is_empty()));
  }

  // The select may send its value as text.
  post(
    &state,
    "/onboarding",
    Some(&token),
    json!({ "name": "Mia", "age": "10", "interests": "art" }),
  )
  .await
  .assert_redirect("/dashboard");
  let dash = get(&state, "/dashboard", Some(&token)).await;
  assert_eq!(dash.body["profile"]["age"], 10);
}

#[tokio::test]
async fn unreadable_bodies_are_reported_inline() {
  let state = make_state().await;

  let reply = send(state.clone(), "POST", "/auth?mode=signin", None, None).await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(reply.body["page"], "auth");
  assert_eq!(reply.body["mode"], "signin");
  assert!(reply.body["error"].as_str().is_some_and(|e| !e.is_empty()));

  let token = sign_up(&state, "kid@example.com").await;
  let reply = post(&state, "/role-select", Some(&token), json!("child")).await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(reply.body["page"], "role_select");

  post(&state, "/role-select", Some(&token), json!({ "role": "child" })).await;
  let reply = post(&state, "/onboarding", Some(&token), json!("Mia")).await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(reply.body["page"], "onboarding");
}

// ── Sign out ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_out_ends_session() {
  let state = make_state().await;
  let token = onboarded_child(&state, "kid@example.com", "Mia").await;

  let reply = send(state.clone(), "POST", "/sign-out", Some(&token), None).await;
  reply.assert_redirect("/");
  let cookie = reply.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
  assert!(cookie.starts_with("astra_session=;"));
  assert!(cookie.contains("Max-Age=0"));

  get(&state, "/dashboard", Some(&token)).await.assert_redirect("/auth");
  let landing = get(&state, "/", Some(&token)).await;
  assert_eq!(landing.status, StatusCode::OK);
}

#[tokio::test]
async fn dashboard_marks_sign_out_as_a_post() {
  let state = make_state().await;
  let token = onboarded_child(&state, "kid@example.com", "Mia").await;

  let dash = get(&state, "/dashboard", Some(&token)).await;
  assert_eq!(dash.body["actions"][0]["href"], "/chat");
  assert_eq!(dash.body["actions"][0]["method"], "GET");
  assert_eq!(dash.body["actions"][1]["href"], "/sign-out");
  assert_eq!(dash.body["actions"][1]["method"], "POST");

  // Following it as a plain link is not allowed.
  let reply = get(&state, "/sign-out", Some(&token)).await;
  assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
}

// ── Relay mount ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn relay_is_mounted_under_api() {
  let state = make_state().await;
  let reply = post(
    &state,
    "/api/chat",
    None,
    json!({ "message": "I'm nervous about my test", "childName": "Mia" }),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["reply"], "You said: I'm nervous about my test");

  let missing = post(&state, "/api/chat", None, json!({ "childName": "Mia" })).await;
  assert_eq!(missing.status, StatusCode::BAD_REQUEST);
  assert_eq!(missing.body["error"], "Message is required");
}

// ── Missing backend ──────────────────────────────────────────────────────────

#[tokio::test]
async fn uninitialized_gateway_renders_configuration_error() {
  let state = uninitialized_state();

  for path in ["/", "/auth", "/role-select", "/onboarding", "/dashboard", "/chat", "/parent"] {
    let reply = get(&state, path, Some("whatever")).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE, "{path}");
    assert_eq!(reply.body["page"], "error");
    assert_eq!(reply.body["error"], CONFIGURATION_MESSAGE);
    assert_eq!(reply.body["retry"], true);
  }

  let reply = post(
    &state,
    "/auth?mode=signin",
    None,
    json!({ "email": "kid@example.com", "password": "hunter22" }),
  )
  .await;
  assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);

  let reply = send(state.clone(), "POST", "/sign-out", Some("whatever"), None).await;
  assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);

  // The relay does not depend on the backend.
  let reply = post(&state, "/api/chat", None, json!({ "message": "hi" })).await;
  assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn load_failure_body_hides_provider_detail() {
  use axum::response::IntoResponse as _;

  #[derive(Debug, thiserror::Error)]
  #[error("disk I/O error at page 42")]
  struct DiskError;

  let resp = crate::Error::from(astra_core::Error::provider(DiskError)).into_response();
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(body, json!({ "error": LOAD_FAILED_MESSAGE }));
}

// ── Configuration ────────────────────────────────────────────────────────────

#[test]
fn session_lifetime_must_be_positive_and_bounded() {
  let ttl = |hours| {
    ServerConfig { session_ttl_hours: hours, ..ServerConfig::default() }.session_ttl()
  };

  assert!(ServerConfig::default().session_ttl().is_some());
  assert_eq!(ttl(1), Some(chrono::Duration::hours(1)));
  assert_eq!(
    ttl(crate::MAX_SESSION_TTL_HOURS),
    Some(chrono::Duration::hours(crate::MAX_SESSION_TTL_HOURS))
  );
  for hours in [0, -1, crate::MAX_SESSION_TTL_HOURS + 1, i64::MAX] {
    assert_eq!(ttl(hours), None, "{hours}");
  }
}
