//! Async HTTP client for the Astra server.
//!
//! Redirects are never followed: a `303` from a page controller is the
//! answer, telling the caller where the account belongs.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use astra_core::chat::ChatRequest;
use reqwest::{Client, Response, StatusCode, header, redirect};
use serde::Deserialize;
use serde_json::{Value, json};

/// Connection settings for the Astra server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub token:    Option<String>,
}

/// What a page controller answered.
#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse {
  View(Value),
  Redirect(String),
}

/// A successful sign-up or sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedIn {
  pub redirect:     String,
  pub access_token: String,
}

/// Async HTTP client for the Astra pages and relay.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(90))
      .redirect(redirect::Policy::none())
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.config.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  // ── Pages ─────────────────────────────────────────────────────────────────

  /// `GET <path>`
  pub async fn page(&self, path: &str) -> Result<PageResponse> {
    let resp = self
      .auth(self.client.get(self.url(path)))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    read_page(resp).await
  }

  async fn submit(&self, path: &str, body: Value) -> Result<PageResponse> {
    let resp = self
      .auth(self.client.post(self.url(path)))
      .json(&body)
      .send()
      .await
      .with_context(|| format!("POST {path} failed"))?;
    read_page(resp).await
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// `POST /auth?mode=signup`
  pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignedIn> {
    self.authenticate("signup", email, password).await
  }

  /// `POST /auth?mode=signin`
  pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn> {
    self.authenticate("signin", email, password).await
  }

  async fn authenticate(&self, mode: &str, email: &str, password: &str) -> Result<SignedIn> {
    let resp = self
      .client
      .post(self.url("/auth"))
      .query(&[("mode", mode)])
      .json(&json!({ "email": email, "password": password }))
      .send()
      .await
      .context("POST /auth failed")?;

    if resp.status() != StatusCode::SEE_OTHER {
      return Err(error_from(resp).await);
    }
    resp.json().await.context("deserialising session")
  }

  /// `POST /sign-out`
  pub async fn sign_out(&self) -> Result<()> {
    let resp = self
      .auth(self.client.post(self.url("/sign-out")))
      .send()
      .await
      .context("POST /sign-out failed")?;
    match read_page(resp).await? {
      PageResponse::Redirect(_) => Ok(()),
      PageResponse::View(v) => Err(anyhow!("unexpected sign-out response: {v}")),
    }
  }

  // ── Forms ─────────────────────────────────────────────────────────────────

  /// `POST /role-select`
  pub async fn choose_role(&self, role: &str) -> Result<PageResponse> {
    self.submit("/role-select", json!({ "role": role })).await
  }

  /// `POST /onboarding`
  pub async fn onboard(&self, name: &str, age: u8, interests: &str) -> Result<PageResponse> {
    self
      .submit(
        "/onboarding",
        json!({ "name": name, "age": age, "interests": interests }),
      )
      .await
  }

  // ── Relay ─────────────────────────────────────────────────────────────────

  /// `POST /api/chat`. `Ok(None)` means the server answered without a reply.
  pub async fn chat(&self, message: &str, child_name: Option<&str>) -> Result<Option<String>> {
    let body = ChatRequest {
      message:    Some(message.to_string()),
      child_name: child_name.map(str::to_string),
    };
    let resp = self
      .client
      .post(self.url("/api/chat"))
      .json(&body)
      .send()
      .await
      .context("POST /api/chat failed")?;

    if !resp.status().is_success() {
      return Err(error_from(resp).await);
    }
    let body: Value = resp.json().await.context("deserialising reply")?;
    Ok(body["reply"].as_str().map(str::to_string))
  }
}

async fn read_page(resp: Response) -> Result<PageResponse> {
  let status = resp.status();
  if status == StatusCode::SEE_OTHER {
    let location = resp
      .headers()
      .get(header::LOCATION)
      .and_then(|v| v.to_str().ok())
      .map(str::to_string);
    return match location {
      Some(location) => Ok(PageResponse::Redirect(location)),
      None => {
        let body: Value = resp.json().await.context("deserialising redirect")?;
        body["redirect"]
          .as_str()
          .map(|r| PageResponse::Redirect(r.to_string()))
          .ok_or_else(|| anyhow!("redirect without a target"))
      }
    };
  }
  if !status.is_success() {
    return Err(error_from(resp).await);
  }
  Ok(PageResponse::View(resp.json().await.context("deserialising page")?))
}

/// Turn an error response into a message, preferring the server's own
/// `error` field.
async fn error_from(resp: Response) -> anyhow::Error {
  let status = resp.status();
  let body: Option<Value> = resp.json().await.ok();
  match body.as_ref().and_then(|b| b["error"].as_str()) {
    Some(message) => anyhow!("{message} ({status})"),
    None => anyhow!("server answered {status}"),
  }
}
