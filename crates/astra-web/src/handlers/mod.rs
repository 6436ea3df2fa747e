pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod landing;
pub mod onboarding;
pub mod parent;
pub mod role_select;
pub mod sign_out;

use serde::Serialize;

/// A navigation target rendered as a button or text link. `method` is the
/// HTTP method the target route accepts.
#[derive(Debug, Clone, Serialize)]
pub struct Link {
  pub label:  &'static str,
  pub href:   &'static str,
  pub method: &'static str,
}

impl Link {
  pub fn get(label: &'static str, href: &'static str) -> Self {
    Self { label, href, method: "GET" }
  }

  /// A target that only accepts a form submission.
  pub fn post(label: &'static str, href: &'static str) -> Self {
    Self { label, href, method: "POST" }
  }
}
