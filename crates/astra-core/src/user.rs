//! Identity records owned by the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Carries nothing beyond bare identity; everything
/// else about the person lives in their [`Profile`](crate::profile::Profile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         Uuid,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// A signed-in session as handed out by the provider.
///
/// The token is opaque to the application: it is only ever passed back to
/// the provider to ask who the current user is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub access_token: String,
  pub user:         User,
  pub expires_at:   DateTime<Utc>,
}

/// Trim and lower-case an email address so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// A minimal well-formedness check: one `@` with something on both sides.
pub fn is_plausible_email(email: &str) -> bool {
  match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    }
    None => false,
  }
}
