//! Backend traits and the [`Gateway`] the web layer talks through.
//!
//! The traits are implemented by backends (e.g. `astra-store-sqlite`). A
//! [`Gateway`] wraps an *optional* backend: when the client could not be
//! constructed every operation fails fast with [`Error::NotInitialized`]
//! instead of reaching for a half-built client.
//!
//! All trait methods return `Send` futures so backends can be used from
//! multi-threaded runtimes (e.g. tokio with `axum`).

use std::{future::Future, sync::Arc};

use uuid::Uuid;

use crate::{
  Error, Result,
  profile::{NewProfile, Profile, ProfileUpdate},
  progress::Progress,
  user::{Session, User},
};

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Credential and session operations of an identity provider.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Register a new account and start a session for it.
  fn sign_up<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + 'a;

  /// Start a session for an existing account.
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + 'a;

  /// End the session identified by `access_token`. Unknown tokens are not an
  /// error.
  fn sign_out<'a>(
    &'a self,
    access_token: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Resolve the user behind `access_token`, or `None` if the session is
  /// unknown or expired.
  fn current_user<'a>(
    &'a self,
    access_token: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;
}

/// Profile and progress records keyed by user id.
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a profile. Fails if one already exists for `profile.id`.
  fn create_profile(
    &self,
    profile: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Look up a profile by user id. `None` means the user has not picked a
  /// role yet.
  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Merge `update` into the stored profile and return the result.
  fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Read the dashboard progress for a user, if any has been recorded.
  fn get_progress(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Progress>, Self::Error>> + Send + '_;
}

/// Everything the application needs from a single backend.
pub trait Backend: IdentityProvider + ProfileStore {}

impl<T: IdentityProvider + ProfileStore> Backend for T {}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Injected access to the identity provider and profile store.
///
/// Cloning is cheap: the backend is reference-counted.
pub struct Gateway<B> {
  backend: Option<Arc<B>>,
}

impl<B> Clone for Gateway<B> {
  fn clone(&self) -> Self { Self { backend: self.backend.clone() } }
}

impl<B> Gateway<B> {
  pub fn new(backend: Arc<B>) -> Self { Self { backend: Some(backend) } }

  /// A gateway whose backend client failed to construct.
  pub fn uninitialized() -> Self { Self { backend: None } }

  pub fn is_initialized(&self) -> bool { self.backend.is_some() }

  fn client(&self) -> Result<&B> {
    self.backend.as_deref().ok_or(Error::NotInitialized)
  }
}

impl<B: IdentityProvider> Gateway<B> {
  pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
    self.client()?.sign_up(email, password).await.map_err(Error::provider)
  }

  pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
    self.client()?.sign_in(email, password).await.map_err(Error::provider)
  }

  pub async fn sign_out(&self, access_token: &str) -> Result<()> {
    self.client()?.sign_out(access_token).await.map_err(Error::provider)
  }

  pub async fn current_user(&self, access_token: &str) -> Result<Option<User>> {
    self
      .client()?
      .current_user(access_token)
      .await
      .map_err(Error::provider)
  }
}

impl<B: ProfileStore> Gateway<B> {
  pub async fn create_profile(&self, profile: NewProfile) -> Result<Profile> {
    self.client()?.create_profile(profile).await.map_err(Error::provider)
  }

  pub async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    self.client()?.get_profile(id).await.map_err(Error::provider)
  }

  pub async fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> Result<Profile> {
    self.client()?.update_profile(id, update).await.map_err(Error::provider)
  }

  pub async fn get_progress(&self, id: Uuid) -> Result<Option<Progress>> {
    self.client()?.get_progress(id).await.map_err(Error::provider)
  }
}
