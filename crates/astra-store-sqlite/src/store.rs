//! [`SqliteStore`]: the SQLite implementation of [`IdentityProvider`] and
//! [`ProfileStore`].

use std::path::Path;

use astra_core::{
  gateway::{IdentityProvider, ProfileStore},
  profile::{NewProfile, Profile, ProfileUpdate, Role},
  progress::Progress,
  user::{Session, User, is_plausible_email, normalize_email},
};
use chrono::{Duration, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  credentials::{hash_password, new_token, token_digest, verify_password},
  encode::{
    PROFILE_COLUMNS, RawProfile, RawUser, decode_dt, decode_progress,
    encode_dt, encode_interests, encode_progress, encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

/// How long a session stays valid unless configured otherwise.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

/// Result of an insert that checks its preconditions inside the same call.
enum Insert {
  Done,
  Duplicate,
  MissingUser,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Astra backend stored in a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:        tokio_rusqlite::Connection,
  session_ttl: Duration,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, e.g. for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS) })
  }

  /// Override how long new sessions remain valid.
  pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
    self.session_ttl = ttl;
    self
  }

  /// Issue a new bearer token for `user`.
  async fn start_session(&self, user: User) -> Result<Session> {
    let token      = new_token();
    let now        = Utc::now();
    let expires_at = now
      .checked_add_signed(self.session_ttl)
      .ok_or(Error::SessionExpiryOutOfRange(self.session_ttl))?;

    let digest      = token_digest(&token);
    let user_id_str = encode_uuid(user.id);
    let created_str = encode_dt(now);
    let expires_str = encode_dt(expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![digest, user_id_str, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(Session { access_token: token, user, expires_at })
  }

  async fn read_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE profile_id = ?1"),
              rusqlite::params![id_str],
              RawProfile::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }
}

// ─── IdentityProvider impl ───────────────────────────────────────────────────

impl IdentityProvider for SqliteStore {
  type Error = Error;

  async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
    let email = normalize_email(email);
    if !is_plausible_email(&email) {
      return Err(Error::InvalidEmail);
    }
    if password.is_empty() {
      return Err(Error::EmptyPassword);
    }

    let user = User {
      id:         Uuid::new_v4(),
      email:      email.clone(),
      created_at: Utc::now(),
    };

    let password_hash = hash_password(password)?;
    let id_str        = encode_uuid(user.id);
    let at_str        = encode_dt(user.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(Insert::Duplicate);
        }

        conn.execute(
          "INSERT INTO users (user_id, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email, password_hash, at_str],
        )?;
        Ok(Insert::Done)
      })
      .await?;

    if !matches!(outcome, Insert::Done) {
      return Err(Error::EmailTaken);
    }

    tracing::info!(user_id = %user.id, "account created");
    self.start_session(user).await
  }

  async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
    let email = normalize_email(email);

    let row: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, email, created_at, password_hash
               FROM users WHERE email = ?1",
              rusqlite::params![email],
              |row| {
                Ok((
                  RawUser {
                    user_id:    row.get(0)?,
                    email:      row.get(1)?,
                    created_at: row.get(2)?,
                  },
                  row.get(3)?,
                ))
              },
            )
            .optional()?,
        )
      })
      .await?;

    let Some((raw, phc)) = row else {
      return Err(Error::InvalidCredentials);
    };
    if !verify_password(password, &phc) {
      return Err(Error::InvalidCredentials);
    }

    let user = raw.into_user()?;
    tracing::info!(user_id = %user.id, "signed in");
    self.start_session(user).await
  }

  async fn sign_out(&self, access_token: &str) -> Result<()> {
    let digest = token_digest(access_token);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![digest],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn current_user(&self, access_token: &str) -> Result<Option<User>> {
    let digest = token_digest(access_token);

    let row: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT u.user_id, u.email, u.created_at, s.expires_at
               FROM sessions s
               JOIN users u ON u.user_id = s.user_id
               WHERE s.token_hash = ?1",
              rusqlite::params![digest],
              |row| {
                Ok((
                  RawUser {
                    user_id:    row.get(0)?,
                    email:      row.get(1)?,
                    created_at: row.get(2)?,
                  },
                  row.get(3)?,
                ))
              },
            )
            .optional()?,
        )
      })
      .await?;

    let Some((raw, expires_at)) = row else {
      return Ok(None);
    };
    if decode_dt(&expires_at)? <= Utc::now() {
      return Ok(None);
    }
    raw.into_user().map(Some)
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteStore {
  type Error = Error;

  async fn create_profile(&self, input: NewProfile) -> Result<Profile> {
    let profile = Profile {
      id:         input.id,
      email:      input.email,
      role:       input.role,
      name:       None,
      age:        None,
      interests:  None,
      created_at: Utc::now(),
    };

    // Children start with a fresh progress record for the dashboard.
    let seed = match profile.role {
      Role::Child => Some(encode_progress(&Progress::starter())?),
      Role::Parent => None,
    };

    let id_str    = encode_uuid(profile.id);
    let email     = profile.email.clone();
    let role_str  = encode_role(profile.role);
    let at_str    = encode_dt(profile.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        let user_exists = conn
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !user_exists {
          return Ok(Insert::MissingUser);
        }

        let profile_exists = conn
          .query_row(
            "SELECT 1 FROM profiles WHERE profile_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if profile_exists {
          return Ok(Insert::Duplicate);
        }

        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO profiles (profile_id, email, role, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email, role_str, at_str],
        )?;
        if let Some(progress_json) = seed {
          tx.execute(
            "INSERT INTO progress (user_id, progress_json, updated_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![id_str, progress_json, at_str],
          )?;
        }
        tx.commit()?;
        Ok(Insert::Done)
      })
      .await?;

    match outcome {
      Insert::Done => Ok(profile),
      Insert::Duplicate => Err(Error::ProfileExists(profile.id)),
      Insert::MissingUser => Err(Error::UserNotFound(profile.id)),
    }
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    self.read_profile(id).await
  }

  async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Profile> {
    let id_str    = encode_uuid(id);
    let interests = encode_interests(update.interests.as_ref())?;
    let name      = update.name;
    let age       = update.age.map(i64::from);

    // NULL parameters leave the column as it was.
    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE profiles SET
             name      = COALESCE(?2, name),
             age       = COALESCE(?3, age),
             interests = COALESCE(?4, interests)
           WHERE profile_id = ?1",
          rusqlite::params![id_str, name, age, interests],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(
          &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE profile_id = ?1"),
          rusqlite::params![id_str],
          RawProfile::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw
      .ok_or(Error::ProfileNotFound(id))?
      .into_profile()
  }

  async fn get_progress(&self, id: Uuid) -> Result<Option<Progress>> {
    let id_str = encode_uuid(id);

    let json: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT progress_json FROM progress WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    json.as_deref().map(decode_progress).transpose()
  }
}
