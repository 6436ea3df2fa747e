//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! list-valued fields compact JSON.

use astra_core::{
  profile::{Profile, Role},
  progress::Progress,
  user::User,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> String { role.as_ref().to_owned() }

pub fn decode_role(s: &str) -> Result<Role> { Ok(Role::parse(s)?) }

// ─── Interests / progress ────────────────────────────────────────────────────

pub fn encode_interests(interests: Option<&Vec<String>>) -> Result<Option<String>> {
  interests
    .map(|i| serde_json::to_string(i).map_err(Error::from))
    .transpose()
}

pub fn decode_interests(s: Option<&str>) -> Result<Option<Vec<String>>> {
  s.map(|s| serde_json::from_str(s).map_err(Error::from)).transpose()
}

pub fn encode_progress(progress: &Progress) -> Result<String> {
  Ok(serde_json::to_string(progress)?)
}

pub fn decode_progress(s: &str) -> Result<Progress> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub email:      String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         decode_uuid(&self.user_id)?,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id: String,
  pub email:      String,
  pub role:       String,
  pub name:       Option<String>,
  pub age:        Option<i64>,
  pub interests:  Option<String>,
  pub created_at: String,
}

pub const PROFILE_COLUMNS: &str =
  "profile_id, email, role, name, age, interests, created_at";

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id: row.get(0)?,
      email:      row.get(1)?,
      role:       row.get(2)?,
      name:       row.get(3)?,
      age:        row.get(4)?,
      interests:  row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    let age = self
      .age
      .map(|a| {
        u8::try_from(a).map_err(|_| Error::CorruptRow(format!("age out of range: {a}")))
      })
      .transpose()?;

    Ok(Profile {
      id: decode_uuid(&self.profile_id)?,
      email: self.email,
      role: decode_role(&self.role)?,
      name: self.name,
      age,
      interests: decode_interests(self.interests.as_deref())?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
