//! Profile: the application-level record describing a user beyond identity.
//!
//! A profile is keyed by the user id and created once, when the user picks a
//! role. `name`, `age` and `interests` stay empty until a child completes
//! onboarding; parents never fill them in.

use std::{ops::RangeInclusive, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// Ages offered during onboarding.
pub const ONBOARDING_AGES: RangeInclusive<u8> = 8..=13;

// ─── Role ────────────────────────────────────────────────────────────────────

/// Which side of the product a user belongs to. Fixed at profile creation.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Child,
  Parent,
}

impl Role {
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownRole(s.to_owned()))
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  /// Same value as the owning [`User`](crate::user::User)'s id.
  pub id:         Uuid,
  pub email:      String,
  pub role:       Role,
  pub name:       Option<String>,
  pub age:        Option<u8>,
  pub interests:  Option<Vec<String>>,
  pub created_at: DateTime<Utc>,
}

impl Profile {
  /// A child is onboarded once they have told us their name.
  pub fn is_onboarded(&self) -> bool {
    self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
  }

  /// Name to greet the user with, if they have given one.
  pub fn display_name(&self) -> Option<&str> {
    self.name.as_deref().filter(|n| !n.trim().is_empty())
  }
}

/// Input to [`crate::gateway::ProfileStore::create_profile`].
/// `created_at` is always set by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
  pub id:    Uuid,
  pub email: String,
  pub role:  Role,
}

// ─── ProfileUpdate ───────────────────────────────────────────────────────────

/// A partial update. Only `Some` fields overwrite the stored value; there is
/// deliberately no way to change `role` or `email`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub age:       Option<u8>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub interests: Option<Vec<String>>,
}

impl ProfileUpdate {
  /// Build the update submitted by the onboarding form.
  ///
  /// `interests` is the raw comma-separated text field.
  /// `age` is taken wide so out-of-range submissions get the same message
  /// as in-range ones that are not offered.
  pub fn onboarding(name: &str, age: i64, interests: &str) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::InvalidUpdate("name is required".into()));
    }
    let age = u8::try_from(age)
      .ok()
      .filter(|a| ONBOARDING_AGES.contains(a))
      .ok_or_else(|| {
        Error::InvalidUpdate(format!(
          "age must be between {} and {}",
          ONBOARDING_AGES.start(),
          ONBOARDING_AGES.end()
        ))
      })?;
    Ok(Self {
      name:      Some(name.to_owned()),
      age:       Some(age),
      interests: Some(parse_interests(interests)),
    })
  }

  /// Merge into `profile`, leaving unspecified fields untouched.
  pub fn apply(self, profile: &mut Profile) {
    if let Some(name) = self.name {
      profile.name = Some(name);
    }
    if let Some(age) = self.age {
      profile.age = Some(age);
    }
    if let Some(interests) = self.interests {
      profile.interests = Some(interests);
    }
  }
}

/// Split a comma-separated interests field, trimming and dropping empties.
pub fn parse_interests(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|i| !i.is_empty())
    .map(str::to_owned)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn child() -> Profile {
    Profile {
      id:         Uuid::new_v4(),
      email:      "kid@example.com".into(),
      role:       Role::Child,
      name:       None,
      age:        None,
      interests:  None,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn role_round_trips_through_strings() {
    assert_eq!(Role::parse("child").unwrap(), Role::Child);
    assert_eq!(Role::Parent.to_string(), "parent");
    assert_eq!(Role::Child.as_ref(), "child");
    assert!(matches!(Role::parse("teacher"), Err(Error::UnknownRole(_))));
  }

  #[test]
  fn interests_are_split_and_trimmed() {
    assert_eq!(
      parse_interests(" reading, sports ,, art,  "),
      vec!["reading", "sports", "art"]
    );
    assert!(parse_interests("").is_empty());
  }

  #[test]
  fn partial_update_leaves_other_fields() {
    let mut p = child();
    ProfileUpdate::onboarding("Mia", 10, "drawing, chess")
      .unwrap()
      .apply(&mut p);

    ProfileUpdate { age: Some(9), ..Default::default() }.apply(&mut p);

    assert_eq!(p.age, Some(9));
    assert_eq!(p.name.as_deref(), Some("Mia"));
    assert_eq!(
      p.interests,
      Some(vec!["drawing".to_string(), "chess".to_string()])
    );
  }

  #[test]
  fn onboarding_validates_name_and_age() {
    assert!(ProfileUpdate::onboarding("   ", 10, "").is_err());
    assert!(ProfileUpdate::onboarding("Mia", 7, "").is_err());
    assert!(ProfileUpdate::onboarding("Mia", 14, "").is_err());
    assert!(ProfileUpdate::onboarding("Mia", 300, "").is_err());
    assert!(ProfileUpdate::onboarding("Mia", -1, "").is_err());
    let update = ProfileUpdate::onboarding("  Mia ", 13, "").unwrap();
    assert_eq!(update.name.as_deref(), Some("Mia"));
    assert_eq!(update.interests, Some(vec![]));
  }

  #[test]
  fn onboarded_requires_non_blank_name() {
    let mut p = child();
    assert!(!p.is_onboarded());
    p.name = Some("  ".into());
    assert!(!p.is_onboarded());
    assert_eq!(p.display_name(), None);
    p.name = Some("Mia".into());
    assert!(p.is_onboarded());
  }

  #[test]
  fn empty_update_deserializes_from_empty_object() {
    let update: ProfileUpdate = serde_json::from_str("{}").unwrap();
    assert_eq!(update, ProfileUpdate::default());
  }
}
