//! Gamified progress shown on the dashboard: skills with XP, and badges.

use serde::{Deserialize, Serialize};

/// A skill the child levels up by talking with Astra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
  pub name:   String,
  pub level:  u32,
  pub xp:     u32,
  /// XP needed to reach the next level.
  pub max_xp: u32,
}

impl Skill {
  fn starter(name: &str, max_xp: u32) -> Self {
    Self { name: name.to_owned(), level: 1, xp: 0, max_xp }
  }

  /// Progress towards the next level, clamped to `0..=100`.
  pub fn percent(&self) -> u8 {
    if self.max_xp == 0 {
      return 100;
    }
    (u64::from(self.xp.min(self.max_xp)) * 100 / u64::from(self.max_xp)) as u8
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
  pub name:        String,
  pub description: String,
}

/// Total XP that makes up one overall level.
pub const XP_PER_LEVEL: u32 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
  pub skills: Vec<Skill>,
  pub badges: Vec<Badge>,
}

impl Progress {
  /// The record seeded for every new child profile.
  pub fn starter() -> Self {
    Self {
      skills: vec![
        Skill::starter("Communication", 500),
        Skill::starter("Problem Solving", 400),
        Skill::starter("Leadership", 300),
      ],
      badges: Vec::new(),
    }
  }

  pub fn total_xp(&self) -> u32 { self.skills.iter().map(|s| s.xp).sum() }

  /// XP still needed to reach the next overall level.
  pub fn xp_to_next_level(&self) -> u32 {
    XP_PER_LEVEL - self.total_xp() % XP_PER_LEVEL
  }

  /// Progress through the current overall level, `0..100`.
  pub fn level_percent(&self) -> u8 {
    (self.total_xp() % XP_PER_LEVEL * 100 / XP_PER_LEVEL) as u8
  }
}
