//! Page routing policy.
//!
//! Nothing about authorization is cached between page loads: every page
//! controller looks up the current user and their profile, then asks
//! [`resolve_access_state`] whether to render or where to go instead.

use serde::{Deserialize, Serialize};

use crate::{
  profile::{Profile, Role},
  user::User,
};

// ─── Pages ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
  Landing,
  Auth,
  RoleSelect,
  Onboarding,
  Dashboard,
  Chat,
  Parent,
}

impl Page {
  pub const ALL: [Page; 7] = [
    Page::Landing,
    Page::Auth,
    Page::RoleSelect,
    Page::Onboarding,
    Page::Dashboard,
    Page::Chat,
    Page::Parent,
  ];

  pub fn path(self) -> &'static str {
    match self {
      Self::Landing => "/",
      Self::Auth => "/auth",
      Self::RoleSelect => "/role-select",
      Self::Onboarding => "/onboarding",
      Self::Dashboard => "/dashboard",
      Self::Chat => "/chat",
      Self::Parent => "/parent",
    }
  }

  pub fn from_path(path: &str) -> Option<Self> {
    let path = path.split('?').next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    let normalized = if trimmed.is_empty() { "/" } else { trimmed };
    Self::ALL.into_iter().find(|p| p.path() == normalized)
  }

  /// Pages that render without a signed-in user.
  pub fn is_public(self) -> bool { matches!(self, Self::Landing | Self::Auth) }
}

// ─── Auth sub-mode ───────────────────────────────────────────────────────────

/// The auth screen's sub-mode, carried only in the `mode` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
  #[default]
  Signup,
  Signin,
}

impl AuthMode {
  /// Anything other than `signin` means sign-up.
  pub fn from_query(mode: Option<&str>) -> Self {
    match mode {
      Some("signin") => Self::Signin,
      _ => Self::Signup,
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      Self::Signup => Self::Signin,
      Self::Signin => Self::Signup,
    }
  }

  pub fn path(self) -> &'static str {
    match self {
      Self::Signup => "/auth",
      Self::Signin => "/auth?mode=signin",
    }
  }
}

// ─── Policy ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
  Proceed,
  RedirectTo(Page),
}

/// The page a signed-in user belongs on.
pub fn home_page(profile: Option<&Profile>) -> Page {
  match profile {
    None => Page::RoleSelect,
    Some(p) => match p.role {
      Role::Parent => Page::Parent,
      Role::Child if p.is_onboarded() => Page::Dashboard,
      Role::Child => Page::Onboarding,
    },
  }
}

/// Where a user lands after choosing a role.
pub fn after_role_select(role: Role) -> Page {
  match role {
    Role::Child => Page::Onboarding,
    Role::Parent => Page::Parent,
  }
}

/// Decide whether `page` may render for this visitor.
///
/// A `profile` without a `user` is ignored.
pub fn resolve_access_state(
  page: Page,
  user: Option<&User>,
  profile: Option<&Profile>,
) -> AccessState {
  if page == Page::Auth {
    return AccessState::Proceed;
  }
  if user.is_none() {
    return match page {
      Page::Landing => AccessState::Proceed,
      _ => AccessState::RedirectTo(Page::Auth),
    };
  }

  let home = home_page(profile);
  let allowed = match (page, profile) {
    (Page::Landing, _) => false,
    (Page::RoleSelect, profile) => profile.is_none(),
    (_, None) => false,
    (Page::Onboarding, Some(p)) => p.role == Role::Child && !p.is_onboarded(),
    (Page::Dashboard | Page::Chat, Some(p)) => {
      p.role == Role::Child && p.is_onboarded()
    }
    (Page::Parent, Some(p)) => p.role == Role::Parent,
    (Page::Auth, _) => true,
  };

  if allowed {
    AccessState::Proceed
  } else {
    AccessState::RedirectTo(home)
  }
}
