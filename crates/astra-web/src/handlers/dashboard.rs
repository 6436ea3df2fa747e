//! `GET /dashboard`: the onboarded child's home.

use astra_core::{
  gateway::Backend,
  model::ChatModel,
  navigation::Page,
  profile::Profile,
  progress::{Badge, Skill},
};
use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
  AppState, access::visit, error::Error, handlers::Link, session::SessionToken,
};

/// Shown when a profile has no usable name.
pub const DEFAULT_NAME: &str = "Learner";

#[derive(Debug, Serialize)]
pub struct SkillView {
  pub name:    String,
  pub level:   u32,
  pub xp:      u32,
  pub max_xp:  u32,
  pub percent: u8,
}

impl From<Skill> for SkillView {
  fn from(skill: Skill) -> Self {
    let percent = skill.percent();
    Self {
      name: skill.name,
      level: skill.level,
      xp: skill.xp,
      max_xp: skill.max_xp,
      percent,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
  pub page:             Page,
  pub greeting:         String,
  pub name:             String,
  pub profile:          Profile,
  pub total_xp:         u32,
  pub xp_to_next_level: u32,
  pub level_percent:    u8,
  pub skills:           Vec<SkillView>,
  pub badges:           Vec<Badge>,
  pub actions:          [Link; 2],
}

pub async fn show<B, M>(
  State(state): State<AppState<B, M>>,
  token: SessionToken,
) -> Result<Json<DashboardView>, Error>
where
  B: Backend + 'static,
  M: ChatModel + 'static,
{
  let (user, profile) = visit(&state.gateway, token.as_deref(), Page::Dashboard)
    .await?
    .with_profile()?;

  let progress = state.gateway.get_progress(user.id).await?.unwrap_or_default();
  let name = profile.display_name().unwrap_or(DEFAULT_NAME).to_string();

  Ok(Json(DashboardView {
    page:             Page::Dashboard,
    greeting:         format!("Welcome back, {name}!"),
    name,
    profile,
    total_xp:         progress.total_xp(),
    xp_to_next_level: progress.xp_to_next_level(),
    level_percent:    progress.level_percent(),
    skills:           progress.skills.into_iter().map(SkillView::from).collect(),
    badges:           progress.badges,
    actions:          [
      Link::get("Chat with Astra", Page::Chat.path()),
      Link::post("Sign Out", "/sign-out"),
    ],
  }))
}
