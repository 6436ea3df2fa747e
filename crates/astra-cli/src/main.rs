//! `astra`: terminal client for the Astra mentor server.
//!
//! # Usage
//!
//! ```text
//! astra --url http://localhost:3000 signup kid@example.com
//! export ASTRA_TOKEN=...
//! astra role child
//! astra onboard Mia 10 --interests "reading, art"
//! astra chat
//! ```

mod chat;
mod client;

use std::{
  io::{self, BufRead as _, Write as _},
  path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use astra_core::navigation::Page;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, PageResponse, SignedIn};
use serde::{Deserialize, Serialize};
use tokio::io::BufReader;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "astra", about = "Terminal client for the Astra mentor")]
struct Args {
  /// Path to a TOML config file (url, token). Sign-in stores the token here.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the Astra server (default: http://localhost:3000).
  #[arg(long, env = "ASTRA_URL")]
  url: Option<String>,

  /// Session token from `signup` or `signin`.
  #[arg(long, env = "ASTRA_TOKEN", hide_env_values = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account.
  Signup {
    email:    String,
    /// Read from stdin when omitted.
    #[arg(long)]
    password: Option<String>,
  },
  /// Sign in to an existing account.
  Signin {
    email:    String,
    #[arg(long)]
    password: Option<String>,
  },
  /// End the current session.
  Signout,
  /// Show the page at PATH, or where the server sends you instead.
  Page { path: String },
  /// Choose `child` or `parent`.
  Role { role: String },
  /// Tell Astra about yourself.
  Onboard {
    name:      String,
    age:       u8,
    /// Comma-separated, e.g. "reading, sports, art".
    #[arg(long, default_value = "")]
    interests: String,
  },
  /// Talk with Astra. End with Ctrl-D or /quit.
  Chat,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Serialize, Default)]
struct ConfigFile {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  url:   String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  token: String,
}

impl ConfigFile {
  fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }

  fn store(&self, path: &Path) -> Result<()> {
    let raw = toml::to_string(self).context("serialising config file")?;
    std::fs::write(path, raw)
      .with_context(|| format!("writing config file {}", path.display()))
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let mut file_cfg = match &args.config {
    Some(path) => ConfigFile::load(path)?,
    None => ConfigFile::default(),
  };

  // CLI flags and env override the config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    token:    args
      .token
      .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone())),
  };
  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Signup { email, password } => {
      let password = password_or_stdin(password)?;
      let session = client.sign_up(&email, &password).await?;
      remember(&session, &mut file_cfg, args.config.as_deref())?;
    }
    Command::Signin { email, password } => {
      let password = password_or_stdin(password)?;
      let session = client.sign_in(&email, &password).await?;
      remember(&session, &mut file_cfg, args.config.as_deref())?;
    }
    Command::Signout => {
      client.sign_out().await?;
      if let Some(path) = args.config.as_deref() {
        file_cfg.token.clear();
        file_cfg.store(path)?;
      }
      println!("Signed out.");
    }
    Command::Page { path } => {
      check_page_path(&path)?;
      print_page(client.page(&path).await?)?
    }
    Command::Role { role } => print_page(client.choose_role(&role).await?)?,
    Command::Onboard { name, age, interests } => {
      print_page(client.onboard(&name, age, &interests).await?)?
    }
    Command::Chat => {
      let stdin = BufReader::new(tokio::io::stdin());
      chat::run(&client, stdin, &mut io::stdout()).await?;
    }
  }

  Ok(())
}

/// Reject paths the server has no page for, ignoring any query string.
fn check_page_path(path: &str) -> Result<Page> {
  let bare = path.split('?').next().unwrap_or(path);
  match Page::from_path(bare) {
    Some(page) => Ok(page),
    None => {
      let known: Vec<_> = Page::ALL.iter().map(|p| p.path()).collect();
      bail!("unknown page {path:?}; expected one of {}", known.join(", "))
    }
  }
}

fn print_page(page: PageResponse) -> Result<()> {
  match page {
    PageResponse::View(view) => {
      println!("{}", serde_json::to_string_pretty(&view)?);
    }
    PageResponse::Redirect(to) => println!("→ {to}"),
  }
  Ok(())
}

/// Persist the token when a config file is in use; always print it.
fn remember(session: &SignedIn, file_cfg: &mut ConfigFile, path: Option<&Path>) -> Result<()> {
  if let Some(path) = path {
    file_cfg.token = session.access_token.clone();
    file_cfg.store(path)?;
    println!("Session saved to {}.", path.display());
  } else {
    println!("export ASTRA_TOKEN={}", session.access_token);
  }
  println!("→ {}", session.redirect);
  Ok(())
}

/// Use the given password, or read one line from stdin.
fn password_or_stdin(password: Option<String>) -> Result<String> {
  if let Some(password) = password {
    return Ok(password);
  }
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn page_paths_are_checked_before_fetching() {
    assert_eq!(check_page_path("/dashboard").unwrap(), Page::Dashboard);
    assert_eq!(check_page_path("/auth?mode=signup").unwrap(), Page::Auth);

    let err = check_page_path("/settings").unwrap_err().to_string();
    assert!(err.contains("/settings"));
    assert!(err.contains("/onboarding"));
  }
}
