//! astra-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) overlaid by
//! `ASTRA_*` environment variables, opens the SQLite backend, and serves the
//! page controllers plus the relay endpoint over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use astra_core::gateway::Gateway;
use astra_openai::{OpenAiClient, OpenAiConfig};
use astra_store_sqlite::SqliteStore;
use astra_web::{AppState, MAX_SESSION_TTL_HOURS, ServerConfig};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Astra mentor server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ASTRA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let session_ttl = server_cfg.session_ttl().with_context(|| {
    format!(
      "session_ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}, got {}",
      server_cfg.session_ttl_hours
    )
  })?;

  let gateway = open_gateway(&server_cfg, session_ttl).await;

  let api_key = server_cfg
    .openai_api_key
    .clone()
    .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    .filter(|k| !k.trim().is_empty());
  if api_key.is_none() {
    tracing::warn!("no OpenAI API key configured; chat will answer with the fallback reply");
  }
  let model = OpenAiClient::new(OpenAiConfig {
    api_key,
    base_url: server_cfg.openai_base_url.clone(),
    model:    server_cfg.model.clone(),
    timeout:  Duration::from_secs(server_cfg.model_timeout_secs),
  })
  .context("failed to build OpenAI client")?;

  let state = AppState {
    gateway,
    model:  Arc::new(model),
    config: Arc::new(server_cfg.clone()),
  };

  let app = astra_web::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Open the backend, or fall back to an uninitialized gateway so pages can
/// report the configuration error instead of the server refusing to start.
async fn open_gateway(cfg: &ServerConfig, session_ttl: chrono::Duration) -> Gateway<SqliteStore> {
  let Some(path) = cfg.store_path.as_deref() else {
    tracing::error!("store_path is not configured");
    return Gateway::uninitialized();
  };
  let path = expand_tilde(path);

  match SqliteStore::open(&path).await {
    Ok(store) => Gateway::new(Arc::new(store.with_session_ttl(session_ttl))),
    Err(e) => {
      tracing::error!(error = %e, path = %path.display(), "failed to open store");
      Gateway::uninitialized()
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
