//! Wiring for the Inventoree server binary: configuration and startup of
//! the stores behind the HTTP API.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use inventoree_api::{AppState, api_router};
use inventoree_core::{ChatStore, InventoryStore};
use inventoree_store_sqlite::SqliteKv;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Store path that selects a throwaway in-memory database.
pub const IN_MEMORY: &str = ":memory:";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `INVENTOREE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  3000
}

fn default_store_path() -> PathBuf {
  PathBuf::from("~/.local/share/inventoree/inventoree.db")
}

impl ServerConfig {
  /// Layer the optional file at `path` under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("INVENTOREE"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Startup ──────────────────────────────────────────────────────────────────

/// Open the key-value file named by `store_path`, creating parent
/// directories as needed.
pub async fn open_kv(store_path: &Path) -> anyhow::Result<SqliteKv> {
  if store_path == Path::new(IN_MEMORY) {
    tracing::warn!("using an in-memory store; data is lost on exit");
    return Ok(SqliteKv::open_in_memory().await?);
  }

  let path = expand_tilde(store_path);
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  SqliteKv::open(&path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}

/// Load both stores from `kv` and build the traced application router.
pub async fn build_app(kv: SqliteKv) -> Router {
  let (inventory, chat) =
    tokio::join!(InventoryStore::open(kv.clone()), ChatStore::open(kv));

  let state = AppState {
    inventory: Arc::new(inventory),
    chat:      Arc::new(chat),
  };

  api_router(state).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests;
