//! Server assembly for the roster employee service.
//!
//! Configuration, identity-provider loading, and the top-level router live
//! here; `main.rs` only wires them together.

pub mod provider;

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use roster_core::{provider::IdentityProvider, store::DocumentStore};
use roster_resolve::EmployeeDirectory;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables. Every field has a default so the server
/// starts with no configuration at all.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:        String,
  #[serde(default = "default_port")]
  pub port:        u16,
  #[serde(default = "default_store_path")]
  pub store_path:  PathBuf,
  /// JSON users-export file backing the identity-provider fallback.
  /// Absent means the fallback sees an empty directory.
  #[serde(default)]
  pub users_path:  Option<PathBuf>,
  /// Ordered write-candidate collections. Empty means the fixed defaults.
  #[serde(default)]
  pub collections: Vec<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("roster.db") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level router: the JSON API under `/api`, with request-level
/// tracing.
pub fn router<S, P>(directory: Arc<EmployeeDirectory<S, P>>) -> Router
where
  S: DocumentStore + 'static,
  P: IdentityProvider + 'static,
{
  Router::new()
    .nest("/api", roster_api::api_router(directory))
    .layer(TraceLayer::new_for_http())
}
