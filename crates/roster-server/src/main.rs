//! roster server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite document store, loads the optional users export, and serves the
//! JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roster_resolve::{CollectionRoutes, EmployeeDirectory};
use roster_server::{ServerConfig, provider::FileDirectory};
use roster_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster employee service")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration: optional TOML file, then ROSTER_* environment
  // overrides. `collections` accepts a comma-separated value from the
  // environment.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("ROSTER")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("collections"),
    )
    .build()
    .context("failed to read configuration")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the document store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  // Identity provider: a users export file when configured, else empty.
  let provider = match &server_cfg.users_path {
    Some(path) => {
      let directory = FileDirectory::load(path)
        .with_context(|| format!("failed to load users export {path:?}"))?;
      tracing::info!(users = directory.len(), "users export loaded");
      directory
    }
    None => FileDirectory::empty(),
  };

  let directory = EmployeeDirectory::new(
    Arc::new(store),
    Arc::new(provider),
    CollectionRoutes::new(server_cfg.collections.clone()),
  );

  let app = roster_server::router(Arc::new(directory));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
