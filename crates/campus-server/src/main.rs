//! campus-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the records API over HTTP.
//!
//! # Bootstrapping
//!
//! Role registration is staff-gated, so an empty deployment cannot mint its
//! first staff member over the API. Promote one locally instead:
//!
//! ```text
//! cargo run -p campus-server --bin server -- --grant-staff <person-id>
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use campus_core::store::RegistryStore;
use campus_server::{AppState, ServerConfig, auth::SessionKey};
use campus_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Campus records server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Promote a person to staff and exit (first-deployment bootstrap).
  #[arg(long, value_name = "PERSON_ID")]
  grant_staff: Option<i64>,
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CAMPUS"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  // Helper mode: grant staff membership and exit.
  if let Some(person_id) = cli.grant_staff {
    store
      .register_staff(person_id, 0.0)
      .await
      .with_context(|| format!("failed to grant staff to person {person_id}"))?;
    tracing::info!(person_id, "staff membership granted");
    return Ok(());
  }

  // Build application state.
  let state = AppState {
    store:    Arc::new(store),
    sessions: Arc::new(SessionKey::new(&server_cfg.session_secret)),
    config:   Arc::new(server_cfg.clone()),
  };

  let app = campus_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
