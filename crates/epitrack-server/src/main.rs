//! epitrack server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), keeps the case
//! table fresh in the background, and serves the JSON API over HTTP.
//!
//! # Checking a source
//!
//! To load the configured upstream once and print what it contains:
//!
//! ```
//! cargo run -p epitrack-server -- --check
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use epitrack_core::{query::QueryFacade, store::SnapshotStore};
use epitrack_server::ServerConfig;
use epitrack_source::RefreshScheduler;
use tokio::{net::TcpListener, sync::watch};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "epitrack case tracker server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load the upstream table once, print a summary of it and exit.
  #[arg(long)]
  check: bool,
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

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let loader = server_cfg
    .source
    .loader()
    .context("failed to build upstream loader")?;
  let interval = server_cfg
    .source
    .refresh_interval()
    .context("invalid [source] configuration")?;
  let store = Arc::new(SnapshotStore::new());
  let scheduler = RefreshScheduler::new(loader, store.clone()).interval(interval);

  // Helper mode: one load, then exit.
  if cli.check {
    let snapshot = scheduler
      .refresh_once()
      .await
      .with_context(|| format!("failed to load {}", server_cfg.source.url))?;
    println!(
      "{} rows, {} countries",
      snapshot.len(),
      snapshot.countries().len()
    );
    return Ok(());
  }

  let (stop_tx, stop_rx) = watch::channel(false);
  tokio::spawn(async move {
    match tokio::signal::ctrl_c().await {
      Ok(()) => tracing::info!("shutdown requested"),
      Err(err) => tracing::error!(error = %err, "failed to listen for ctrl-c"),
    }
    let _ = stop_tx.send(true);
  });

  let refresh = scheduler.spawn(stopped(stop_rx.clone()));

  let app = epitrack_server::router(QueryFacade::new(store), &server_cfg);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(stopped(stop_rx))
    .await
    .context("server error")?;

  refresh.await.context("refresh task panicked")?;
  Ok(())
}

/// Resolves once shutdown has been signalled.
async fn stopped(mut rx: watch::Receiver<bool>) {
  let _ = rx.wait_for(|stop| *stop).await;
}
