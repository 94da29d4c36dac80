//! Process wiring for the epitrack server: configuration and the top-level
//! router. The binary in `main.rs` adds tracing, the refresh task and the
//! listener.

use axum::Router;
use epitrack_core::query::QueryFacade;
use epitrack_source::SourceConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `EPITRACK_*` environment variables. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// Initial selection offered to clients that do not name a country.
  pub default_country: String,
  pub source:          SourceConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "127.0.0.1".to_string(),
      port:            8050,
      default_country: "Egypt".to_string(),
      source:          SourceConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Layer `file` (if present) under `EPITRACK_*` environment variables.
  /// Nested keys use `__`, e.g. `EPITRACK_SOURCE__URL`.
  pub fn load(file: &std::path::Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::with_prefix("EPITRACK")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with request tracing.
pub fn router(query: QueryFacade, config: &ServerConfig) -> Router {
  Router::new()
    .nest("/api", epitrack_api::api_router(query, &config.default_country))
    .layer(TraceLayer::new_for_http())
}
