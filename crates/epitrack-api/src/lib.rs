//! JSON API for epitrack.
//!
//! Exposes an axum [`Router`] over a [`QueryFacade`]. Every handler reads the
//! snapshot that is current when the request starts; none of them waits on
//! the loader. TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", epitrack_api::api_router(query.clone(), "Egypt"))
//! ```

pub mod countries;
pub mod error;
pub mod series;
pub mod status;

use std::sync::Arc;

use axum::{Router, routing::get};
use epitrack_core::query::QueryFacade;

pub use error::ApiError;

/// Shared state threaded through all handlers.
#[derive(Debug, Clone)]
pub struct ApiState {
  pub query:           QueryFacade,
  /// Country used when a request does not name one.
  pub default_country: Arc<str>,
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(query: QueryFacade, default_country: &str) -> Router<()> {
  let state = ApiState {
    query,
    default_country: Arc::from(default_country),
  };

  Router::new()
    // Catalogue
    .route("/countries", get(countries::list))
    .route("/countries/{country}/subdivisions", get(countries::subdivisions))
    // Selection
    .route("/series", get(series::series))
    .route("/summary", get(series::summary))
    .route("/charts", get(series::charts))
    // Health
    .route("/status", get(status::handler))
    .with_state(state)
}
