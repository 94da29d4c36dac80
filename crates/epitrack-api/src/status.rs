//! `GET /status`: which snapshot is being served.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ApiState;

#[derive(Debug, Serialize)]
pub struct Status {
  /// 0 until the first successful load.
  pub generation:      u64,
  pub loaded_at:       Option<DateTime<Utc>>,
  pub rows:            usize,
  pub countries:       usize,
  pub default_country: String,
}

/// `GET /status`
pub async fn handler(State(state): State<ApiState>) -> Json<Status> {
  let snapshot = state.query.store().current();
  Json(Status {
    generation:      snapshot.generation(),
    loaded_at:       snapshot.loaded_at(),
    rows:            snapshot.len(),
    countries:       snapshot.countries().len(),
    default_country: state.default_country.to_string(),
  })
}
