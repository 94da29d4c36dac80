//! Handlers for the per-selection endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/series`  | `?country=&subdivision=` |
//! | `GET`  | `/summary` | `null` body when the window is all pre-outbreak |
//! | `GET`  | `/charts`  | Extra `?metrics=confirmed,deaths` |
//!
//! `country` falls back to the configured default country and `subdivision`
//! to `"<all>"`.

use axum::{
  Json,
  extract::{Query, State},
};
use epitrack_core::{
  ALL_SUBDIVISIONS,
  chart::parse_metrics,
  derive::DerivedRecord,
  query::Charts,
  summary::Summary,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SelectionParams {
  pub country:     Option<String>,
  pub subdivision: Option<String>,
}

impl SelectionParams {
  fn resolve<'a>(&'a self, state: &'a ApiState) -> (&'a str, &'a str) {
    (
      self.country.as_deref().unwrap_or(&state.default_country),
      self.subdivision.as_deref().unwrap_or(ALL_SUBDIVISIONS),
    )
  }
}

/// `GET /series[?country=<name>&subdivision=<name>]`
pub async fn series(
  State(state): State<ApiState>,
  Query(params): Query<SelectionParams>,
) -> Result<Json<Vec<DerivedRecord>>, ApiError> {
  let (country, subdivision) = params.resolve(&state);
  Ok(Json(state.query.derived_series(country, subdivision)?))
}

/// `GET /summary[?country=<name>&subdivision=<name>]`
pub async fn summary(
  State(state): State<ApiState>,
  Query(params): Query<SelectionParams>,
) -> Result<Json<Option<Summary>>, ApiError> {
  let (country, subdivision) = params.resolve(&state);
  Ok(Json(state.query.summary(country, subdivision)?))
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
  #[serde(flatten)]
  pub selection: SelectionParams,
  /// Comma-separated metric names; empty or absent selects the default set.
  pub metrics:   Option<String>,
}

/// `GET /charts[?country=..&subdivision=..&metrics=a,b]`
pub async fn charts(
  State(state): State<ApiState>,
  Query(params): Query<ChartParams>,
) -> Result<Json<Charts>, ApiError> {
  let metrics = parse_metrics(params.metrics.as_deref().unwrap_or(""))?;
  let (country, subdivision) = params.selection.resolve(&state);
  Ok(Json(state.query.charts(country, subdivision, &metrics)?))
}
