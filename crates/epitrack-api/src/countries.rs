//! Handlers for `/countries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/countries` | Sorted, distinct |
//! | `GET`  | `/countries/{country}/subdivisions` | `"<all>"` first; 404 if unknown |

use axum::{
  Json,
  extract::{Path, State},
};

use crate::{ApiState, error::ApiError};

/// `GET /countries`
pub async fn list(State(state): State<ApiState>) -> Json<Vec<String>> {
  Json(state.query.countries())
}

/// `GET /countries/{country}/subdivisions`
pub async fn subdivisions(
  State(state): State<ApiState>,
  Path(country): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
  Ok(Json(state.query.subdivisions_for(&country)?))
}
