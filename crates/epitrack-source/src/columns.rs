//! Upstream column names and their mapping onto the canonical schema.

use serde::Deserialize;

/// Names of the upstream CSV columns feeding each canonical field.
///
/// Defaults match the per-country daily report feed
/// (`countryName,lat,lon,day,confirmed,death,recovered`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
  pub country:     String,
  /// Optional upstream column; rows fall back to `"<all>"` without it.
  pub subdivision: String,
  pub latitude:    String,
  pub longitude:   String,
  pub date:        String,
  pub confirmed:   String,
  pub deaths:      String,
  pub recovered:   String,
}

impl Default for ColumnMap {
  fn default() -> Self {
    Self {
      country:     "countryName".into(),
      subdivision: "provinceState".into(),
      latitude:    "lat".into(),
      longitude:   "lon".into(),
      date:        "day".into(),
      confirmed:   "confirmed".into(),
      deaths:      "death".into(),
      recovered:   "recovered".into(),
    }
  }
}
