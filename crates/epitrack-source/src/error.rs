//! Error type for `epitrack-source`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("fetch failed: {0}")]
  Fetch(#[from] reqwest::Error),

  #[error("upstream responded with HTTP {0}")]
  Status(reqwest::StatusCode),

  #[error("failed to read {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("upstream table is missing required columns: {}", .missing.join(", "))]
  Schema { missing: Vec<String> },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("line {line}: invalid {column} value {value:?}")]
  InvalidRow {
    line:   u64,
    column: String,
    value:  String,
  },

  #[error("upstream table has no data rows")]
  Empty,

  #[error("invalid source config: {0}")]
  InvalidConfig(String),
}

impl Error {
  /// Transport-level failure reaching the upstream table.
  pub fn is_fetch(&self) -> bool {
    matches!(self, Self::Fetch(_) | Self::Status(_) | Self::Io { .. })
  }

  /// The upstream table arrived but lacks required columns.
  pub fn is_schema(&self) -> bool { matches!(self, Self::Schema { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
