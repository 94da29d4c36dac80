//! Source settings and loader selection.

use std::{path::PathBuf, time::Duration};

use epitrack_core::{snapshot::Snapshot, store::SnapshotLoader};
use serde::Deserialize;

use crate::{Error, Result, columns::ColumnMap, file::FileLoader, http::HttpLoader};

/// Upstream feed consumed when no URL is configured.
pub const DEFAULT_URL: &str =
  "https://raw.githubusercontent.com/ulklc/covid19-timeseries/master/countryReport/raw/rawReport.csv";

/// Upstream settings, deserialised from the `[source]` table of the server
/// config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
  /// `http(s)://` URL, `file://` URL, or plain filesystem path.
  pub url:                   String,
  pub refresh_interval_secs: u64,
  pub timeout_secs:          u64,
  pub columns:               ColumnMap,
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      url:                   DEFAULT_URL.into(),
      refresh_interval_secs: 3600,
      timeout_secs:          30,
      columns:               ColumnMap::default(),
    }
  }
}

impl SourceConfig {
  /// The refresh period; zero is rejected.
  pub fn refresh_interval(&self) -> Result<Duration> {
    if self.refresh_interval_secs == 0 {
      return Err(Error::InvalidConfig(
        "refresh_interval_secs must be at least 1".into(),
      ));
    }
    Ok(Duration::from_secs(self.refresh_interval_secs))
  }

  /// Build the loader matching the URL scheme.
  pub fn loader(&self) -> Result<Loader> {
    let url = self.url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
      let timeout = Duration::from_secs(self.timeout_secs);
      return Ok(Loader::Http(HttpLoader::new(url, self.columns.clone(), timeout)?));
    }
    let path = url.strip_prefix("file://").unwrap_or(url);
    Ok(Loader::File(FileLoader::new(PathBuf::from(path), self.columns.clone())))
  }
}

/// Either configured backend.
#[derive(Debug, Clone)]
pub enum Loader {
  Http(HttpLoader),
  File(FileLoader),
}

impl SnapshotLoader for Loader {
  type Error = crate::Error;

  async fn load(&self) -> Result<Snapshot> {
    match self {
      Self::Http(loader) => loader.load().await,
      Self::File(loader) => loader.load().await,
    }
  }
}
