//! Error types for `epitrack-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The selection names a country, or a subdivision of it, that the current
  /// snapshot has no rows for.
  #[error("unknown entity: country {country:?}{}", subdivision_suffix(.subdivision))]
  UnknownEntity {
    country:     String,
    subdivision: Option<String>,
  },

  #[error("unknown metric: {0:?}")]
  UnknownMetric(String),
}

impl Error {
  pub fn unknown_country(country: &str) -> Self {
    Self::UnknownEntity {
      country:     country.to_owned(),
      subdivision: None,
    }
  }

  pub fn unknown_subdivision(country: &str, subdivision: &str) -> Self {
    Self::UnknownEntity {
      country:     country.to_owned(),
      subdivision: Some(subdivision.to_owned()),
    }
  }
}

fn subdivision_suffix(subdivision: &Option<String>) -> String {
  subdivision
    .as_deref()
    .map(|s| format!(", subdivision {s:?}"))
    .unwrap_or_default()
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
