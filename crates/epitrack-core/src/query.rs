//! The read-side contract consumed by the presentation layer.
//!
//! Every call takes one reference to the current snapshot up front and works
//! on that immutable value, so a refresh landing mid-query is never observed.
//! Nothing here blocks on the loader.

use std::sync::Arc;

use crate::{
  Error, Result,
  chart::{self, ChartSeries, Metric},
  correct,
  derive::{self, DailyTotals, DerivedRecord},
  observation::{ALL_SUBDIVISIONS, Observation},
  snapshot::Snapshot,
  store::SnapshotStore,
  summary::{self, Summary},
};

/// Cumulative and daily chart series for one selection.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Charts {
  pub cumulative: Vec<ChartSeries>,
  pub new:        Vec<ChartSeries>,
}

/// Query operations over whatever snapshot is current when each call starts.
///
/// Cloning is cheap; the store is reference-counted.
#[derive(Debug, Clone)]
pub struct QueryFacade {
  store: Arc<SnapshotStore>,
}

impl QueryFacade {
  pub fn new(store: Arc<SnapshotStore>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<SnapshotStore> { &self.store }

  /// Sorted distinct country names of the current snapshot.
  pub fn countries(&self) -> Vec<String> {
    self.store.current().countries().to_vec()
  }

  /// Corrected, derived records for one selection.
  ///
  /// `subdivision == "<all>"` sums every subdivision of `country` after each
  /// has been corrected on its own; any other value selects that exact
  /// subdivision.
  pub fn derived_series(
    &self,
    country: &str,
    subdivision: &str,
  ) -> Result<Vec<DerivedRecord>> {
    let snapshot = self.store.current();
    let series = corrected_series(&snapshot, country, subdivision)?;
    tracing::debug!(
      country,
      subdivision,
      generation = snapshot.generation(),
      days = series.len(),
      "deriving series"
    );
    Ok(derive::derive(&series))
  }

  /// Selectable subdivisions of `country`, `"<all>"` first, the rest sorted.
  pub fn subdivisions_for(&self, country: &str) -> Result<Vec<String>> {
    let snapshot = self.store.current();
    let entities = snapshot
      .entities(country)
      .ok_or_else(|| Error::unknown_country(country))?;

    let mut subdivisions = vec![ALL_SUBDIVISIONS.to_owned()];
    subdivisions.extend(
      entities
        .map(|rows| rows[0].subdivision.as_str())
        .filter(|s| *s != ALL_SUBDIVISIONS)
        .map(str::to_owned),
    );
    Ok(subdivisions)
  }

  /// Headline figures for the latest day of the selection, or `None` when
  /// every row of the window is pre-outbreak.
  pub fn summary(
    &self,
    country: &str,
    subdivision: &str,
  ) -> Result<Option<Summary>> {
    let records = self.derived_series(country, subdivision)?;
    Ok(summary::summarize(&records))
  }

  pub fn charts(
    &self,
    country: &str,
    subdivision: &str,
    metrics: &[Metric],
  ) -> Result<Charts> {
    let records = self.derived_series(country, subdivision)?;
    Ok(Charts {
      cumulative: chart::cumulative_series(&records, metrics),
      new:        chart::new_series(&records, metrics),
    })
  }
}

/// Slice, correct and (for `"<all>"`) aggregate one selection.
fn corrected_series(
  snapshot: &Snapshot,
  country: &str,
  subdivision: &str,
) -> Result<Vec<DailyTotals>> {
  let mut entities = snapshot
    .entities(country)
    .ok_or_else(|| Error::unknown_country(country))?;

  if subdivision == ALL_SUBDIVISIONS {
    let corrected: Vec<Vec<Observation>> = entities.map(correct::correct).collect();
    return Ok(derive::aggregate(&corrected));
  }

  let rows = entities
    .find(|rows| rows[0].subdivision == subdivision)
    .ok_or_else(|| Error::unknown_subdivision(country, subdivision))?;
  Ok(correct::correct(rows).iter().map(DailyTotals::from).collect())
}
