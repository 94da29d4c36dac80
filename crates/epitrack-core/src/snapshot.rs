//! One complete, immutable copy of the normalized upstream table.
//!
//! A snapshot is built wholesale by a loader and never mutated afterwards.
//! Rows are kept sorted by (country, subdivision, date) so that every country
//! and every entity within it occupies a contiguous slice.

use std::{collections::BTreeMap, ops::Range};

use chrono::{DateTime, Utc};

use crate::observation::Observation;

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
  rows:       Vec<Observation>,
  /// Sorted, distinct country names.
  countries:  Vec<String>,
  index:      BTreeMap<String, Range<usize>>,
  generation: u64,
  loaded_at:  Option<DateTime<Utc>>,
}

impl Snapshot {
  /// The placeholder served before the first successful load.
  pub fn empty() -> Self { Self::default() }

  /// Build a snapshot from normalized rows in any order.
  ///
  /// Rows sharing a (country, subdivision, date) key collapse to the one that
  /// appeared last in `rows`.
  pub fn from_rows(mut rows: Vec<Observation>) -> Self {
    // Stable sort keeps file order among duplicates, so the last one wins.
    rows.sort_by(|a, b| {
      (&a.country, &a.subdivision, a.date).cmp(&(&b.country, &b.subdivision, b.date))
    });

    let before = rows.len();
    let mut deduped: Vec<Observation> = Vec::with_capacity(before);
    for row in rows {
      match deduped.last_mut() {
        Some(prev) if prev.same_entity(&row) && prev.date == row.date => *prev = row,
        _ => deduped.push(row),
      }
    }
    let duplicates = before - deduped.len();
    if duplicates > 0 {
      tracing::warn!(duplicates, "collapsed duplicate upstream rows");
    }

    let mut index = BTreeMap::new();
    let mut start = 0;
    for (country, group) in deduped
      .chunk_by(|a, b| a.country == b.country)
      .map(|g| (g[0].country.clone(), g.len()))
    {
      index.insert(country, start..start + group);
      start += group;
    }
    let countries = index.keys().cloned().collect();

    Self {
      rows: deduped,
      countries,
      index,
      generation: 0,
      loaded_at: None,
    }
  }

  pub(crate) fn stamp(&mut self, generation: u64, loaded_at: DateTime<Utc>) {
    self.generation = generation;
    self.loaded_at = Some(loaded_at);
  }

  pub fn rows(&self) -> &[Observation] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub fn countries(&self) -> &[String] { &self.countries }

  /// Publish counter assigned by the store; `0` for a never-published
  /// snapshot.
  pub fn generation(&self) -> u64 { self.generation }

  pub fn loaded_at(&self) -> Option<DateTime<Utc>> { self.loaded_at }

  /// All rows for `country`, or `None` if the country is absent.
  pub fn country_rows(&self, country: &str) -> Option<&[Observation]> {
    self.index.get(country).map(|r| &self.rows[r.clone()])
  }

  /// The date-ordered series of every entity of `country`, one slice per
  /// subdivision in subdivision order.
  pub fn entities(
    &self,
    country: &str,
  ) -> Option<impl Iterator<Item = &[Observation]>> {
    self
      .country_rows(country)
      .map(|rows| rows.chunk_by(|a, b| a.subdivision == b.subdivision))
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::observation::{ALL_SUBDIVISIONS, Counters};

  fn row(country: &str, subdivision: &str, day: u32, confirmed: i64) -> Observation {
    Observation {
      country:     country.into(),
      subdivision: subdivision.into(),
      latitude:    0.0,
      longitude:   0.0,
      date:        NaiveDate::from_ymd_opt(2020, 4, day).unwrap(),
      cumulative:  Counters::new(confirmed, 0, 0),
    }
  }

  #[test]
  fn countries_are_sorted_and_distinct() {
    let snapshot = Snapshot::from_rows(vec![
      row("Spain", ALL_SUBDIVISIONS, 1, 1),
      row("Egypt", ALL_SUBDIVISIONS, 2, 1),
      row("Egypt", ALL_SUBDIVISIONS, 1, 1),
      row("Chad", ALL_SUBDIVISIONS, 1, 1),
    ]);
    assert_eq!(snapshot.countries(), ["Chad", "Egypt", "Spain"]);
    assert_eq!(snapshot.country_rows("Egypt").unwrap().len(), 2);
    assert!(snapshot.country_rows("Peru").is_none());
  }

  #[test]
  fn rows_are_ordered_by_entity_then_date() {
    let snapshot = Snapshot::from_rows(vec![
      row("X", "B", 2, 4),
      row("X", "A", 2, 2),
      row("X", "B", 1, 3),
      row("X", "A", 1, 1),
    ]);
    let entities: Vec<Vec<i64>> = snapshot
      .entities("X")
      .unwrap()
      .map(|e| e.iter().map(|o| o.cumulative.confirmed).collect())
      .collect();
    assert_eq!(entities, vec![vec![1, 2], vec![3, 4]]);
  }

  #[test]
  fn duplicate_rows_keep_the_last_occurrence() {
    let snapshot = Snapshot::from_rows(vec![
      row("X", ALL_SUBDIVISIONS, 1, 10),
      row("X", ALL_SUBDIVISIONS, 1, 12),
      row("X", ALL_SUBDIVISIONS, 2, 15),
    ]);
    let confirmed: Vec<i64> =
      snapshot.rows().iter().map(|o| o.cumulative.confirmed).collect();
    assert_eq!(confirmed, vec![12, 15]);
  }

  #[test]
  fn empty_snapshot_has_no_countries() {
    let snapshot = Snapshot::empty();
    assert!(snapshot.is_empty());
    assert!(snapshot.countries().is_empty());
    assert_eq!(snapshot.generation(), 0);
    assert!(snapshot.loaded_at().is_none());
  }
}
