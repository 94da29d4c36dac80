//! The canonical shape of one normalized upstream row.
//!
//! One observation exists per (country, subdivision, date). Counters are
//! cumulative running totals as reported upstream; they are not guaranteed to
//! be non-decreasing until they have passed through [`crate::correct`].

use std::ops::{Add, AddAssign, Sub};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Subdivision sentinel for rows without finer granularity, and the selection
/// value meaning "every subdivision of the country, summed".
pub const ALL_SUBDIVISIONS: &str = "<all>";

// ─── Counters ────────────────────────────────────────────────────────────────

/// The three case counters tracked per row. Arithmetic saturates at the
/// `i64` bounds.
///
/// On an [`Observation`] these are cumulative totals; the same type also
/// carries day-over-day deltas once a series has been differenced.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize,
)]
pub struct Counters {
  pub confirmed: i64,
  pub deaths:    i64,
  pub recovered: i64,
}

impl Counters {
  pub const fn new(confirmed: i64, deaths: i64, recovered: i64) -> Self {
    Self {
      confirmed,
      deaths,
      recovered,
    }
  }

  /// Cases neither closed by death nor by recovery.
  pub fn active(&self) -> i64 {
    self
      .confirmed
      .saturating_sub(self.deaths)
      .saturating_sub(self.recovered)
  }

  /// Cases closed by death or by recovery.
  pub fn closed(&self) -> i64 { self.deaths.saturating_add(self.recovered) }
}

impl Add for Counters {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    Self {
      confirmed: self.confirmed.saturating_add(rhs.confirmed),
      deaths:    self.deaths.saturating_add(rhs.deaths),
      recovered: self.recovered.saturating_add(rhs.recovered),
    }
  }
}

impl AddAssign for Counters {
  fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl Sub for Counters {
  type Output = Self;

  fn sub(self, rhs: Self) -> Self {
    Self {
      confirmed: self.confirmed.saturating_sub(rhs.confirmed),
      deaths:    self.deaths.saturating_sub(rhs.deaths),
      recovered: self.recovered.saturating_sub(rhs.recovered),
    }
  }
}

// ─── Observation ─────────────────────────────────────────────────────────────

/// One upstream row after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
  pub country:     String,
  /// [`ALL_SUBDIVISIONS`] when the upstream row has no finer granularity.
  pub subdivision: String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub date:        NaiveDate,
  pub cumulative:  Counters,
}

impl Observation {
  /// Whether two rows belong to the same (country, subdivision) series.
  pub fn same_entity(&self, other: &Observation) -> bool {
    self.country == other.country && self.subdivision == other.subdivision
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn arithmetic_saturates_instead_of_overflowing() {
    let huge = Counters::new(5_000_000_000_000_000_000, i64::MAX, 1);
    let sum = huge + huge;
    assert_eq!(sum, Counters::new(i64::MAX, i64::MAX, 2));

    let diff = Counters::new(i64::MIN + 1, 0, 0) - Counters::new(5, 0, 0);
    assert_eq!(diff.confirmed, i64::MIN);
  }

  #[test]
  fn active_and_closed_saturate() {
    let c = Counters::new(10, i64::MAX, i64::MAX);
    assert_eq!(c.closed(), i64::MAX);
    assert_eq!(c.active(), i64::MIN);
    assert_eq!(Counters::new(10, 2, 3).active(), 5);
    assert_eq!(Counters::new(10, 2, 3).closed(), 5);
  }
}
