//! Derived metrics computed from a corrected cumulative series.
//!
//! Steps, in order:
//!
//! 1. [`aggregate`] sums already-corrected entity series by date when the
//!    selection covers every subdivision of a country.
//! 2. [`derive`] keeps the most recent [`WINDOW_DAYS`] days,
//! 3. differences each counter day over day (first day of the window is 0),
//! 4. computes active cases, mortality rates and day-over-day growth,
//! 5. and drops pre-outbreak rows where every counter is still zero.
//!
//! Percentages are rounded to one decimal. A zero denominator yields `None`,
//! never `0.0`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::observation::{Counters, Observation};

/// Number of trailing days a derived series covers.
pub const WINDOW_DAYS: usize = 14;

// ─── Types ───────────────────────────────────────────────────────────────────

/// One date of a single cumulative series, either one entity's or a country
/// total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTotals {
  pub date:       NaiveDate,
  pub cumulative: Counters,
}

impl From<&Observation> for DailyTotals {
  fn from(o: &Observation) -> Self {
    Self {
      date:       o.date,
      cumulative: o.cumulative,
    }
  }
}

/// The per-date metrics served to the presentation layer. Never stored;
/// recomputed on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
  pub date:                     NaiveDate,
  pub cum_confirmed:            i64,
  pub cum_deaths:               i64,
  pub cum_recovered:            i64,
  /// `cum_confirmed - cum_deaths - cum_recovered`.
  pub cum_active:               i64,
  pub new_confirmed:            i64,
  pub new_deaths:               i64,
  pub new_recovered:            i64,
  /// Deaths per confirmed case, in percent.
  pub mortality_rate_infection: Option<f64>,
  /// Deaths per closed (dead or recovered) case, in percent.
  pub mortality_rate_closed:    Option<f64>,
  /// Next day's new confirmed cases relative to today's cumulative total, in
  /// percent. Undefined for the last record.
  pub day_over_day_growth_pct:  Option<f64>,
}

impl DerivedRecord {
  fn is_pre_outbreak(&self) -> bool {
    self.cum_confirmed == 0
      && self.cum_deaths == 0
      && self.cum_recovered == 0
      && self.new_confirmed == 0
      && self.new_deaths == 0
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Sum corrected entity series into one series per date.
///
/// Dates are the union over all entities. An entity missing a date after its
/// first observation contributes its last known cumulative value, since a
/// running total does not vanish when a report is skipped.
pub fn aggregate<S>(entities: &[S]) -> Vec<DailyTotals>
where
  S: AsRef<[Observation]>,
{
  let mut totals: BTreeMap<NaiveDate, Counters> = BTreeMap::new();
  for entity in entities {
    for o in entity.as_ref() {
      totals.entry(o.date).or_default();
    }
  }

  for entity in entities {
    let mut rows = entity.as_ref().iter().peekable();
    let mut last: Option<Counters> = None;
    for (date, total) in totals.iter_mut() {
      if let Some(o) = rows.next_if(|o| o.date == *date) {
        last = Some(o.cumulative);
      }
      if let Some(value) = last {
        *total += value;
      }
    }
  }

  totals
    .into_iter()
    .map(|(date, cumulative)| DailyTotals { date, cumulative })
    .collect()
}

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Derive the displayed records from a corrected, date-ordered series.
pub fn derive(series: &[DailyTotals]) -> Vec<DerivedRecord> {
  let window = &series[series.len().saturating_sub(WINDOW_DAYS)..];

  let mut records: Vec<DerivedRecord> = window
    .iter()
    .enumerate()
    .map(|(i, day)| {
      let delta = match i {
        0 => Counters::default(),
        _ => day.cumulative - window[i - 1].cumulative,
      };
      let cum = day.cumulative;
      DerivedRecord {
        date:                     day.date,
        cum_confirmed:            cum.confirmed,
        cum_deaths:               cum.deaths,
        cum_recovered:            cum.recovered,
        cum_active:               cum.active(),
        new_confirmed:            delta.confirmed,
        new_deaths:               delta.deaths,
        new_recovered:            delta.recovered,
        mortality_rate_infection: percentage(cum.deaths, cum.confirmed),
        mortality_rate_closed:    percentage(cum.deaths, cum.closed()),
        day_over_day_growth_pct:  None,
      }
    })
    .collect();

  for i in 1..records.len() {
    records[i - 1].day_over_day_growth_pct =
      percentage(records[i].new_confirmed, records[i - 1].cum_confirmed);
  }

  records.retain(|r| !r.is_pre_outbreak());
  records
}

/// `numerator / denominator` in percent, rounded to one decimal.
pub fn percentage(numerator: i64, denominator: i64) -> Option<f64> {
  if denominator == 0 {
    return None;
  }
  let pct = numerator as f64 / denominator as f64 * 100.0;
  Some((pct * 10.0).round() / 10.0)
}
