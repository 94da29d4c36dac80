//! Headline figures for the latest day of a derived series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::derive::DerivedRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
  pub as_of:                     NaiveDate,
  pub cum_confirmed:             i64,
  pub cum_deaths:                i64,
  pub cum_recovered:             i64,
  pub cum_active:                i64,
  pub new_confirmed:             i64,
  pub mortality_rate_infection:  Option<f64>,
  pub mortality_rate_closed:     Option<f64>,
  /// Today's new cases relative to yesterday's cumulative total, in percent.
  pub growth_from_yesterday_pct: Option<f64>,
}

/// Summarize the last record of `records`; `None` for an empty series.
pub fn summarize(records: &[DerivedRecord]) -> Option<Summary> {
  let latest = records.last()?;
  // The growth stored on a record looks one day ahead, so yesterday's record
  // holds the figure for today.
  let growth = records
    .len()
    .checked_sub(2)
    .and_then(|i| records[i].day_over_day_growth_pct);

  Some(Summary {
    as_of:                     latest.date,
    cum_confirmed:             latest.cum_confirmed,
    cum_deaths:                latest.cum_deaths,
    cum_recovered:             latest.cum_recovered,
    cum_active:                latest.cum_active,
    new_confirmed:             latest.new_confirmed,
    mortality_rate_infection:  latest.mortality_rate_infection,
    mortality_rate_closed:     latest.mortality_rate_closed,
    growth_from_yesterday_pct: growth,
  })
}
