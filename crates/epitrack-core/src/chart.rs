//! Per-metric chart series projected from derived records.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, derive::DerivedRecord};

/// Date label format shown on chart axes, e.g. `07 Apr 20`.
pub const DATE_LABEL_FORMAT: &str = "%d %b %y";

/// A selectable metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
  Confirmed,
  Deaths,
  Recovered,
  Active,
}

impl Metric {
  pub const ALL: [Metric; 4] =
    [Self::Confirmed, Self::Deaths, Self::Recovered, Self::Active];

  pub const DEFAULT_SELECTION: [Metric; 3] =
    [Self::Confirmed, Self::Deaths, Self::Active];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Confirmed => "confirmed",
      Self::Deaths => "deaths",
      Self::Recovered => "recovered",
      Self::Active => "active",
    }
  }

  fn cumulative(&self, r: &DerivedRecord) -> i64 {
    match self {
      Self::Confirmed => r.cum_confirmed,
      Self::Deaths => r.cum_deaths,
      Self::Recovered => r.cum_recovered,
      Self::Active => r.cum_active,
    }
  }

  /// Daily delta; active cases have none.
  fn daily(&self, r: &DerivedRecord) -> Option<i64> {
    match self {
      Self::Confirmed => Some(r.new_confirmed),
      Self::Deaths => Some(r.new_deaths),
      Self::Recovered => Some(r.new_recovered),
      Self::Active => None,
    }
  }
}

impl fmt::Display for Metric {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Metric {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| Error::UnknownMetric(s.to_owned()))
  }
}

/// Parse a comma-separated metric list, e.g. `confirmed,deaths`.
///
/// Duplicates are dropped; an empty list yields
/// [`Metric::DEFAULT_SELECTION`].
pub fn parse_metrics(list: &str) -> crate::Result<Vec<Metric>> {
  let mut metrics = Vec::new();
  for part in list.split(',').filter(|p| !p.trim().is_empty()) {
    let metric: Metric = part.parse()?;
    if !metrics.contains(&metric) {
      metrics.push(metric);
    }
  }
  if metrics.is_empty() {
    metrics.extend(Metric::DEFAULT_SELECTION);
  }
  Ok(metrics)
}

// ─── Series ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
  pub date:  NaiveDate,
  pub label: String,
  pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
  pub metric: Metric,
  pub points: Vec<ChartPoint>,
}

fn point(r: &DerivedRecord, value: i64) -> ChartPoint {
  ChartPoint {
    date: r.date,
    label: r.date.format(DATE_LABEL_FORMAT).to_string(),
    value,
  }
}

/// One series of cumulative values per selected metric.
pub fn cumulative_series(
  records: &[DerivedRecord],
  metrics: &[Metric],
) -> Vec<ChartSeries> {
  metrics
    .iter()
    .map(|&metric| ChartSeries {
      metric,
      points: records
        .iter()
        .map(|r| point(r, metric.cumulative(r)))
        .collect(),
    })
    .collect()
}

/// One series of daily deltas per selected metric; `Active` is skipped.
pub fn new_series(
  records: &[DerivedRecord],
  metrics: &[Metric],
) -> Vec<ChartSeries> {
  metrics
    .iter()
    .filter(|m| **m != Metric::Active)
    .map(|&metric| ChartSeries {
      metric,
      points: records
        .iter()
        .filter_map(|r| metric.daily(r).map(|v| point(r, v)))
        .collect(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    derive::{DailyTotals, derive},
    observation::Counters,
  };

  fn records() -> Vec<DerivedRecord> {
    let series = [(7, 10, 1, 2), (8, 15, 1, 4)].map(|(d, c, de, r)| DailyTotals {
      date:       NaiveDate::from_ymd_opt(2020, 4, d).unwrap(),
      cumulative: Counters::new(c, de, r),
    });
    derive(&series)
  }

  #[test]
  fn parses_metric_lists() {
    assert_eq!(parse_metrics("deaths, Active").unwrap(), vec![
      Metric::Deaths,
      Metric::Active
    ]);
    assert_eq!(parse_metrics("").unwrap(), Metric::DEFAULT_SELECTION.to_vec());
    assert_eq!(parse_metrics("deaths,deaths").unwrap(), vec![Metric::Deaths]);
    assert!(matches!(
      parse_metrics("confirmed,bogus"),
      Err(Error::UnknownMetric(m)) if m == "bogus"
    ));
  }

  #[test]
  fn cumulative_series_includes_active() {
    let series = cumulative_series(&records(), &[Metric::Confirmed, Metric::Active]);
    assert_eq!(series.len(), 2);
    assert_eq!(series[1].metric, Metric::Active);
    let values: Vec<i64> = series[1].points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![7, 10]);
    assert_eq!(series[0].points[0].label, "07 Apr 20");
  }

  #[test]
  fn new_series_skips_active() {
    let series = new_series(&records(), &[Metric::Active, Metric::Recovered]);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].metric, Metric::Recovered);
    let values: Vec<i64> = series[0].points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![0, 2]);
  }
}
