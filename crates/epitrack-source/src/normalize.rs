//! CSV normalization into the canonical observation schema.
//!
//! Pure and synchronous; the loaders hand it a fully downloaded body. The
//! whole table is parsed before anything is returned, so a single bad cell
//! fails the load instead of producing a partial snapshot.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use epitrack_core::{ALL_SUBDIVISIONS, Counters, Observation, snapshot::Snapshot};

use crate::{Error, Result, columns::ColumnMap};

/// Accepted date layouts. Month-first layouts come before `%Y/%m/%d` and
/// two-digit years before four-digit ones, so `1/22/20` is never read as a
/// year-first date or as the year 20.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d"];

/// Header positions of the canonical fields.
struct Positions {
  country:     usize,
  subdivision: Option<usize>,
  latitude:    usize,
  longitude:   usize,
  date:        usize,
  confirmed:   usize,
  deaths:      usize,
  recovered:   usize,
}

/// Parse an upstream CSV table into a snapshot.
pub fn parse_csv<R: Read>(input: R, columns: &ColumnMap) -> Result<Snapshot> {
  let mut reader = ReaderBuilder::new()
    .trim(Trim::All)
    .flexible(true)
    .from_reader(input);

  let positions = locate(reader.headers()?, columns)?;

  let mut rows = Vec::new();
  for record in reader.records() {
    rows.push(parse_row(&record?, &positions, columns)?);
  }
  if rows.is_empty() {
    return Err(Error::Empty);
  }

  Ok(Snapshot::from_rows(rows))
}

fn locate(headers: &StringRecord, columns: &ColumnMap) -> Result<Positions> {
  let find = |name: &str| headers.iter().position(|h| h == name);

  let mut missing = Vec::new();
  let mut require = |name: &str| {
    find(name).unwrap_or_else(|| {
      missing.push(name.to_owned());
      0
    })
  };
  let positions = Positions {
    country:     require(columns.country.as_str()),
    subdivision: None,
    latitude:    require(columns.latitude.as_str()),
    longitude:   require(columns.longitude.as_str()),
    date:        require(columns.date.as_str()),
    confirmed:   require(columns.confirmed.as_str()),
    deaths:      require(columns.deaths.as_str()),
    recovered:   require(columns.recovered.as_str()),
  };

  if !missing.is_empty() {
    return Err(Error::Schema { missing });
  }
  Ok(Positions {
    subdivision: find(columns.subdivision.as_str()),
    ..positions
  })
}

fn parse_row(
  record: &StringRecord,
  at: &Positions,
  names: &ColumnMap,
) -> Result<Observation> {
  let line = record.position().map_or(0, |p| p.line());
  let cell = |i: usize| record.get(i).unwrap_or("");
  let invalid = |column: &str, i: usize| Error::InvalidRow {
    line,
    column: column.to_owned(),
    value: cell(i).to_owned(),
  };
  let count = |i: usize, column: &str| parse_count(cell(i)).ok_or_else(|| invalid(column, i));
  let coordinate =
    |i: usize, column: &str| parse_coordinate(cell(i)).ok_or_else(|| invalid(column, i));

  let country = cell(at.country);
  if country.is_empty() {
    return Err(invalid(&names.country, at.country));
  }
  let subdivision = at
    .subdivision
    .map(|i| cell(i))
    .filter(|s| !s.is_empty())
    .unwrap_or(ALL_SUBDIVISIONS);

  Ok(Observation {
    country:     country.to_owned(),
    subdivision: subdivision.to_owned(),
    latitude:    coordinate(at.latitude, &names.latitude)?,
    longitude:   coordinate(at.longitude, &names.longitude)?,
    date:        parse_date(cell(at.date)).ok_or_else(|| invalid(&names.date, at.date))?,
    cumulative:  Counters::new(
      count(at.confirmed, &names.confirmed)?,
      count(at.deaths, &names.deaths)?,
      count(at.recovered, &names.recovered)?,
    ),
  })
}

// ─── Cell parsers ────────────────────────────────────────────────────────────

/// Largest accepted counter value. Far above any real case count, and low
/// enough that summing millions of subdivisions stays inside `i64`.
pub const MAX_COUNT: i64 = 1_000_000_000_000;

/// A cumulative counter cell. Empty and `NaN` cells count as 0; decimals are
/// truncated; negatives and values above [`MAX_COUNT`] are rejected.
fn parse_count(cell: &str) -> Option<i64> {
  if cell.is_empty() {
    return Some(0);
  }
  if let Ok(n) = cell.parse::<i64>() {
    return (0..=MAX_COUNT).contains(&n).then_some(n);
  }
  let value: f64 = cell.parse().ok()?;
  if value.is_nan() {
    return Some(0);
  }
  if !(0.0..=MAX_COUNT as f64).contains(&value) {
    return None;
  }
  if value.fract() != 0.0 {
    tracing::debug!(cell, truncated = value.trunc(), "truncating fractional count");
  }
  Some(value.trunc() as i64)
}

fn parse_coordinate(cell: &str) -> Option<f64> {
  if cell.is_empty() {
    return Some(0.0);
  }
  let value: f64 = cell.parse().ok()?;
  if value.is_nan() { Some(0.0) } else { value.is_finite().then_some(value) }
}

/// Calendar date of a cell; a trailing time of day is ignored.
fn parse_date(cell: &str) -> Option<NaiveDate> {
  let date = cell.split([' ', 'T']).next()?;
  DATE_FORMATS
    .iter()
    .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
}
