//! Monotonicity repair for cumulative counters.
//!
//! Upstream occasionally revises a cumulative total downwards. A decrease is
//! never valid for a running total, so each counter is scanned in date order
//! and any value below its corrected predecessor is replaced by that
//! predecessor (forward fill). The first row of a series is left untouched.

use crate::observation::{Counters, Observation};

/// Return a corrected copy of one entity's date-ordered series.
pub fn correct(rows: &[Observation]) -> Vec<Observation> {
  let mut corrected = rows.to_vec();
  correct_in_place(&mut corrected);
  corrected
}

/// Correct one entity's date-ordered series in place.
///
/// Returns the number of counter cells that were replaced.
pub fn correct_in_place(rows: &mut [Observation]) -> usize {
  let mut rows = rows.iter_mut();
  let Some(first) = rows.next() else {
    return 0;
  };

  let mut prev = first.cumulative;
  let mut replaced = 0;
  for row in rows {
    replaced += forward_fill(&mut row.cumulative, prev);
    prev = row.cumulative;
  }
  replaced
}

fn forward_fill(current: &mut Counters, prev: Counters) -> usize {
  let mut replaced = 0;
  for (value, floor) in [
    (&mut current.confirmed, prev.confirmed),
    (&mut current.deaths, prev.deaths),
    (&mut current.recovered, prev.recovered),
  ] {
    if *value < floor {
      *value = floor;
      replaced += 1;
    }
  }
  replaced
}

#[cfg(test)]
mod tests {
  use chrono::{Days, NaiveDate};

  use super::*;
  use crate::observation::ALL_SUBDIVISIONS;

  fn series(counters: &[(i64, i64, i64)]) -> Vec<Observation> {
    let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
    counters
      .iter()
      .enumerate()
      .map(|(i, &(c, d, r))| Observation {
        country:     "Egypt".into(),
        subdivision: ALL_SUBDIVISIONS.into(),
        latitude:    26.0,
        longitude:   30.0,
        date:        start + Days::new(i as u64),
        cumulative:  Counters::new(c, d, r),
      })
      .collect()
  }

  fn confirmed(rows: &[Observation]) -> Vec<i64> {
    rows.iter().map(|o| o.cumulative.confirmed).collect()
  }

  fn is_non_decreasing(rows: &[Observation]) -> bool {
    rows.windows(2).all(|w| {
      let (a, b) = (w[0].cumulative, w[1].cumulative);
      a.confirmed <= b.confirmed && a.deaths <= b.deaths && a.recovered <= b.recovered
    })
  }

  #[test]
  fn dip_is_forward_filled() {
    let rows = series(&[(100, 0, 0), (90, 0, 0), (120, 0, 0)]);
    assert_eq!(confirmed(&correct(&rows)), vec![100, 100, 120]);
  }

  #[test]
  fn consecutive_dips_fill_from_corrected_predecessor() {
    let rows = series(&[(50, 0, 0), (40, 0, 0), (45, 0, 0), (60, 0, 0)]);
    assert_eq!(confirmed(&correct(&rows)), vec![50, 50, 50, 60]);
  }

  #[test]
  fn counters_are_corrected_independently() {
    let rows = series(&[(10, 5, 2), (12, 4, 1), (11, 6, 3)]);
    let fixed: Vec<Counters> = correct(&rows).iter().map(|o| o.cumulative).collect();
    assert_eq!(fixed, vec![
      Counters::new(10, 5, 2),
      Counters::new(12, 5, 2),
      Counters::new(12, 6, 3),
    ]);
  }

  #[test]
  fn first_row_is_never_corrected() {
    let rows = series(&[(500, 9, 9), (1, 1, 1)]);
    let fixed = correct(&rows);
    assert_eq!(fixed[0], rows[0]);
    assert_eq!(fixed[1].cumulative, Counters::new(500, 9, 9));
  }

  #[test]
  fn replaced_cells_are_counted() {
    let mut rows = series(&[(10, 5, 2), (12, 4, 1), (11, 6, 3)]);
    assert_eq!(correct_in_place(&mut rows), 3);
    assert_eq!(correct_in_place(&mut rows), 0);
  }

  #[test]
  fn empty_and_single_row_series_are_unchanged() {
    assert!(correct(&[]).is_empty());
    let one = series(&[(3, 2, 1)]);
    assert_eq!(correct(&one), one);
  }

  #[test]
  fn output_is_non_decreasing_and_idempotent() {
    let cases: &[&[(i64, i64, i64)]] = &[
      &[(0, 0, 0), (5, 1, 0), (3, 0, 2), (8, 2, 1), (8, 1, 1), (2, 0, 0)],
      &[(9, 9, 9), (8, 8, 8), (7, 7, 7)],
      &[(1, 0, 0), (2, 0, 0), (3, 1, 0), (4, 1, 1)],
      &[(100, 3, 40), (90, 3, 45), (120, 2, 44), (119, 4, 50), (130, 4, 49)],
    ];
    for case in cases {
      let once = correct(&series(case));
      assert!(is_non_decreasing(&once), "not monotone for {case:?}");
      assert_eq!(correct(&once), once, "not idempotent for {case:?}");
    }
  }
}
