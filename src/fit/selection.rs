//! Best-fit selection: one ideal function per training series, by SSE.
//!
//! For every training series the selector evaluates every ideal series over
//! the positions the two tables share and keeps the candidate with the
//! smallest sum of squared differences. The scan is exhaustive by design:
//! with 4 training series and 50 candidates there is nothing to prune.
//!
//! Selection rules:
//! 1. Join training and ideal rows on exact position equality (inner join);
//!    an empty join is a fatal input error.
//! 2. Per training series, compute SSE and max absolute deviation against
//!    every ideal series over the joined rows.
//! 3. Choose the strictly smallest SSE. Ties keep the first-seen candidate
//!    in the ideal table's native column order — this is a documented
//!    contract, not an accident: identical inputs must produce identical
//!    output, including tie-breaks.

use std::collections::HashMap;

use crate::domain::{SampleTable, Selection};
use crate::error::AppError;
use crate::fit::x_key;

/// Select the best ideal function for each training series.
///
/// Returns one [`Selection`] per training series, in the training table's
/// native series order. The recorded `max_dev` belongs to the winning ideal
/// series only (it is the basis of the mapping threshold later on).
///
/// Fails with an input error (exit code 3) when the two position columns
/// have no overlap; retrying with the same data cannot succeed.
pub fn select_ideal_functions(
    train: &SampleTable,
    ideal: &SampleTable,
) -> Result<Vec<Selection>, AppError> {
    let pairs = join_rows(train, ideal);
    if pairs.is_empty() {
        return Err(AppError::input(
            "No overlapping x-values between training and ideal datasets.",
        ));
    }

    let mut selected = Vec::with_capacity(train.series.len());
    for tseries in &train.series {
        let mut best: Option<Selection> = None;

        for iseries in &ideal.series {
            let mut sse = 0.0;
            let mut max_dev = 0.0_f64;
            for &(ti, ii) in &pairs {
                let diff = tseries.values[ti] - iseries.values[ii];
                sse += diff * diff;
                max_dev = max_dev.max(diff.abs());
            }

            // Strict `<` keeps the first-seen minimum on ties.
            let improves = match &best {
                None => true,
                Some(b) => sse < b.sse,
            };
            if improves {
                best = Some(Selection {
                    train_series: tseries.name.clone(),
                    ideal_series: iseries.name.clone(),
                    sse,
                    max_dev,
                });
            }
        }

        // `pairs` is non-empty and the ideal table always has series once it
        // passes shape validation, so a winner always exists.
        let best = best.ok_or_else(|| {
            AppError::input("Ideal dataset has no value series to select from.")
        })?;
        selected.push(best);
    }

    Ok(selected)
}

/// Inner join of two tables on exact position equality.
///
/// Returns `(train_row, ideal_row)` index pairs. Duplicate positions join
/// pairwise: every matching row combination participates, mirroring a
/// relational inner join.
fn join_rows(train: &SampleTable, ideal: &SampleTable) -> Vec<(usize, usize)> {
    let mut by_x: HashMap<u64, Vec<usize>> = HashMap::new();
    for (ii, &x) in ideal.x.iter().enumerate() {
        by_x.entry(x_key(x)).or_default().push(ii);
    }

    let mut pairs = Vec::new();
    for (ti, &x) in train.x.iter().enumerate() {
        if let Some(rows) = by_x.get(&x_key(x)) {
            for &ii in rows {
                pairs.push((ti, ii));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Series;

    fn table(x: &[f64], series: &[(&str, &[f64])]) -> SampleTable {
        SampleTable {
            x: x.to_vec(),
            series: series
                .iter()
                .map(|(name, values)| Series {
                    name: name.to_string(),
                    values: values.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn picks_exact_match_with_zero_sse() {
        let train = table(&[0.0, 1.0, 2.0], &[("y1", &[1.0, 2.0, 3.0])]);
        let ideal = table(
            &[0.0, 1.0, 2.0],
            &[
                ("f1", &[5.0, 5.0, 5.0]),
                ("f2", &[1.0, 2.0, 3.0]),
                ("f3", &[0.0, 0.0, 0.0]),
            ],
        );

        let sel = select_ideal_functions(&train, &ideal).unwrap();
        assert_eq!(sel.len(), 1);
        assert_eq!(sel[0].train_series, "y1");
        assert_eq!(sel[0].ideal_series, "f2");
        assert_eq!(sel[0].sse, 0.0);
        assert_eq!(sel[0].max_dev, 0.0);
    }

    #[test]
    fn one_selection_per_training_series_in_order() {
        let train = table(
            &[0.0, 1.0],
            &[
                ("y1", &[0.0, 0.0]),
                ("y2", &[10.0, 10.0]),
                ("y3", &[5.0, 5.0]),
                ("y4", &[-3.0, -3.0]),
            ],
        );
        let ideal = table(
            &[0.0, 1.0],
            &[
                ("f1", &[0.0, 0.0]),
                ("f2", &[10.0, 10.0]),
                ("f3", &[-3.0, -3.0]),
            ],
        );

        let sel = select_ideal_functions(&train, &ideal).unwrap();
        let trains: Vec<&str> = sel.iter().map(|s| s.train_series.as_str()).collect();
        assert_eq!(trains, ["y1", "y2", "y3", "y4"]);
        for s in &sel {
            assert!(s.sse >= 0.0);
            assert!(s.max_dev >= 0.0);
        }
        assert_eq!(sel[0].ideal_series, "f1");
        assert_eq!(sel[1].ideal_series, "f2");
        assert_eq!(sel[3].ideal_series, "f3");
    }

    #[test]
    fn tie_break_keeps_first_ideal_series() {
        // Two ideal series identical at all joined positions: the first in
        // native column order must win, every run.
        let train = table(&[0.0, 1.0], &[("y1", &[1.0, 1.0])]);
        let ideal = table(
            &[0.0, 1.0],
            &[("f1", &[1.5, 1.5]), ("f2", &[1.5, 1.5])],
        );

        for _ in 0..3 {
            let sel = select_ideal_functions(&train, &ideal).unwrap();
            assert_eq!(sel[0].ideal_series, "f1");
        }
    }

    #[test]
    fn deterministic_on_identical_inputs() {
        let train = table(&[0.0, 1.0, 2.0], &[("y1", &[0.1, 0.9, 2.2])]);
        let ideal = table(
            &[0.0, 1.0, 2.0],
            &[("f1", &[0.0, 1.0, 2.0]), ("f2", &[0.2, 0.8, 2.4])],
        );

        let a = select_ideal_functions(&train, &ideal).unwrap();
        let b = select_ideal_functions(&train, &ideal).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn no_overlap_is_an_input_error() {
        let train = table(&[0.0, 1.0], &[("y1", &[1.0, 2.0])]);
        let ideal = table(&[5.0, 6.0], &[("f1", &[1.0, 2.0])]);

        let err = select_ideal_functions(&train, &ideal).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn non_overlapping_rows_are_dropped() {
        // x=9 exists only in training; x=7 only in ideal. Neither contributes.
        let train = table(&[0.0, 9.0, 1.0], &[("y1", &[1.0, 100.0, 2.0])]);
        let ideal = table(
            &[0.0, 1.0, 7.0],
            &[("f1", &[1.0, 2.0, -50.0]), ("f2", &[0.0, 0.0, 100.0])],
        );

        let sel = select_ideal_functions(&train, &ideal).unwrap();
        assert_eq!(sel[0].ideal_series, "f1");
        assert_eq!(sel[0].sse, 0.0);
    }

    #[test]
    fn max_dev_belongs_to_the_winner_only() {
        // f2 wins on SSE; its max_dev (0.5) must be recorded, not f1's (3.0).
        let train = table(&[0.0, 1.0], &[("y1", &[0.0, 0.0])]);
        let ideal = table(
            &[0.0, 1.0],
            &[("f1", &[3.0, 0.0]), ("f2", &[0.5, 0.5])],
        );

        let sel = select_ideal_functions(&train, &ideal).unwrap();
        assert_eq!(sel[0].ideal_series, "f2");
        assert!((sel[0].max_dev - 0.5).abs() < 1e-12);
        assert!((sel[0].sse - 0.5).abs() < 1e-12);
    }
}
