//! Tolerance mapping: classify test observations against selected ideals.
//!
//! Each test value is compared to every selected ideal function at the same
//! position. A selection qualifies when the absolute deviation stays within
//! `max_dev * sqrt_factor`; among qualifying selections the smallest
//! deviation wins, first-seen on ties (same determinism contract as the
//! selector).
//!
//! Two anomalies are absorbed into the output shape rather than raised:
//!
//! - a test position absent from the ideal table skips the whole row
//! - a value outside every threshold emits no record
//!
//! Both are expected, non-exceptional outcomes. Whether "zero mapped points
//! for an entire test series" deserves a warning is the report layer's call.

use std::collections::HashMap;

use crate::domain::{MappingRecord, SampleTable, Selection};
use crate::error::AppError;
use crate::fit::x_key;

/// Map test observations onto selected ideal functions.
///
/// Records come out in (test row, test series) order. `sqrt_factor` must be
/// finite and positive; the conventional value is `sqrt(2)`.
pub fn map_test_points(
    test: &SampleTable,
    ideal: &SampleTable,
    selected: &[Selection],
    sqrt_factor: f64,
) -> Result<Vec<MappingRecord>, AppError> {
    if !(sqrt_factor.is_finite() && sqrt_factor > 0.0) {
        return Err(AppError::data_shape(
            "Tolerance factor must be finite and > 0.",
        ));
    }

    // Resolve each selection's ideal series once up front.
    let mut resolved = Vec::with_capacity(selected.len());
    for sel in selected {
        let series = ideal.series(&sel.ideal_series).ok_or_else(|| {
            AppError::input(format!(
                "Selected ideal series '{}' not found in ideal dataset.",
                sel.ideal_series
            ))
        })?;
        resolved.push((sel, series));
    }

    // First occurrence wins when the ideal table repeats a position.
    let mut ideal_row_at: HashMap<u64, usize> = HashMap::new();
    for (ii, &x) in ideal.x.iter().enumerate() {
        ideal_row_at.entry(x_key(x)).or_insert(ii);
    }

    let mut records = Vec::new();
    for (row, &x) in test.x.iter().enumerate() {
        let Some(&ideal_row) = ideal_row_at.get(&x_key(x)) else {
            // Position unknown to the ideal table: nothing to compare
            // against, so the whole row is silently skipped.
            continue;
        };

        for tseries in &test.series {
            let y = tseries.values[row];
            let mut best: Option<MappingRecord> = None;

            for (sel, iseries) in &resolved {
                let delta = (y - iseries.values[ideal_row]).abs();
                let threshold = sel.max_dev * sqrt_factor;
                if delta > threshold {
                    continue;
                }

                // Strict `<` keeps the first-seen selection on ties.
                let improves = match &best {
                    None => true,
                    Some(b) => delta < b.delta,
                };
                if improves {
                    best = Some(MappingRecord {
                        x,
                        y,
                        test_series: tseries.name.clone(),
                        ideal_series: sel.ideal_series.clone(),
                        delta,
                        threshold,
                    });
                }
            }

            if let Some(record) = best {
                records.push(record);
            }
        }
    }

    Ok(records)
}
