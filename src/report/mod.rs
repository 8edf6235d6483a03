//! Reporting utilities: mapping statistics and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the selection/mapping code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

mod format;

pub use format::{format_mapping_summary, format_run_summary, format_selection_table};

use std::collections::HashMap;

use crate::domain::{MappingRecord, SampleTable};

/// Mapping outcome counts for one test series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesMappingStats {
    pub series: String,
    /// Observation rows carrying this series (every one is a candidate).
    pub tested: usize,
    /// Rows that ended up with a mapping record.
    pub mapped: usize,
}

/// Per-series mapping statistics, in the test table's native series order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingStats {
    pub per_series: Vec<SeriesMappingStats>,
}

impl MappingStats {
    pub fn total_mapped(&self) -> usize {
        self.per_series.iter().map(|s| s.mapped).sum()
    }

    pub fn total_tested(&self) -> usize {
        self.per_series.iter().map(|s| s.tested).sum()
    }

    /// Test series for which not a single point could be mapped.
    ///
    /// Per-point misses are routine; a fully unmapped series is worth a
    /// warning line in the summary.
    pub fn unmapped_series(&self) -> Vec<&str> {
        self.per_series
            .iter()
            .filter(|s| s.mapped == 0)
            .map(|s| s.series.as_str())
            .collect()
    }
}

/// Count mapping outcomes per test series.
pub fn compute_mapping_stats(test: &SampleTable, mappings: &[MappingRecord]) -> MappingStats {
    let mut mapped_by_series: HashMap<&str, usize> = HashMap::new();
    for m in mappings {
        *mapped_by_series.entry(m.test_series.as_str()).or_insert(0) += 1;
    }

    let per_series = test
        .series
        .iter()
        .map(|s| SeriesMappingStats {
            series: s.name.clone(),
            tested: test.n_rows(),
            mapped: mapped_by_series.get(s.name.as_str()).copied().unwrap_or(0),
        })
        .collect();

    MappingStats { per_series }
}
