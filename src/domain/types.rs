//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during selection and mapping
//! - exported to JSON/CSV and SQLite
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One named value column of a [`SampleTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// An in-memory tabular dataset: one shared position column `x` plus one or
/// more named value series, all of the same length.
///
/// Positions need not be unique or sorted. Tables are immutable once loaded;
/// no component mutates another's table.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    pub x: Vec<f64>,
    pub series: Vec<Series>,
}

impl SampleTable {
    /// Number of rows (length of the position column).
    pub fn n_rows(&self) -> usize {
        self.x.len()
    }

    /// Series names in native (column) order.
    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Look up a series by name.
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Which of the three datasets a CSV file is expected to be.
///
/// The role only drives validation (how many value columns the file must
/// have); the core components place no hard limit on counts themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    /// Training functions: exactly 4 value columns.
    Training,
    /// Ideal function library: exactly 50 value columns.
    Ideal,
    /// Test observations: 1 or more value columns.
    Test,
}

impl TableRole {
    /// Exact value-column count required by this role, if any.
    pub fn required_series(self) -> Option<usize> {
        match self {
            TableRole::Training => Some(4),
            TableRole::Ideal => Some(50),
            TableRole::Test => None,
        }
    }

    /// Human-readable label for error messages and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            TableRole::Training => "training",
            TableRole::Ideal => "ideal",
            TableRole::Test => "test",
        }
    }
}

/// The chosen ideal function for one training series, with fit-quality
/// metrics. Frozen after creation.
///
/// Invariants: `sse >= 0` and `max_dev >= 0`. No further relation between
/// the two is guaranteed (max over samples vs. sum of squares).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Name of the training series this selection is for.
    pub train_series: String,
    /// Name of the winning ideal series.
    pub ideal_series: String,
    /// Sum of squared differences over the joined positions.
    pub sse: f64,
    /// Maximum absolute difference at any joined position, for the winning
    /// ideal series only.
    pub max_dev: f64,
}

/// A test observation successfully classified against a selected ideal
/// function. `delta <= threshold` holds for every emitted record (exact
/// equality permitted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub x: f64,
    pub y: f64,
    /// Name of the test series the observation came from.
    pub test_series: String,
    /// Name of the ideal series the observation was assigned to.
    pub ideal_series: String,
    /// `|y - ideal value at x|` for the assigned selection.
    pub delta: f64,
    /// `max_dev of the assigned selection * sqrt_factor`.
    pub threshold: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub train_path: PathBuf,
    pub ideal_path: PathBuf,
    pub test_path: PathBuf,

    /// Optional SQLite output database.
    pub db_path: Option<PathBuf>,
    /// Optional HTML report output.
    pub report_path: Option<PathBuf>,

    /// Tolerance multiplier applied to each selection's max deviation.
    pub sqrt_factor: f64,
    /// Name of the shared position column.
    pub x_col: String,

    /// Export mapped test points to CSV.
    pub export_mappings: Option<PathBuf>,
    /// Export the selection summary to JSON.
    pub export_selections: Option<PathBuf>,
}
