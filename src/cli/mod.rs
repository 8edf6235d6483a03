//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the selection/mapping code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "idealmap",
    version,
    about = "Ideal function selection and test-point mapping"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select ideal functions for the training data, map test points
    /// against them, then persist/report the results.
    Run(RunArgs),
    /// Generate a synthetic train/ideal/test dataset trio.
    Gen(GenArgs),
}

/// Options for the full pipeline.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Path to the training CSV (x + 4 value columns).
    #[arg(long, value_name = "CSV")]
    pub train: PathBuf,

    /// Path to the ideal functions CSV (x + 50 value columns).
    #[arg(long, value_name = "CSV")]
    pub ideal: PathBuf,

    /// Path to the test CSV (x + 1 or more value columns).
    #[arg(long, value_name = "CSV")]
    pub test: PathBuf,

    /// Output SQLite database path.
    #[arg(long, value_name = "DB")]
    pub db: Option<PathBuf>,

    /// Output HTML report path.
    #[arg(long, value_name = "HTML")]
    pub report: Option<PathBuf>,

    /// Tolerance multiplier applied to each selection's max deviation.
    #[arg(long = "sqrt-factor", default_value_t = std::f64::consts::SQRT_2)]
    pub sqrt_factor: f64,

    /// Name of the shared position column.
    #[arg(long = "x-col", default_value = "x")]
    pub x_col: String,

    /// Export mapped test points to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the selection summary to JSON.
    #[arg(long = "export-selections", value_name = "JSON")]
    pub export_selections: Option<PathBuf>,
}

/// Options for synthetic dataset generation.
#[derive(Debug, Parser, Clone)]
pub struct GenArgs {
    /// Output directory for train.csv / ideal.csv / test.csv.
    #[arg(long = "out-dir", value_name = "DIR", default_value = "data")]
    pub out_dir: PathBuf,

    /// Rows in the shared x grid.
    #[arg(long, default_value_t = 400)]
    pub rows: usize,

    /// Rows in the generated test table.
    #[arg(long = "test-rows", default_value_t = 100)]
    pub test_rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the training noise.
    #[arg(long, default_value_t = 0.25)]
    pub noise: f64,

    /// Probability that a test point is a far-off outlier.
    #[arg(long = "outlier-prob", default_value_t = 0.05)]
    pub outlier_prob: f64,
}
