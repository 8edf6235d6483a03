//! Shared pipeline logic behind the `run` subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load CSVs -> select ideal functions -> map test points -> stats
//!
//! The CLI layer then focuses on presentation and optional outputs
//! (SQLite, HTML report, CSV/JSON exports).

use crate::domain::{MappingRecord, RunConfig, Selection, TableRole};
use crate::error::AppError;
use crate::fit::{map_test_points, select_ideal_functions};
use crate::io::ingest::{load_sample_table, IngestedTable};
use crate::report::{compute_mapping_stats, MappingStats};

/// All computed outputs of a single `idealmap run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub train: IngestedTable,
    pub ideal: IngestedTable,
    pub test: IngestedTable,
    pub selections: Vec<Selection>,
    pub mappings: Vec<MappingRecord>,
    pub stats: MappingStats,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_assignment(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Load and validate the three datasets. Shape violations surface
    // here, before the core ever runs.
    let train = load_sample_table(&config.train_path, TableRole::Training, &config.x_col)?;
    let ideal = load_sample_table(&config.ideal_path, TableRole::Ideal, &config.x_col)?;
    let test = load_sample_table(&config.test_path, TableRole::Test, &config.x_col)?;

    // 2) Select the best ideal function per training series.
    let selections = select_ideal_functions(&train.table, &ideal.table)?;

    // 3) Map test points against the selections.
    let mappings = map_test_points(&test.table, &ideal.table, &selections, config.sqrt_factor)?;

    // 4) Summarize mapping outcomes per test series.
    let stats = compute_mapping_stats(&test.table, &mappings);

    Ok(RunOutput {
        train,
        ideal,
        test,
        selections,
        mappings,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{write_datasets, GenConfig};

    #[test]
    fn pipeline_runs_end_to_end_on_generated_data() {
        let out_dir = std::env::temp_dir().join(format!("ideal-map-pipeline-{}", std::process::id()));
        let [train_path, ideal_path, test_path] = write_datasets(&GenConfig {
            out_dir: out_dir.clone(),
            rows: 120,
            test_rows: 40,
            seed: 7,
            noise_sigma: 0.05,
            outlier_prob: 0.1,
        })
        .unwrap();

        let config = RunConfig {
            train_path,
            ideal_path,
            test_path,
            db_path: None,
            report_path: None,
            sqrt_factor: std::f64::consts::SQRT_2,
            x_col: "x".to_string(),
            export_mappings: None,
            export_selections: None,
        };

        let run = run_assignment(&config).unwrap();
        std::fs::remove_dir_all(&out_dir).ok();

        assert_eq!(run.selections.len(), 4);
        assert_eq!(run.train.table.series.len(), 4);
        assert_eq!(run.ideal.table.series.len(), 50);
        for m in &run.mappings {
            assert!(m.delta <= m.threshold + 1e-12);
        }
        // Low-noise generated data: most non-outlier points should map.
        assert!(run.stats.total_mapped() > 0);
    }
}
