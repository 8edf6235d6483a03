//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the load/select/map pipeline
//! - prints the run summary and result tables
//! - writes optional outputs (SQLite, HTML report, CSV/JSON exports)

use clap::Parser;

use crate::cli::{Cli, Command, GenArgs, RunArgs};
use crate::data::GenConfig;
use crate::db::Database;
use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `idealmap` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Gen(args) => handle_gen(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_assignment(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.train, &run.ideal, &run.test, &config)
    );
    println!("{}", crate::report::format_selection_table(&run.selections));
    println!(
        "{}",
        crate::report::format_mapping_summary(&run.stats, config.sqrt_factor)
    );

    if let Some(path) = &config.db_path {
        ensure_parent_dir(path)?;
        let mut db = Database::open(path)?;
        db.write_sample_table("training_data", &run.train.table, &config.x_col)?;
        db.write_sample_table("ideal_functions", &run.ideal.table, &config.x_col)?;
        db.write_selections(&run.selections)?;
        db.write_mappings(&run.mappings)?;
        println!("SQLite database written to: {}", path.display());
    }

    if let Some(path) = &config.report_path {
        ensure_parent_dir(path)?;
        crate::plot::write_html_report(
            path,
            &run.train.table,
            &run.ideal.table,
            &run.selections,
            &run.mappings,
        )?;
        println!("HTML report written to: {}", path.display());
    }

    if let Some(path) = &config.export_mappings {
        ensure_parent_dir(path)?;
        crate::io::export::write_mappings_csv(path, &run.mappings)?;
        println!("Mapped points exported to: {}", path.display());
    }
    if let Some(path) = &config.export_selections {
        ensure_parent_dir(path)?;
        crate::io::export::write_selections_json(path, &run.selections)?;
        println!("Selections exported to: {}", path.display());
    }

    Ok(())
}

fn handle_gen(args: GenArgs) -> Result<(), AppError> {
    let config = GenConfig {
        out_dir: args.out_dir,
        rows: args.rows,
        test_rows: args.test_rows,
        seed: args.seed,
        noise_sigma: args.noise,
        outlier_prob: args.outlier_prob,
    };
    let paths = crate::data::write_datasets(&config)?;
    for path in paths {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        train_path: args.train.clone(),
        ideal_path: args.ideal.clone(),
        test_path: args.test.clone(),
        db_path: args.db.clone(),
        report_path: args.report.clone(),
        sqrt_factor: args.sqrt_factor,
        x_col: args.x_col.clone(),
        export_mappings: args.export.clone(),
        export_selections: args.export_selections.clone(),
    }
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<(), AppError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|e| {
        AppError::data_shape(format!(
            "Failed to create output directory '{}': {e}",
            parent.display()
        ))
    })
}
