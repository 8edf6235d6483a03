//! Formatted terminal output for the run summary and result tables.

use crate::domain::{RunConfig, Selection};
use crate::io::ingest::IngestedTable;
use crate::report::MappingStats;

/// Format the full run summary (dataset stats + configuration).
pub fn format_run_summary(
    train: &IngestedTable,
    ideal: &IngestedTable,
    test: &IngestedTable,
    config: &RunConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== idealmap - Ideal Function Selection & Mapping ===\n");
    out.push_str(&format!("Tolerance factor: {:.6}\n", config.sqrt_factor));
    for ing in [train, ideal, test] {
        out.push_str(&format!(
            "{:<9} rows={} used={} series={}",
            ing.role.display_name(),
            ing.rows_read,
            ing.rows_used,
            ing.table.series.len()
        ));
        if !ing.row_errors.is_empty() {
            out.push_str(&format!(" (skipped {} bad rows)", ing.row_errors.len()));
        }
        out.push('\n');
    }

    out
}

/// Format the selection table (one row per training series).
pub fn format_selection_table(selections: &[Selection]) -> String {
    let mut out = String::new();

    out.push_str("Selected ideal functions:\n");
    out.push_str(&format!(
        "{:<18} {:<16} {:>14} {:>14}\n",
        "training_function", "ideal_function", "sse", "max_deviation"
    ));
    out.push_str(&format!(
        "{:-<18} {:-<16} {:-<14} {:-<14}\n",
        "", "", "", ""
    ));
    for s in selections {
        out.push_str(&format!(
            "{:<18} {:<16} {:>14.6} {:>14.6}\n",
            truncate(&s.train_series, 18),
            truncate(&s.ideal_series, 16),
            s.sse,
            s.max_dev
        ));
    }

    out
}

/// Format per-series mapping counts, with a warning line for any test
/// series that mapped zero points.
pub fn format_mapping_summary(stats: &MappingStats, sqrt_factor: f64) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Mapped {} of {} test values (threshold = max_deviation x {:.6}):\n",
        stats.total_mapped(),
        stats.total_tested(),
        sqrt_factor
    ));
    for s in &stats.per_series {
        out.push_str(&format!(
            "- {:<16} {:>6} / {}\n",
            truncate(&s.series, 16),
            s.mapped,
            s.tested
        ));
    }
    for series in stats.unmapped_series() {
        out.push_str(&format!(
            "warning: no test points could be mapped for series '{series}'\n"
        ));
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
