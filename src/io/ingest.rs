//! CSV ingest and validation.
//!
//! This module turns the three input CSVs (training, ideal library, test)
//! into clean in-memory [`SampleTable`]s that are safe to hand to the core.
//!
//! Design goals:
//! - **Strict schema** for structure (x column present, role column counts)
//!   with clear errors + exit code 2
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (column order preserved as written)
//! - **Separation of concerns**: no selection/mapping logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{SampleTable, Series, TableRole};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the validated table + bookkeeping about skipped rows.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: SampleTable,
    pub role: TableRole,
    pub rows_read: usize,
    pub rows_used: usize,
    pub row_errors: Vec<RowError>,
}

/// Load and validate a CSV file as a [`SampleTable`] for the given role.
pub fn load_sample_table(path: &Path, role: TableRole, x_col: &str) -> Result<IngestedTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::data_shape(format!(
            "Failed to open {} CSV '{}': {e}",
            role.display_name(),
            path.display()
        ))
    })?;
    read_sample_table(file, role, x_col, &path.display().to_string())
}

/// Read and validate a [`SampleTable`] from any reader.
///
/// Structural violations (missing x column, wrong value-column count,
/// duplicate headers) fail with exit code 2 before any row is parsed. Rows
/// containing unparsable or non-finite cells are skipped and recorded; a
/// table with zero usable rows fails with exit code 3.
pub fn read_sample_table<R: Read>(
    reader: R,
    role: TableRole,
    x_col: &str,
    source: &str,
) -> Result<IngestedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data_shape(format!("Failed to read CSV headers in '{source}': {e}")))?
        .clone();

    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let x_col = normalize_header_name(x_col);

    let x_idx = names.iter().position(|n| *n == x_col).ok_or_else(|| {
        AppError::data_shape(format!(
            "Missing required x column '{x_col}' in {} CSV '{source}'.",
            role.display_name()
        ))
    })?;

    for (i, name) in names.iter().enumerate() {
        if name.is_empty() {
            return Err(AppError::data_shape(format!(
                "Empty column header (position {}) in '{source}'.",
                i + 1
            )));
        }
        if names[..i].contains(name) {
            return Err(AppError::data_shape(format!(
                "Duplicate column '{name}' in '{source}'."
            )));
        }
    }

    // Value columns are every non-x column, in native order.
    let value_cols: Vec<(usize, String)> = names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != x_idx)
        .map(|(i, n)| (i, n.clone()))
        .collect();

    validate_role(role, &value_cols, source)?;

    let mut x = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); value_cols.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header row and CSV line
        // numbers are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, x_idx, &value_cols) {
            Ok((xv, values)) => {
                x.push(xv);
                for (col, v) in columns.iter_mut().zip(values) {
                    col.push(v);
                }
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = x.len();
    if rows_used == 0 {
        return Err(AppError::input(format!(
            "No valid rows in {} CSV '{source}'.",
            role.display_name()
        )));
    }

    let series = value_cols
        .into_iter()
        .zip(columns)
        .map(|((_, name), values)| Series { name, values })
        .collect();

    Ok(IngestedTable {
        table: SampleTable { x, series },
        role,
        rows_read,
        rows_used,
        row_errors,
    })
}

fn validate_role(role: TableRole, value_cols: &[(usize, String)], source: &str) -> Result<(), AppError> {
    match role.required_series() {
        Some(required) if value_cols.len() != required => {
            let names: Vec<&str> = value_cols.iter().take(10).map(|(_, n)| n.as_str()).collect();
            Err(AppError::data_shape(format!(
                "The {} dataset must contain {required} value columns (found {}) in '{source}': first {} = {:?}",
                role.display_name(),
                value_cols.len(),
                names.len(),
                names
            )))
        }
        None if value_cols.is_empty() => Err(AppError::data_shape(format!(
            "The {} dataset must contain at least one value column in '{source}'.",
            role.display_name()
        ))),
        _ => Ok(()),
    }
}

fn parse_row(
    record: &StringRecord,
    x_idx: usize,
    value_cols: &[(usize, String)],
) -> Result<(f64, Vec<f64>), String> {
    let xv = parse_cell(record, x_idx, "x")?;
    let mut values = Vec::with_capacity(value_cols.len());
    for (idx, name) in value_cols {
        values.push(parse_cell(record, *idx, name)?);
    }
    Ok((xv, values))
}

fn parse_cell(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing value in column `{name}`."))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid number '{raw}' in column `{name}`."))?;
    if !v.is_finite() {
        return Err(format!("Non-finite value in column `{name}`."));
    }
    Ok(v)
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "\u{feff}x"). If we don't strip it, schema
    // validation will incorrectly report a missing x column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}
