//! Export mapped test points to CSV and the selection summary to JSON.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts; SQLite persistence lives in `crate::db`.

use std::fs::File;
use std::path::Path;

use crate::domain::{MappingRecord, Selection};
use crate::error::AppError;

/// Write mapped test points to a CSV file.
///
/// Column names match the `mapped_test_data` SQLite table. Series names come
/// from CSV headers and may themselves contain commas or quotes, so rows go
/// through a `csv::Writer` rather than raw string formatting.
pub fn write_mappings_csv(path: &Path, mappings: &[MappingRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::data_shape(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["x", "y", "test_series", "ideal_func", "delta_y", "threshold"])
        .map_err(|e| AppError::data_shape(format!("Failed to write export CSV header: {e}")))?;

    for m in mappings {
        writer
            .write_record([
                format!("{:.10}", m.x),
                format!("{:.10}", m.y),
                m.test_series.clone(),
                m.ideal_series.clone(),
                format!("{:.10}", m.delta),
                format!("{:.10}", m.threshold),
            ])
            .map_err(|e| AppError::data_shape(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::data_shape(format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}

/// Write the selection summary to a pretty-printed JSON file.
pub fn write_selections_json(path: &Path, selections: &[Selection]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::data_shape(format!("Failed to create selections JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, selections)
        .map_err(|e| AppError::data_shape(format!("Failed to write selections JSON: {e}")))?;

    Ok(())
}

/// Read back a selections JSON file (round-trip support for tooling).
pub fn read_selections_json(path: &Path) -> Result<Vec<Selection>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::data_shape(format!("Failed to open selections JSON '{}': {e}", path.display())))?;
    let selections: Vec<Selection> = serde_json::from_reader(file)
        .map_err(|e| AppError::data_shape(format!("Invalid selections JSON: {e}")))?;
    Ok(selections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ideal-map-export-{}-{name}", std::process::id()))
    }

    #[test]
    fn mappings_csv_round_trips_through_ingest() {
        let mappings = vec![MappingRecord {
            x: 1.5,
            y: 2.25,
            test_series: "y".to_string(),
            ideal_series: "f7".to_string(),
            delta: 0.25,
            threshold: 0.5,
        }];

        let path = tmp_path("mappings.csv");
        write_mappings_csv(&path, &mappings).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,y,test_series,ideal_func,delta_y,threshold"));
        let row = lines.next().unwrap();
        assert!(row.contains("f7"));
        assert!(row.starts_with("1.5000000000,2.2500000000,y,"));
    }

    #[test]
    fn series_names_with_delimiters_are_quoted() {
        let mappings = vec![MappingRecord {
            x: 0.0,
            y: 1.0,
            test_series: "odd,\"series\"".to_string(),
            ideal_series: "f1".to_string(),
            delta: 0.1,
            threshold: 0.2,
        }];

        let path = tmp_path("quoted.csv");
        write_mappings_csv(&path, &mappings).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(record.len(), 6);
        assert_eq!(record.get(2), Some("odd,\"series\""));
        assert_eq!(record.get(3), Some("f1"));
    }

    #[test]
    fn selections_json_round_trips() {
        let selections = vec![Selection {
            train_series: "y1".to_string(),
            ideal_series: "f7".to_string(),
            sse: 0.125,
            max_dev: 0.25,
        }];

        let path = tmp_path("selections.json");
        write_selections_json(&path, &selections).unwrap();
        let back = read_selections_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, selections);
    }
}
