//! SQLite persistence sink.
//!
//! The pipeline stores four tables, mirroring the conventional layout for
//! this task:
//!
//! - `training_data` and `ideal_functions`: the input tables as loaded
//! - `selected_ideal_functions`: one row per [`Selection`]
//! - `mapped_test_data`: one row per [`MappingRecord`]
//!
//! Writes are replace-on-write (DROP + CREATE), so re-running the pipeline
//! against the same database refreshes its contents. The core never depends
//! on this module; it is purely downstream.

use std::path::Path;

use rusqlite::Connection;

use crate::domain::{MappingRecord, SampleTable, Selection};
use crate::error::AppError;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a SQLite database file.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let conn = Connection::open(path).map_err(|e| {
            AppError::database(format!("Failed to open SQLite database '{}': {e}", path.display()))
        })?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used by tests).
    pub fn in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::database(format!("Failed to open in-memory SQLite database: {e}")))?;
        Ok(Self { conn })
    }

    /// Store a sample table under `name` with its x column plus one column
    /// per value series, replacing any previous contents.
    pub fn write_sample_table(
        &mut self,
        name: &str,
        table: &SampleTable,
        x_col: &str,
    ) -> Result<(), AppError> {
        let mut columns = vec![format!("{} REAL", quote_ident(x_col))];
        for s in &table.series {
            columns.push(format!("{} REAL", quote_ident(&s.name)));
        }
        self.replace_table(name, &columns)?;

        let placeholders = vec!["?"; 1 + table.series.len()].join(", ");
        let insert = format!("INSERT INTO {} VALUES ({placeholders})", quote_ident(name));

        let tx = self.transaction()?;
        {
            let mut stmt = tx
                .prepare(&insert)
                .map_err(|e| AppError::database(format!("Failed to prepare insert into '{name}': {e}")))?;
            for row in 0..table.n_rows() {
                let mut values = Vec::with_capacity(1 + table.series.len());
                values.push(table.x[row]);
                values.extend(table.series.iter().map(|s| s.values[row]));
                stmt.execute(rusqlite::params_from_iter(values))
                    .map_err(|e| AppError::database(format!("Failed to write table '{name}': {e}")))?;
            }
        }
        tx.commit()
            .map_err(|e| AppError::database(format!("Failed to commit table '{name}': {e}")))?;
        Ok(())
    }

    /// Store the selection summary as `selected_ideal_functions`.
    pub fn write_selections(&mut self, selections: &[Selection]) -> Result<(), AppError> {
        self.replace_table(
            "selected_ideal_functions",
            &[
                "training_function TEXT".to_string(),
                "ideal_function TEXT".to_string(),
                "sse REAL".to_string(),
                "max_deviation REAL".to_string(),
            ],
        )?;

        let tx = self.transaction()?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO selected_ideal_functions VALUES (?, ?, ?, ?)")
                .map_err(|e| AppError::database(format!("Failed to prepare selections insert: {e}")))?;
            for s in selections {
                stmt.execute(rusqlite::params![s.train_series, s.ideal_series, s.sse, s.max_dev])
                    .map_err(|e| {
                        AppError::database(format!("Failed to write table 'selected_ideal_functions': {e}"))
                    })?;
            }
        }
        tx.commit()
            .map_err(|e| AppError::database(format!("Failed to commit selections: {e}")))?;
        Ok(())
    }

    /// Store mapped test points as `mapped_test_data`.
    pub fn write_mappings(&mut self, mappings: &[MappingRecord]) -> Result<(), AppError> {
        self.replace_table(
            "mapped_test_data",
            &[
                "x REAL".to_string(),
                "y REAL".to_string(),
                "test_series TEXT".to_string(),
                "ideal_func TEXT".to_string(),
                "delta_y REAL".to_string(),
                "threshold REAL".to_string(),
            ],
        )?;

        let tx = self.transaction()?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO mapped_test_data VALUES (?, ?, ?, ?, ?, ?)")
                .map_err(|e| AppError::database(format!("Failed to prepare mappings insert: {e}")))?;
            for m in mappings {
                stmt.execute(rusqlite::params![
                    m.x,
                    m.y,
                    m.test_series,
                    m.ideal_series,
                    m.delta,
                    m.threshold
                ])
                .map_err(|e| AppError::database(format!("Failed to write table 'mapped_test_data': {e}")))?;
            }
        }
        tx.commit()
            .map_err(|e| AppError::database(format!("Failed to commit mappings: {e}")))?;
        Ok(())
    }

    /// Count rows in a table (used by tests and sanity checks).
    pub fn count_rows(&self, name: &str) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(name));
        self.conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| AppError::database(format!("Failed to count rows in '{name}': {e}")))
    }

    fn replace_table(&mut self, name: &str, columns: &[String]) -> Result<(), AppError> {
        let drop = format!("DROP TABLE IF EXISTS {}", quote_ident(name));
        self.conn
            .execute(&drop, [])
            .map_err(|e| AppError::database(format!("Failed to drop table '{name}': {e}")))?;

        let create = format!("CREATE TABLE {} ({})", quote_ident(name), columns.join(", "));
        self.conn
            .execute(&create, [])
            .map_err(|e| AppError::database(format!("Failed to create table '{name}': {e}")))?;
        Ok(())
    }

    fn transaction(&mut self) -> Result<rusqlite::Transaction<'_>, AppError> {
        self.conn
            .transaction()
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))
    }
}

/// Double-quote an identifier for SQLite, escaping embedded quotes.
///
/// Column names come from CSV headers, so they are data, not trusted SQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Series;

    fn sample_table() -> SampleTable {
        SampleTable {
            x: vec![0.0, 1.0, 2.0],
            series: vec![
                Series {
                    name: "y1".to_string(),
                    values: vec![1.0, 2.0, 3.0],
                },
                Series {
                    name: "y2".to_string(),
                    values: vec![-1.0, -2.0, -3.0],
                },
            ],
        }
    }

    #[test]
    fn sample_table_round_trips() {
        let mut db = Database::in_memory().unwrap();
        db.write_sample_table("training_data", &sample_table(), "x").unwrap();

        assert_eq!(db.count_rows("training_data").unwrap(), 3);
        let y2: f64 = db
            .conn
            .query_row("SELECT \"y2\" FROM training_data WHERE \"x\" = 1.0", [], |r| r.get(0))
            .unwrap();
        assert_eq!(y2, -2.0);
    }

    #[test]
    fn rewriting_replaces_previous_contents() {
        let mut db = Database::in_memory().unwrap();
        db.write_sample_table("training_data", &sample_table(), "x").unwrap();
        db.write_sample_table("training_data", &sample_table(), "x").unwrap();
        assert_eq!(db.count_rows("training_data").unwrap(), 3);
    }

    #[test]
    fn selections_and_mappings_are_stored() {
        let mut db = Database::in_memory().unwrap();
        db.write_selections(&[Selection {
            train_series: "y1".to_string(),
            ideal_series: "f7".to_string(),
            sse: 0.5,
            max_dev: 0.1,
        }])
        .unwrap();
        db.write_mappings(&[MappingRecord {
            x: 0.0,
            y: 1.0,
            test_series: "y".to_string(),
            ideal_series: "f7".to_string(),
            delta: 0.05,
            threshold: 0.14,
        }])
        .unwrap();

        assert_eq!(db.count_rows("selected_ideal_functions").unwrap(), 1);
        assert_eq!(db.count_rows("mapped_test_data").unwrap(), 1);

        let ideal: String = db
            .conn
            .query_row("SELECT ideal_function FROM selected_ideal_functions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(ideal, "f7");
    }

    #[test]
    fn quoted_identifiers_tolerate_odd_column_names() {
        let mut db = Database::in_memory().unwrap();
        let table = SampleTable {
            x: vec![0.0],
            series: vec![Series {
                name: "weird \"name\"".to_string(),
                values: vec![1.0],
            }],
        };
        db.write_sample_table("t", &table, "x").unwrap();
        assert_eq!(db.count_rows("t").unwrap(), 1);
    }
}
