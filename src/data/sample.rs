//! Synthetic dataset generation for the `gen` subcommand.
//!
//! Produces a matched trio of CSVs on a shared x grid:
//!
//! - `ideal.csv`: 50 noise-free reference functions drawn from a few
//!   parameterized families (lines, parabolas, sinusoids, damped waves)
//! - `train.csv`: 4 of those references plus Gaussian noise
//! - `test.csv`: scattered observations near the 4 source references, with
//!   a configurable share of far-off outliers that should stay unmapped
//!
//! Generation is fully deterministic for a given seed, so generated
//! datasets are reproducible test fixtures.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{SampleTable, Series};
use crate::error::AppError;

/// Number of ideal functions in the generated library.
pub const IDEAL_COUNT: usize = 50;

/// Number of training series derived from the library.
pub const TRAIN_COUNT: usize = 4;

#[derive(Debug, Clone)]
pub struct GenConfig {
    pub out_dir: PathBuf,
    /// Rows in the shared x grid (train/ideal tables).
    pub rows: usize,
    /// Rows in the generated test table.
    pub test_rows: usize,
    pub seed: u64,
    /// Standard deviation of the training noise.
    pub noise_sigma: f64,
    /// Probability that a test point is a far-off outlier.
    pub outlier_prob: f64,
}

#[derive(Debug, Clone)]
pub struct GeneratedData {
    pub train: SampleTable,
    pub ideal: SampleTable,
    pub test: SampleTable,
    /// Library indices the 4 training series were derived from.
    pub source_ideals: Vec<usize>,
}

/// Generate the three datasets in memory.
pub fn generate_datasets(config: &GenConfig) -> Result<GeneratedData, AppError> {
    if config.rows < 2 {
        return Err(AppError::data_shape("Grid row count must be >= 2."));
    }
    if config.test_rows == 0 {
        return Err(AppError::data_shape("Test row count must be > 0."));
    }
    if !(config.noise_sigma.is_finite() && config.noise_sigma >= 0.0) {
        return Err(AppError::data_shape("Noise sigma must be finite and >= 0."));
    }
    if !(0.0..1.0).contains(&config.outlier_prob) {
        return Err(AppError::data_shape("Outlier probability must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise_sigma.max(1e-12))
        .map_err(|e| AppError::data_shape(format!("Noise distribution error: {e}")))?;

    // Shared grid on [-10, 10]; values quantized to the written CSV
    // precision so in-memory tables and re-loaded tables join identically.
    let x: Vec<f64> = (0..config.rows)
        .map(|i| {
            let u = i as f64 / (config.rows as f64 - 1.0);
            quantize(-10.0 + 20.0 * u)
        })
        .collect();

    let ideal = SampleTable {
        x: x.clone(),
        series: (0..IDEAL_COUNT)
            .map(|k| Series {
                name: format!("f{}", k + 1),
                values: x.iter().map(|&xv| quantize(ideal_value(k, xv))).collect(),
            })
            .collect(),
    };

    // Pick 4 distinct library functions as training sources.
    let mut indices: Vec<usize> = (0..IDEAL_COUNT).collect();
    indices.shuffle(&mut rng);
    let source_ideals: Vec<usize> = indices.into_iter().take(TRAIN_COUNT).collect();

    let train = SampleTable {
        x: x.clone(),
        series: source_ideals
            .iter()
            .enumerate()
            .map(|(i, &k)| Series {
                name: format!("y{}", i + 1),
                values: x
                    .iter()
                    .map(|&xv| quantize(ideal_value(k, xv) + noise.sample(&mut rng)))
                    .collect(),
            })
            .collect(),
    };

    // Test points sit on grid positions (exact-match joins) but follow a
    // randomly chosen source function each, plus noise or an outlier jump.
    let mut test_x = Vec::with_capacity(config.test_rows);
    let mut test_y = Vec::with_capacity(config.test_rows);
    for _ in 0..config.test_rows {
        let xv = x[rng.gen_range(0..x.len())];
        let k = source_ideals[rng.gen_range(0..source_ideals.len())];
        let base = ideal_value(k, xv);
        let y = if rng.gen_bool(config.outlier_prob) {
            // Far outside any plausible tolerance band.
            base + 50.0 * (1.0 + config.noise_sigma) * if rng.gen_bool(0.5) { 1.0 } else { -1.0 }
        } else {
            base + noise.sample(&mut rng)
        };
        test_x.push(xv);
        test_y.push(quantize(y));
    }

    let test = SampleTable {
        x: test_x,
        series: vec![Series {
            name: "y".to_string(),
            values: test_y,
        }],
    };

    Ok(GeneratedData {
        train,
        ideal,
        test,
        source_ideals,
    })
}

/// Generate the datasets and write `train.csv`, `ideal.csv`, `test.csv`
/// into the output directory. Returns the written paths.
pub fn write_datasets(config: &GenConfig) -> Result<[PathBuf; 3], AppError> {
    let data = generate_datasets(config)?;

    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::data_shape(format!(
            "Failed to create output directory '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let train_path = config.out_dir.join("train.csv");
    let ideal_path = config.out_dir.join("ideal.csv");
    let test_path = config.out_dir.join("test.csv");

    write_table_csv(&train_path, &data.train)?;
    write_table_csv(&ideal_path, &data.ideal)?;
    write_table_csv(&test_path, &data.test)?;

    Ok([train_path, ideal_path, test_path])
}

/// The 50-function library: 5 families, parameters stepped per index.
///
/// Families are chosen so the library spans clearly distinct shapes; the
/// exact formulas are arbitrary but fixed (the selector treats them as
/// opaque tabulated values).
fn ideal_value(k: usize, x: f64) -> f64 {
    let p = (k / 5) as f64 + 1.0;
    match k % 5 {
        0 => p * 0.5 * x,
        1 => 0.05 * p * x * x - p,
        2 => p * (0.5 * x).sin(),
        3 => p * (0.3 * x).cos() + 0.2 * x,
        _ => p * (-0.1 * x.abs()).exp() * x.sin(),
    }
}

/// Round to the precision the CSVs are written with.
fn quantize(v: f64) -> f64 {
    (v * 1e8).round() / 1e8
}

fn write_table_csv(path: &Path, table: &SampleTable) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::data_shape(format!("Failed to create CSV '{}': {e}", path.display())))?;

    let mut header = String::from("x");
    for s in &table.series {
        header.push(',');
        header.push_str(&s.name);
    }
    writeln!(file, "{header}")
        .map_err(|e| AppError::data_shape(format!("Failed to write CSV header: {e}")))?;

    for row in 0..table.n_rows() {
        let mut line = format!("{:.8}", table.x[row]);
        for s in &table.series {
            line.push_str(&format!(",{:.8}", s.values[row]));
        }
        writeln!(file, "{line}")
            .map_err(|e| AppError::data_shape(format!("Failed to write CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::select_ideal_functions;

    fn config() -> GenConfig {
        GenConfig {
            out_dir: PathBuf::from("."),
            rows: 200,
            test_rows: 50,
            seed: 42,
            noise_sigma: 0.05,
            outlier_prob: 0.1,
        }
    }

    #[test]
    fn generated_shapes_match_the_roles() {
        let data = generate_datasets(&config()).unwrap();
        assert_eq!(data.ideal.series.len(), IDEAL_COUNT);
        assert_eq!(data.train.series.len(), TRAIN_COUNT);
        assert_eq!(data.test.series.len(), 1);
        assert_eq!(data.train.n_rows(), 200);
        assert_eq!(data.test.n_rows(), 50);
        assert_eq!(data.train.x, data.ideal.x);
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate_datasets(&config()).unwrap();
        let b = generate_datasets(&config()).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.ideal, b.ideal);
        assert_eq!(a.test, b.test);
        assert_eq!(a.source_ideals, b.source_ideals);

        let mut other = config();
        other.seed = 43;
        let c = generate_datasets(&other).unwrap();
        assert_ne!(a.test, c.test);
    }

    #[test]
    fn selector_recovers_the_source_functions() {
        // Low noise: each training series must select the library function
        // it was generated from.
        let data = generate_datasets(&config()).unwrap();
        let selections = select_ideal_functions(&data.train, &data.ideal).unwrap();

        for (sel, &k) in selections.iter().zip(&data.source_ideals) {
            assert_eq!(sel.ideal_series, format!("f{}", k + 1));
        }
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut c = config();
        c.rows = 1;
        assert_eq!(generate_datasets(&c).unwrap_err().exit_code(), 2);

        let mut c = config();
        c.noise_sigma = -1.0;
        assert_eq!(generate_datasets(&c).unwrap_err().exit_code(), 2);

        let mut c = config();
        c.outlier_prob = 1.0;
        assert_eq!(generate_datasets(&c).unwrap_err().exit_code(), 2);
    }
}
