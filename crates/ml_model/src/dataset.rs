//! Housing dataset loading, cleaning and splitting.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::debug;

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 3;

/// CSV columns used as model inputs, in feature-vector order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = ["bed", "bath", "acre_lot"];

/// CSV column used as the regression target.
pub const TARGET_COLUMN: &str = "price";

/// Cell values treated as missing, in addition to the empty string.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("dataset has {0} usable rows, at least 2 are required")]
    TooFewRows(usize),

    #[error("dataset shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Cleaned housing records: an `n x FEATURE_COUNT` feature matrix and `n` prices.
#[derive(Debug, Clone)]
pub struct HousingDataset {
    features: Array2<f64>,
    targets: Array1<f64>,
}

impl HousingDataset {
    /// Loads and cleans a headered CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not valid CSV, lacks
    /// one of the required columns, or has fewer than two usable rows.
    pub fn from_csv_path(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(BufReader::new(file))
    }

    /// Loads and cleans headered CSV data from any reader.
    ///
    /// Rows with a missing price are dropped. Remaining cells that are missing
    /// or not numeric become `0.0`.
    ///
    /// # Errors
    ///
    /// See [`HousingDataset::from_csv_path`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or(DatasetError::MissingColumn(name))
        };

        let feature_columns = [
            column(FEATURE_COLUMNS[0])?,
            column(FEATURE_COLUMNS[1])?,
            column(FEATURE_COLUMNS[2])?,
        ];
        let target_column = column(TARGET_COLUMN)?;

        let mut features = Vec::new();
        let mut targets = Vec::new();
        let mut dropped = 0_usize;

        for record in csv.records() {
            let record = record?;

            let price = record.get(target_column).unwrap_or_default();
            if is_missing(price) {
                dropped += 1;
                continue;
            }

            targets.push(coerce_numeric(price));
            features.extend(
                feature_columns
                    .iter()
                    .map(|&index| coerce_numeric(record.get(index).unwrap_or_default())),
            );
        }

        let rows = targets.len();
        if rows < 2 {
            return Err(DatasetError::TooFewRows(rows));
        }

        debug!(rows, dropped, "Loaded housing dataset");

        Ok(Self {
            features: Array2::from_shape_vec((rows, FEATURE_COUNT), features)?,
            targets: Array1::from_vec(targets),
        })
    }

    /// Splits the rows into `(train, test)` partitions.
    ///
    /// Row order is shuffled with `seed`, then `ceil(test_fraction * n)` rows go
    /// to the test partition and the rest to the train partition.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "row counts fit comfortably in f64 and the product is non-negative"
    )]
    pub fn train_test_split(&self, test_fraction: f64, seed: u64) -> (Self, Self) {
        let n = self.len();
        let test_rows = ((n as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut StdRng::seed_from_u64(seed));

        let (test, train) = indices.split_at(test_rows.min(n));
        (self.select(train), self.select(test))
    }

    /// Feature matrix, one row per record.
    #[must_use]
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// Target prices, aligned with [`HousingDataset::features`].
    #[must_use]
    pub fn targets(&self) -> ArrayView1<'_, f64> {
        self.targets.view()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn select(&self, rows: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), rows),
            targets: self.targets.select(Axis(0), rows),
        }
    }
}

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// Parses a cell as a finite number, falling back to zero.
fn coerce_numeric(cell: &str) -> f64 {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
