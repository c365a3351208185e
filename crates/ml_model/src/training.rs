//! Training logic for the price model.

use std::path::Path;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

use crate::dataset::{DatasetError, HousingDataset};
use crate::forest::{ForestConfig, ForestError, RandomForestRegressor};
use crate::metrics::mean_squared_error;
use crate::PriceModel;

/// Errors raised while training.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Forest(#[from] ForestError),

    #[error("split left {train_rows} training rows and {test_rows} test rows")]
    EmptyPartition { train_rows: usize, test_rows: usize },
}

/// Configuration for training the model.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Fraction of rows held out to measure the error.
    pub test_fraction: f64,
    /// Forest hyperparameters. Its seed also drives the train/test split.
    pub forest: ForestConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.3,
            forest: ForestConfig::default(),
        }
    }
}

/// Output from training.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Mean squared error on the held-out partition.
    pub mse: f64,
    /// Rows the forest was fitted on.
    pub train_rows: usize,
    /// Rows used for evaluation.
    pub test_rows: usize,
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Wall time spent fitting.
    pub fit_duration: Duration,
}

/// Loads the dataset at `path` and trains a model on it.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or training fails.
pub fn train_from_path(path: &Path, config: &TrainingConfig) -> Result<PriceModel, TrainingError> {
    info!(path = %path.display(), "Loading dataset");
    let dataset = HousingDataset::from_csv_path(path)?;
    train(&dataset, config)
}

/// Splits `dataset`, fits a forest on the train partition and evaluates it on
/// the test partition.
///
/// # Errors
///
/// Returns an error if either partition is empty or the forest cannot be fitted.
pub fn train(dataset: &HousingDataset, config: &TrainingConfig) -> Result<PriceModel, TrainingError> {
    let (train_set, test_set) = dataset.train_test_split(config.test_fraction, config.forest.seed);
    let train_rows = train_set.len();
    let test_rows = test_set.len();

    if train_set.is_empty() || test_set.is_empty() {
        return Err(TrainingError::EmptyPartition {
            train_rows,
            test_rows,
        });
    }

    info!(
        train_rows,
        test_rows,
        n_trees = config.forest.n_trees,
        seed = config.forest.seed,
        "Fitting random forest"
    );

    let started = Instant::now();
    let forest = RandomForestRegressor::fit(train_set.features(), train_set.targets(), &config.forest)?;
    let fit_duration = started.elapsed();

    let predictions = forest.predict_batch(test_set.features())?;
    let mse = mean_squared_error(test_set.targets(), predictions.view());

    info!(mse, fit_secs = fit_duration.as_secs_f64(), "Model trained");

    let report = TrainingReport {
        mse,
        train_rows,
        test_rows,
        n_trees: forest.n_trees(),
        fit_duration,
    };

    Ok(PriceModel::new(forest, report))
}
