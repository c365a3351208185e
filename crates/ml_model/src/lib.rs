//! ML model crate for house price prediction.
//!
//! Loads the housing dataset, fits a random-forest regressor on the
//! `bed`, `bath` and `acre_lot` columns and predicts `price`.

use ndarray::aview1;
use thiserror::Error;

pub mod dataset;
pub mod forest;
pub mod metrics;
pub mod training;

pub use dataset::{DatasetError, FEATURE_COUNT, HousingDataset};
pub use forest::{ForestConfig, ForestError, RandomForestRegressor};
pub use training::{TrainingConfig, TrainingError, TrainingReport, train, train_from_path};

/// Model input: one house described by its three features.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub acre_lot: f64,
}

impl FeatureVector {
    #[must_use]
    pub const fn new(bedrooms: f64, bathrooms: f64, acre_lot: f64) -> Self {
        Self {
            bedrooms,
            bathrooms,
            acre_lot,
        }
    }

    /// Features in dataset column order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [self.bedrooms, self.bathrooms, self.acre_lot]
    }

    /// Returns true if every feature is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }
}

/// Errors raised by a predictor.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("input contains NaN or infinity: {0:?}")]
    NonFiniteInput(FeatureVector),

    #[error(transparent)]
    Forest(#[from] ForestError),
}

/// Anything that can turn a feature vector into a price.
pub trait PricePredictor: Send + Sync {
    /// Predicts the price of one house.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be scored.
    fn predict_price(&self, features: &FeatureVector) -> Result<f64, PredictionError>;
}

/// A fitted forest together with the report from training it.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug)]
pub struct PriceModel {
    forest: RandomForestRegressor,
    report: TrainingReport,
}

impl PriceModel {
    #[must_use]
    pub const fn new(forest: RandomForestRegressor, report: TrainingReport) -> Self {
        Self { forest, report }
    }

    /// Predicts the price for `features`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::NonFiniteInput`] if any feature is NaN or
    /// infinite, or [`PredictionError::Forest`] if the forest cannot score it.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        if !features.is_finite() {
            return Err(PredictionError::NonFiniteInput(*features));
        }

        let row = features.to_array();
        Ok(self.forest.predict(aview1(&row))?)
    }

    #[must_use]
    pub const fn report(&self) -> &TrainingReport {
        &self.report
    }
}

impl PricePredictor for PriceModel {
    fn predict_price(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        self.predict(features)
    }
}
