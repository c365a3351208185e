//! Random-forest regression on top of `smartcore`.
//!
//! Converts the `ndarray` views produced by [`crate::HousingDataset`] into
//! `smartcore` dense matrices and maps its errors into [`ForestError`].

use std::fmt;

use ndarray::{Array1, ArrayView1, ArrayView2};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor as SmartcoreForest, RandomForestRegressorParameters,
};
use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;
use thiserror::Error;

type Forest = SmartcoreForest<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Errors raised while fitting or querying a forest.
#[derive(Debug, Error)]
pub enum ForestError {
    #[error("cannot fit a forest on an empty training set")]
    EmptyInput,

    #[error("feature matrix has {rows} rows but {targets} targets were given")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("a forest needs at least one tree")]
    NoTrees,

    #[error("{0} trees is more than the forest supports")]
    TooManyTrees(usize),

    #[error("random forest failed: {0}")]
    Model(#[from] Failed),
}

/// Hyperparameters for [`RandomForestRegressor`].
#[derive(Debug, Clone)]
pub struct ForestConfig {
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Seed for bootstrap sampling.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
        }
    }
}

impl ForestConfig {
    #[must_use]
    pub const fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn parameters(&self) -> Result<RandomForestRegressorParameters, ForestError> {
        if self.n_trees == 0 {
            return Err(ForestError::NoTrees);
        }

        let n_trees = self
            .n_trees
            .try_into()
            .map_err(|_| ForestError::TooManyTrees(self.n_trees))?;

        Ok(RandomForestRegressorParameters::default()
            .with_n_trees(n_trees)
            .with_seed(self.seed))
    }
}

/// A fitted forest predicting the mean of its trees.
pub struct RandomForestRegressor {
    forest: Forest,
    n_trees: usize,
}

impl fmt::Debug for RandomForestRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomForestRegressor")
            .field("n_trees", &self.n_trees)
            .finish_non_exhaustive()
    }
}

impl RandomForestRegressor {
    /// Fits a forest on `features` (one row per sample) and `targets`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, its lengths disagree, the
    /// config asks for no trees, or the underlying fit fails.
    pub fn fit(
        features: ArrayView2<'_, f64>,
        targets: ArrayView1<'_, f64>,
        config: &ForestConfig,
    ) -> Result<Self, ForestError> {
        if features.nrows() == 0 {
            return Err(ForestError::EmptyInput);
        }
        if features.nrows() != targets.len() {
            return Err(ForestError::LengthMismatch {
                rows: features.nrows(),
                targets: targets.len(),
            });
        }

        let parameters = config.parameters()?;
        let x = to_dense(features)?;
        let y = targets.to_vec();

        Ok(Self {
            forest: Forest::fit(&x, &y, parameters)?,
            n_trees: config.n_trees,
        })
    }

    /// Predicts one sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying predict fails.
    pub fn predict(&self, row: ArrayView1<'_, f64>) -> Result<f64, ForestError> {
        let x = DenseMatrix::from_2d_vec(&vec![row.to_vec()])?;
        let predictions = self.forest.predict(&x)?;

        predictions.first().copied().ok_or(ForestError::EmptyInput)
    }

    /// Predicts every row of `features`.
    ///
    /// # Errors
    ///
    /// Returns an error if `features` is empty or the underlying predict fails.
    pub fn predict_batch(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>, ForestError> {
        if features.nrows() == 0 {
            return Err(ForestError::EmptyInput);
        }

        let x = to_dense(features)?;
        Ok(Array1::from(self.forest.predict(&x)?))
    }

    #[must_use]
    pub const fn n_trees(&self) -> usize {
        self.n_trees
    }
}

fn to_dense(features: ArrayView2<'_, f64>) -> Result<DenseMatrix<f64>, Failed> {
    let rows: Vec<Vec<f64>> = features.rows().into_iter().map(|row| row.to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};

    use super::*;

    fn step_data() -> (Array2<f64>, Array1<f64>) {
        let features = Array2::from_shape_fn((40, 3), |(i, j)| (i * (j + 1)) as f64);
        let targets = Array1::from_shape_fn(40, |i| if i < 20 { 100.0 } else { 500.0 });
        (features, targets)
    }

    #[test]
    fn test_forest_learns_step() {
        let (features, targets) = step_data();
        let config = ForestConfig::default().with_n_trees(20);

        let forest = RandomForestRegressor::fit(features.view(), targets.view(), &config).expect("fit");

        let low = forest.predict(array![2.0, 4.0, 6.0].view()).expect("predict");
        let high = forest.predict(array![35.0, 70.0, 105.0].view()).expect("predict");
        assert!(low < 300.0, "low side predicted {low}");
        assert!(high > 300.0, "high side predicted {high}");
        assert_eq!(forest.n_trees(), 20);
    }

    #[test]
    fn test_forest_is_reproducible() {
        let (features, targets) = step_data();
        let config = ForestConfig::default().with_n_trees(5).with_seed(7);

        let first = RandomForestRegressor::fit(features.view(), targets.view(), &config).expect("fit");
        let second = RandomForestRegressor::fit(features.view(), targets.view(), &config).expect("fit");

        let a = first.predict_batch(features.view()).expect("predict");
        let b = second.predict_batch(features.view()).expect("predict");
        assert_eq!(a, b);
    }

    #[test]
    fn test_predict_batch_matches_single_rows() {
        let (features, targets) = step_data();
        let config = ForestConfig::default().with_n_trees(5);
        let forest = RandomForestRegressor::fit(features.view(), targets.view(), &config).expect("fit");

        let batch = forest.predict_batch(features.view()).expect("predict");
        for (row, expected) in features.rows().into_iter().zip(batch.iter()) {
            let single = forest.predict(row).expect("predict");
            assert!((single - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_forest_rejects_bad_input() {
        let (features, targets) = step_data();
        let config = ForestConfig::default();

        let empty = Array2::<f64>::zeros((0, 3));
        let err = RandomForestRegressor::fit(empty.view(), Array1::zeros(0).view(), &config)
            .expect_err("empty input");
        assert!(matches!(err, ForestError::EmptyInput));

        let err = RandomForestRegressor::fit(features.view(), targets.slice(ndarray::s![..10]), &config)
            .expect_err("mismatched lengths");
        assert!(matches!(err, ForestError::LengthMismatch { rows: 40, targets: 10 }));

        let err = RandomForestRegressor::fit(features.view(), targets.view(), &config.with_n_trees(0))
            .expect_err("no trees");
        assert!(matches!(err, ForestError::NoTrees));
    }
}
