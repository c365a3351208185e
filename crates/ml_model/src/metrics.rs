//! Regression metrics.

use ndarray::ArrayView1;

/// Mean of squared differences between `actual` and `predicted`.
///
/// Returns `0.0` for empty input. Extra elements in the longer view are ignored.
#[must_use]
pub fn mean_squared_error(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> f64 {
    let count = actual.len().min(predicted.len());
    if count == 0 {
        return 0.0;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    sum / count as f64
}
