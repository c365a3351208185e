//! Train command - fits the model and reports its error.

use anyhow::Result;
use config::Config;
use tracing::info;

use super::load_model;

/// Runs the train command.
///
/// # Errors
///
/// Returns an error if training fails.
pub async fn run(config: &Config) -> Result<()> {
    info!(dataset = %config.dataset_path.display(), "Starting training");

    let model = load_model(config).await?;
    let report = model.report();

    info!(
        mse = report.mse,
        rmse = report.mse.sqrt(),
        train_rows = report.train_rows,
        test_rows = report.test_rows,
        n_trees = report.n_trees,
        fit_secs = report.fit_duration.as_secs_f64(),
        "Training complete"
    );
    println!("Model MSE: {}", report.mse);

    Ok(())
}
