//! CLI command implementations.

use anyhow::{Context, Result};
use config::Config;
use ml_model::{ForestConfig, PriceModel, TrainingConfig, train_from_path};

pub mod predict;
pub mod serve;
pub mod train;

/// Builds the training configuration from application settings.
#[must_use]
pub fn training_config(config: &Config) -> TrainingConfig {
    TrainingConfig {
        test_fraction: config.test_fraction,
        forest: ForestConfig::default()
            .with_n_trees(config.model_trees)
            .with_seed(config.model_seed),
    }
}

/// Loads the dataset and fits the model on a blocking thread.
///
/// # Errors
///
/// Returns an error if the dataset is missing or malformed, or training fails.
pub async fn load_model(config: &Config) -> Result<PriceModel> {
    let path = config.dataset_path.clone();
    let training = training_config(config);

    tokio::task::spawn_blocking(move || {
        train_from_path(&path, &training)
            .with_context(|| format!("Failed to train model from {}", path.display()))
    })
    .await
    .context("Training task panicked")?
}
