//! Predict command - fits the model and prices a single house.

use anyhow::{Context, Result};
use config::Config;
use ml_model::FeatureVector;
use tracing::info;

use super::load_model;
use crate::api::format_price;

/// Runs the predict command.
///
/// # Errors
///
/// Returns an error if training fails or the features cannot be scored.
pub async fn run(config: &Config, features: FeatureVector) -> Result<()> {
    let model = load_model(config).await?;

    let price = model
        .predict(&features)
        .context("Failed to predict price")?;

    info!(
        bedrooms = features.bedrooms,
        bathrooms = features.bathrooms,
        acre_lot = features.acre_lot,
        price,
        "Predicted price"
    );
    println!("{}", format_price(price));

    Ok(())
}
