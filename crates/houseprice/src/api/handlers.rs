//! HTTP request handlers
//!
//! Axum handlers for the house price API.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use database::{Settings, SettingsRepository};
use ml_model::FeatureVector;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use super::AppState;
use super::error::ApiError;
use super::request::FeatureRequest;

/// Message returned after a successful settings save.
pub const SETTINGS_SAVED: &str = "Settings saved successfully";

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_price: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Formats a price with two decimal places.
#[must_use]
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// Predict the price of one house
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let features = FeatureVector::from(FeatureRequest::from_payload(payload)?);
    let price = state.model.predict_price(&features)?;

    debug!(?features, price, "Predicted price");

    Ok(Json(PredictResponse {
        predicted_price: format_price(price),
    }))
}

/// Save the default feature values, replacing any earlier save
pub async fn save_settings(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = FeatureRequest::from_payload(payload)?;
    if !request.is_finite() {
        return Err(ApiError::Validation(
            "settings values must be finite numbers".to_string(),
        ));
    }

    let settings = Settings::from(request);
    SettingsRepository::put(&state.pool, &settings).await?;

    debug!(?settings, "Saved settings");

    Ok(Json(MessageResponse {
        message: SETTINGS_SAVED.to_string(),
    }))
}

/// Get the saved settings, or an empty object if nothing was saved
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let body = match SettingsRepository::get(&state.pool).await? {
        Some(settings) => json!({
            "bedrooms": settings.bedrooms,
            "bathrooms": settings.bathrooms,
            "acre_lot": settings.acre_lot,
        }),
        None => json!({}),
    };

    Ok(Json(body))
}
