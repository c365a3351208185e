//! Parsing of the `{bedrooms?, bathrooms?, acre_lot?}` request body.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use database::Settings;
use ml_model::FeatureVector;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::ApiError;

/// Feature fields shared by the predict and settings endpoints.
///
/// Absent fields default to zero. Present fields must be JSON numbers,
/// booleans (`true` is 1) or strings holding a number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct FeatureRequest {
    #[serde(default, deserialize_with = "numeric")]
    pub bedrooms: f64,
    #[serde(default, deserialize_with = "numeric")]
    pub bathrooms: f64,
    #[serde(default, deserialize_with = "numeric")]
    pub acre_lot: f64,
}

impl FeatureRequest {
    /// Validates an extracted JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if the body is not a JSON object or a
    /// field is not numeric.
    pub fn from_payload(payload: Result<Json<Value>, JsonRejection>) -> Result<Self, ApiError> {
        let Json(value) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Self::from_value(value)
    }

    /// # Errors
    ///
    /// See [`FeatureRequest::from_payload`].
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        if !value.is_object() {
            return Err(ApiError::Validation(
                "request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| ApiError::Validation(e.to_string()))
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.bedrooms.is_finite() && self.bathrooms.is_finite() && self.acre_lot.is_finite()
    }
}

impl From<FeatureRequest> for FeatureVector {
    fn from(request: FeatureRequest) -> Self {
        Self::new(request.bedrooms, request.bathrooms, request.acre_lot)
    }
}

impl From<FeatureRequest> for Settings {
    fn from(request: FeatureRequest) -> Self {
        Self {
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            acre_lot: request.acre_lot,
        }
    }
}

fn numeric<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("number out of range: {number}"))),
        Value::String(text) => parse_float(&text)
            .ok_or_else(|| D::Error::custom(format!("could not convert string to float: {text:?}"))),
        Value::Bool(flag) => Ok(if flag { 1.0 } else { 0.0 }),
        other => Err(D::Error::custom(format!("expected a number, found {other}"))),
    }
}

/// Parses a decimal string, allowing surrounding whitespace and single
/// underscores between digits (`"1_000"`).
fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim();
    if !text.contains('_') {
        return text.parse().ok();
    }

    let bytes = text.as_bytes();
    let grouped = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });

    if grouped {
        text.replace('_', "").parse().ok()
    } else {
        None
    }
}
