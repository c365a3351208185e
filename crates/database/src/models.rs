//! Database model types.

use serde::{Deserialize, Serialize};

/// Saved default feature values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Settings {
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub acre_lot: f64,
}
