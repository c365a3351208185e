//! House Price Service
//!
//! Trains a random-forest regressor on housing data at startup and serves
//! price predictions and saved settings over HTTP.

pub mod api;
pub mod commands;
