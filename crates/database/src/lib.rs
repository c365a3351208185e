//! SQLite persistence for the house price service.
//!
//! The only stored entity is the singleton [`Settings`] record, accessed
//! through [`SettingsRepository`].

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

mod models;
mod settings;

pub use models::Settings;
pub use settings::{SETTINGS_ID, SettingsRepository};

/// Creates a connection pool to the SQLite database, creating the file if needed.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the database cannot be opened.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    debug!(database_url, "Opening SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Runs all pending migrations.
///
/// # Errors
///
/// Returns an error if running migrations fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
