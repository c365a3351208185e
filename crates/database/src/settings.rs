//! Repository functions for the singleton settings record.

use sqlx::SqlitePool;

use crate::models::Settings;

/// Primary key of the one settings row.
pub const SETTINGS_ID: i64 = 1;

/// Repository for the settings record.
///
/// The table holds at most one row, addressed by [`SETTINGS_ID`].
pub struct SettingsRepository;

impl SettingsRepository {
    /// Fetches the saved settings, if any have been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(pool: &SqlitePool) -> Result<Option<Settings>, sqlx::Error> {
        sqlx::query_as::<_, Settings>(
            r"
            SELECT bedrooms, bathrooms, acre_lot
            FROM settings
            WHERE id = ?1
            ",
        )
        .bind(SETTINGS_ID)
        .fetch_optional(pool)
        .await
    }

    /// Stores the settings, replacing any previously saved values.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn put(pool: &SqlitePool, settings: &Settings) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO settings (id, bedrooms, bathrooms, acre_lot)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (id) DO UPDATE SET
                bedrooms = excluded.bedrooms,
                bathrooms = excluded.bathrooms,
                acre_lot = excluded.acre_lot
            ",
        )
        .bind(SETTINGS_ID)
        .bind(settings.bedrooms)
        .bind(settings.bathrooms)
        .bind(settings.acre_lot)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }
}
