use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

/// Default SQLite database holding the saved settings.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://savedsettings.db";

/// Default location of the training dataset.
pub const DEFAULT_DATASET_PATH: &str = "realtor-data.csv";

/// Default address the HTTP service binds to.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Path to the CSV file the model is trained on
    pub dataset_path: PathBuf,

    /// Address the HTTP service listens on
    pub bind_address: SocketAddr,

    /// Seed shared by the train/test split and the forest
    pub model_seed: u64,

    /// Number of trees in the forest
    pub model_trees: usize,

    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            model_seed: 42,
            model_trees: 100,
            test_fraction: 0.3,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// All variables are optional and fall back to [`Config::default`]:
    /// - `DATABASE_URL`: SQLite connection string (default: `sqlite://savedsettings.db`)
    /// - `DATASET_PATH`: training CSV (default: `realtor-data.csv`)
    /// - `BIND_ADDRESS`: HTTP listen address (default: `127.0.0.1:5000`)
    /// - `MODEL_SEED`: random seed (default: `42`)
    /// - `MODEL_TREES`: forest size (default: `100`)
    /// - `TEST_FRACTION`: held-out fraction in `(0, 1)` (default: `0.3`)
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let database_url = std::env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let dataset_path = std::env::var("DATASET_PATH").map_or(defaults.dataset_path, PathBuf::from);
        let bind_address = parse_var("BIND_ADDRESS")?.unwrap_or(defaults.bind_address);
        let model_seed = parse_var("MODEL_SEED")?.unwrap_or(defaults.model_seed);
        let model_trees = parse_var("MODEL_TREES")?.unwrap_or(defaults.model_trees);
        let test_fraction = parse_var("TEST_FRACTION")?.unwrap_or(defaults.test_fraction);

        anyhow::ensure!(model_trees > 0, "MODEL_TREES must be at least 1");
        anyhow::ensure!(
            test_fraction > 0.0 && test_fraction < 1.0,
            "TEST_FRACTION must be between 0 and 1 (exclusive), got {test_fraction}"
        );

        Ok(Self {
            database_url,
            dataset_path,
            bind_address,
            model_seed,
            model_trees,
            test_fraction,
        })
    }
}

/// Reads and parses an optional environment variable.
fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(None),
    }
}
