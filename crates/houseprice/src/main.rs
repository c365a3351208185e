//! House Price Service
//!
//! Trains a random-forest model on housing data and serves price predictions
//! over HTTP.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use database::{create_pool, run_migrations};
use houseprice::commands;
use ml_model::FeatureVector;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// House price prediction service
#[derive(Parser)]
#[command(name = "houseprice")]
#[command(about = "Random-forest house price predictions over HTTP")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Defaults to `serve`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model and serve the HTTP API
    Serve {
        /// Address to listen on (overrides `BIND_ADDRESS`)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Train the model and report its mean squared error
    Train,

    /// Train the model and predict the price of one house
    Predict {
        /// Number of bedrooms
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        bedrooms: f64,

        /// Number of bathrooms
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        bathrooms: f64,

        /// Lot size in acres
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        acre_lot: f64,
    },

    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber, RUST_LOG wins over the verbosity flag
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().context("Invalid configuration")?;

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            commands::serve::run(&config, bind.unwrap_or(config.bind_address)).await?;
        }
        Commands::Train => {
            commands::train::run(&config).await?;
        }
        Commands::Predict {
            bedrooms,
            bathrooms,
            acre_lot,
        } => {
            let features = FeatureVector::new(bedrooms, bathrooms, acre_lot);
            commands::predict::run(&config, features).await?;
        }
        Commands::Migrate => {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            info!("Migrations completed successfully");
        }
    }

    Ok(())
}
