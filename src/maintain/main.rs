//! Maintenance tasks for an imported place collection.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use placesync::maintenance::{prune_category, seed_statuses};
use placesync::mongo::MongoStore;
use placesync::Config;

#[derive(Parser, Debug)]
#[command(name = "maintain")]
#[command(about = "Clean up and enrich imported places")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// MongoDB connection string
    #[arg(long, env = "PLACESYNC_MONGO_URI", global = true)]
    mongo_uri: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Delete places of a category together with their statuses
    Prune {
        #[arg(long, default_value = "tree")]
        category: String,
    },
    /// Create a default status for every place that has none
    SeedStatuses,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(uri) = args.mongo_uri {
        config.database.uri = uri;
    }
    config.validate()?;

    let store = MongoStore::connect(&config.database).await?;

    match args.command {
        Command::Prune { category } => {
            let summary = prune_category(&store, &category).await?;
            info!(
                "Deleted {} '{}' places and {} statuses",
                summary.places, category, summary.statuses
            );
        }
        Command::SeedStatuses => {
            let summary = seed_statuses(&store).await?;
            info!(
                "Created {} statuses ({} places already had one)",
                summary.created, summary.existing
            );
        }
    }

    store.close().await;
    Ok(())
}
