//! Spreadsheet to MongoDB import stage.
//!
//! Reads the file written by `fetch` and inserts every place whose
//! (name, latitude, longitude) is not stored yet.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use placesync::importer::{import_records, DedupStrategy};
use placesync::mongo::MongoStore;
use placesync::{table, Config};

#[derive(Parser, Debug)]
#[command(name = "import")]
#[command(about = "Import places from a spreadsheet into MongoDB, skipping known ones")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input file (.xlsx or .csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// MongoDB connection string
    #[arg(long, env = "PLACESYNC_MONGO_URI")]
    mongo_uri: Option<String>,

    /// Database name
    #[arg(long)]
    database: Option<String>,

    /// Place collection name
    #[arg(long)]
    collection: Option<String>,

    /// How existing places are detected
    #[arg(long, value_enum)]
    strategy: Option<DedupStrategy>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
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
    if let Some(input) = args.input {
        config.output.path = input;
    }
    if let Some(uri) = args.mongo_uri {
        config.database.uri = uri;
    }
    if let Some(name) = args.database {
        config.database.name = name;
    }
    if let Some(collection) = args.collection {
        config.database.collection = collection;
    }
    if let Some(strategy) = args.strategy {
        config.database.strategy = strategy;
    }
    config.validate()?;

    info!("Placesync Import");
    info!("File: {}", config.output.path.display());

    let records = table::read_records(&config.output.path)
        .with_context(|| format!("Failed to read {}", config.output.path.display()))?;

    if records.is_empty() {
        info!("Input file is empty, imported 0 new records");
        return Ok(());
    }
    info!("Read {} records", records.len());

    let store = MongoStore::connect(&config.database).await?;
    info!(
        "Connected to {}.{} ({} documents)",
        store.database,
        store.collection,
        store.doc_count().await?
    );

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let summary = import_records(&store, &records, config.database.strategy, &pb).await?;
    pb.finish_and_clear();

    info!(
        "Imported {} new records into {}.{} ({} already present)",
        summary.inserted, store.database, store.collection, summary.skipped
    );

    store.close().await;
    Ok(())
}
