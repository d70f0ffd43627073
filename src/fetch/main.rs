//! Overpass fetch stage.
//!
//! Queries points of interest inside a bounding box, flattens them into
//! place records and writes the intermediate spreadsheet.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use placesync::normalize::Normalizer;
use placesync::overpass::{BoundingBox, OverpassClient, OverpassQuery};
use placesync::{table, Config};

#[derive(Parser, Debug)]
#[command(name = "fetch")]
#[command(about = "Fetch points of interest from Overpass into a spreadsheet")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (.xlsx or .csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overpass interpreter URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Bounding box as south,west,north,east
    #[arg(long)]
    bbox: Option<BoundingBox>,

    /// Print the Overpass query and exit
    #[arg(long)]
    print_query: bool,

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
    if let Some(output) = args.output {
        config.output.path = output;
    }
    if let Some(endpoint) = args.endpoint {
        config.overpass.endpoint = endpoint;
    }
    if let Some(bbox) = args.bbox {
        config.overpass.bbox = bbox;
    }
    config.validate()?;

    let query = OverpassQuery {
        bbox: config.overpass.bbox,
        filters: config.overpass.filters.clone(),
        timeout: config.overpass.timeout,
    }
    .render();

    if args.print_query {
        print!("{}", query);
        return Ok(());
    }

    info!("Placesync Fetch");
    info!("Bounding box: {}", config.overpass.bbox);

    let client = OverpassClient::new(&config.overpass.endpoint)?;
    let elements = client.query(&query).await?;

    let normalizer = Normalizer::new(&config.mapping);
    let records = normalizer.normalize_all(&elements);

    table::write_records(&config.output.path, &records).with_context(|| {
        format!("Failed to write {}", config.output.path.display())
    })?;

    info!(
        "Saved {} places to {}",
        records.len(),
        config.output.path.display()
    );

    Ok(())
}
