//! CLI entry point for the subway export tool.
//!
//! Reads a validated city-set document, runs the transformation pipeline,
//! and writes the routing client's schema as a single JSON file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use subway_export::cache::CityCache;
use subway_export::model::InputDocument;
use subway_export::output::write_schema;
use subway_export::transform::assembler::process;

#[derive(Parser)]
#[command(name = "subway-export")]
#[command(about = "Converts a validated rail-transit city set into a routing schema", long_about = None)]
struct Cli {
    /// Validated input document (cities and transfers)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file for the export document
    #[arg(short, long, default_value = "subways.json")]
    output: PathBuf,

    /// Optional per-city cache file, read at start and written back at end
    #[arg(long)]
    cache: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading input file {}", cli.input.display()))?;
    let document: InputDocument = serde_json::from_str(&raw)
        .with_context(|| format!("parsing input file {}", cli.input.display()))?;

    info!(
        cities = document.cities.len(),
        transfers = document.transfers.len(),
        "input loaded"
    );

    let cache = match &cli.cache {
        Some(path) => Some(CityCache::load(path)?),
        None => None,
    };

    let schema = process(&document.cities, &document.transfers, cache.as_ref())?;
    write_schema(&cli.output, &schema)?;

    if let (Some(path), Some(cache)) = (&cli.cache, &cache) {
        cache.save(path)?;
    }

    Ok(())
}
