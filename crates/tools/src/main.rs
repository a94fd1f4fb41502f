use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use foundation::math::unproject;
use tools::{CliResult, Inputs, load_config, pick_at, summarize};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Inspect a visited-places globe without a display.
#[derive(Debug, Parser)]
#[command(name = "footprint", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the region registry and print counts.
    Summary {
        #[command(flatten)]
        data: DataArgs,
        /// Emit JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Report the region picked at a latitude/longitude.
    Pick {
        #[command(flatten)]
        data: DataArgs,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

#[derive(Debug, Args)]
struct DataArgs {
    /// Country-level GeoJSON FeatureCollection.
    #[arg(long)]
    base: PathBuf,
    /// Subdivision GeoJSON for the detailed country.
    #[arg(long)]
    detailed: Option<PathBuf>,
    /// JSON array of visited region ids.
    #[arg(long)]
    visited: Option<PathBuf>,
    /// Partial GlobeConfig overrides as JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Summary { data, json } => {
            let config = load_config(data.config.as_deref())?;
            let inputs = load_inputs(&data)?;
            let registry = inputs.build(&config);
            let summary = summarize(&registry, &inputs.visited, &config);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("regions:          {}", summary.regions);
                println!("visited:          {}", summary.visited_regions);
                println!("filled:           {}", summary.filled_regions);
                println!("subdivisions:     {}", summary.subdivisions);
                println!("primitives:       {}", summary.primitives);
                println!("features seen:    {}", summary.features_seen);
                println!("features skipped: {}", summary.features_skipped);
                println!("degenerate rings: {}", summary.degenerate_rings);
                println!("fallback discs:   {}", summary.fallback_discs);
                for id in &summary.unmatched_visited {
                    println!("unmatched visited id: {id}");
                }
            }
        }
        Command::Pick { data, lat, lon } => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(format!("position out of range: lat={lat} lon={lon}").into());
            }
            let config = load_config(data.config.as_deref())?;
            let inputs = load_inputs(&data)?;
            let registry = inputs.build(&config);
            match pick_at(&registry, &config, lat, lon) {
                Some(id) => {
                    let region = registry.by_id(id);
                    let visited = region.is_some_and(|r| r.visited);
                    println!("{}", scene::region_label(id, visited));
                    if let Some((clat, clon)) = region.and_then(|r| unproject(r.centroid)) {
                        println!("centroid: {clat:.3}, {clon:.3}");
                    }
                }
                None => println!("no region"),
            }
        }
    }
    Ok(())
}

fn load_inputs(data: &DataArgs) -> CliResult<Inputs> {
    Inputs::load(
        &data.base,
        data.detailed.as_deref(),
        data.visited.as_deref(),
    )
}
