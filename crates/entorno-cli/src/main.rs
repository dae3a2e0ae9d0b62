mod categories;
mod collect;
mod concat;
mod matrix;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "entorno")]
#[command(about = "Collect points of interest around coordinates from the Google Places API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every origin of an input table for every selected category
    Collect {
        /// Input CSV with lat/lng columns or "(Lat, Long)" pair columns
        #[arg(long)]
        input: PathBuf,

        /// Pause between search tasks, in milliseconds
        #[arg(long, default_value_t = 300)]
        throttle_ms: u64,

        /// Process at most this many origins
        #[arg(long)]
        max_origins: Option<usize>,

        /// Comma-separated category labels or raw place types (default: all)
        #[arg(long)]
        types: Option<String>,

        /// Search again even when a result file already exists
        #[arg(long)]
        no_skip: bool,

        /// Only read this pair column header; repeat the flag for several
        #[arg(long)]
        pair_cols: Vec<String>,

        /// Print the task list without calling the API
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a single search task
    Search {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Category label or raw place type
        #[arg(long)]
        category: String,
    },
    /// Append walking distance and duration to every result file
    Matrix {
        /// Pause between distance-matrix requests, in milliseconds
        #[arg(long, default_value_t = 300)]
        throttle_ms: u64,
    },
    /// Concatenate result files into one output table
    Concat {
        /// Label appended to the output filename
        #[arg(long)]
        name: String,

        /// Include files that were not distance-augmented
        #[arg(long)]
        all: bool,
    },
    /// Print the category label → place type table
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = entorno_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Collect {
            input,
            throttle_ms,
            max_origins,
            types,
            no_skip,
            pair_cols,
            dry_run,
        }) => {
            let args = collect::CollectArgs {
                input,
                throttle_ms,
                max_origins,
                types,
                skip_existing: !no_skip,
                pair_cols,
                dry_run,
            };
            collect::run_collect(&config, &args).await?;
        }
        Some(Commands::Search { lat, lng, category }) => {
            search::run_search(&config, lat, lng, &category).await?;
        }
        Some(Commands::Matrix { throttle_ms }) => {
            matrix::run_matrix(&config, throttle_ms).await?;
        }
        Some(Commands::Concat { name, all }) => {
            concat::run_concat(&config, &name, all)?;
        }
        Some(Commands::Categories) => {
            categories::run_categories(&config)?;
        }
        None => println!("entorno: use --help to list commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
