//! Batch collection: every origin × every category, one task at a time.
//!
//! Per-task failures are logged and counted rather than propagated so one
//! bad coordinate or API hiccup does not abort the whole batch. Completed
//! result files make a rerun resume where the previous one stopped.

mod task;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use entorno_core::{AppConfig, Origin, SearchTask};
use entorno_places::PlacesClient;
use entorno_store::DedupCache;
use tracing::Instrument;
use uuid::Uuid;

pub(crate) use task::{run_task, TaskOutcome};

use crate::categories::load_category_table;

/// Arguments of the `collect` command after CLI parsing.
#[derive(Debug, Clone)]
pub(crate) struct CollectArgs {
    pub input: PathBuf,
    pub throttle_ms: u64,
    pub max_origins: Option<usize>,
    pub types: Option<String>,
    pub skip_existing: bool,
    pub pair_cols: Vec<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct BatchOptions {
    pub throttle: Duration,
    pub max_origins: Option<usize>,
    pub skip_existing: bool,
}

/// Counters reported at the end of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub run_id: Uuid,
    pub origins: usize,
    pub categories: usize,
    pub attempted: usize,
    pub skipped: usize,
    pub succeeded: usize,
    /// Tasks for which the API returned no places.
    pub empty: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub results_dir: PathBuf,
}

impl RunSummary {
    fn new(run_id: Uuid, origins: usize, categories: usize, results_dir: PathBuf) -> Self {
        Self {
            run_id,
            origins,
            categories,
            attempted: 0,
            skipped: 0,
            succeeded: 0,
            empty: 0,
            failed: 0,
            duplicates: 0,
            results_dir,
        }
    }

    fn print(&self) {
        println!();
        println!("Run {} finished", self.run_id);
        println!(
            "  origins: {}  categories: {}",
            self.origins, self.categories
        );
        println!(
            "  attempted: {}  skipped: {}  succeeded: {}  empty: {}  failed: {}",
            self.attempted, self.skipped, self.succeeded, self.empty, self.failed
        );
        println!("  possible duplicates: {}", self.duplicates);
        println!("  results: {}", self.results_dir.display());
    }
}

fn selected_origins(origins: &[Origin], max_origins: Option<usize>) -> &[Origin] {
    match max_origins {
        Some(max) => &origins[..max.min(origins.len())],
        None => origins,
    }
}

/// Run every `(origin, category)` task sequentially.
///
/// Tasks whose result file already exists are skipped without any request
/// when `skip_existing` is set. The throttle delay follows every attempted
/// task.
pub(crate) async fn run_batch(
    client: &PlacesClient,
    config: &AppConfig,
    origins: &[Origin],
    categories: &[String],
    options: &BatchOptions,
) -> RunSummary {
    let run_id = Uuid::new_v4();
    let origins = selected_origins(origins, options.max_origins);
    let span = tracing::info_span!("batch", run_id = %run_id);

    async move {
        let mut summary =
            RunSummary::new(run_id, origins.len(), categories.len(), config.results_dir.clone());
        let mut dedup = DedupCache::new();

        tracing::info!(
            origins = origins.len(),
            categories = categories.len(),
            "starting batch"
        );

        for (i, origin) in origins.iter().enumerate() {
            println!(
                "\u{25b6} origin {}/{}: {} ({})",
                i + 1,
                origins.len(),
                origin.label(),
                origin.position
            );

            for category in categories {
                let task = SearchTask::new(origin.clone(), category.clone());
                let outcome = process(client, config, &task, &mut dedup, options).await;
                report(&task, &outcome);

                match outcome {
                    TaskOutcome::Skipped { .. } => {
                        summary.skipped += 1;
                        continue;
                    }
                    TaskOutcome::Saved { duplicates, .. } => {
                        summary.succeeded += 1;
                        summary.duplicates += duplicates;
                    }
                    TaskOutcome::Empty => summary.empty += 1,
                    TaskOutcome::Failed { .. } => summary.failed += 1,
                }
                summary.attempted += 1;

                if !options.throttle.is_zero() {
                    tokio::time::sleep(options.throttle).await;
                }
            }
        }

        tracing::info!(
            attempted = summary.attempted,
            skipped = summary.skipped,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch finished"
        );
        summary
    }
    .instrument(span)
    .await
}

async fn process(
    client: &PlacesClient,
    config: &AppConfig,
    task: &SearchTask,
    dedup: &mut DedupCache,
    options: &BatchOptions,
) -> TaskOutcome {
    if options.skip_existing {
        if let Some(path) =
            entorno_store::find_existing(&config.results_dir, &task.category, task.origin.position)
        {
            return TaskOutcome::Skipped { path };
        }
    }

    match run_task(client, config, task, dedup).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let error = format!("{e:#}");
            tracing::error!(
                origin = %task.origin.position,
                category = %task.category,
                error = %error,
                "task failed"
            );
            TaskOutcome::Failed { error }
        }
    }
}

fn report(task: &SearchTask, outcome: &TaskOutcome) {
    match outcome {
        TaskOutcome::Skipped { path } => {
            println!("  - {:<20} already done ({})", task.category, path.display());
        }
        TaskOutcome::Saved {
            path,
            places,
            region,
            ..
        } => {
            let region = region.map_or("unclassified", |r| r.as_str());
            println!(
                "  \u{2713} {:<20} {:>3} places  [{region}]  {}",
                task.category,
                places,
                path.display()
            );
        }
        TaskOutcome::Empty => println!("  \u{2713} {:<20}   0 places", task.category),
        TaskOutcome::Failed { error } => println!("  \u{2717} {:<20} {error}", task.category),
    }
}

fn print_dry_run(config: &AppConfig, origins: &[Origin], categories: &[String], skip: bool) {
    println!(
        "dry-run: {} origin(s) × {} categor(ies) = {} task(s)",
        origins.len(),
        categories.len(),
        origins.len() * categories.len()
    );
    for origin in origins {
        println!("  {} ({})", origin.label(), origin.position);
        for category in categories {
            let task = SearchTask::new(origin.clone(), category.clone());
            let done = skip
                && entorno_store::already_done(&config.results_dir, category, origin.position);
            let marker = if done { " (skip: exists)" } else { "" };
            println!("    {}{marker}", task.filename());
        }
    }
}

/// Entry point of the `collect` command.
///
/// # Errors
///
/// Returns an error if the input table or category table cannot be read,
/// no category resolves, or the API client cannot be built. Per-task
/// failures only show up in the summary.
pub(crate) async fn run_collect(config: &AppConfig, args: &CollectArgs) -> anyhow::Result<()> {
    let pair_filter = (!args.pair_cols.is_empty()).then_some(args.pair_cols.as_slice());
    let origins = entorno_store::read_origins(&args.input, pair_filter)
        .with_context(|| format!("failed to read origins from {}", args.input.display()))?;

    let table = load_category_table(config)?;
    let categories = entorno_core::resolve_categories(args.types.as_deref(), &table);
    if categories.is_empty() {
        anyhow::bail!("no categories selected");
    }

    let selected = selected_origins(&origins, args.max_origins);
    if args.dry_run {
        print_dry_run(config, selected, &categories, args.skip_existing);
        return Ok(());
    }

    let client = PlacesClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build places client: {e}"))?;

    println!(
        "Collecting {} categor(ies) around {} origin(s)...",
        categories.len(),
        selected.len()
    );

    let options = BatchOptions {
        throttle: Duration::from_millis(args.throttle_ms),
        max_origins: args.max_origins,
        skip_existing: args.skip_existing,
    };
    let summary = run_batch(&client, config, &origins, &categories, &options).await;
    summary.print();
    Ok(())
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
