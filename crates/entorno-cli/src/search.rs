//! The `search` command: a single task outside any batch.

use entorno_core::{AppConfig, Origin, SearchTask};
use entorno_places::PlacesClient;
use entorno_store::DedupCache;

use crate::categories::load_category_table;
use crate::collect::{run_task, TaskOutcome};

/// Run one search and print where the result went.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the search fails, or the
/// result cannot be written.
pub(crate) async fn run_search(
    config: &AppConfig,
    lat: f64,
    lng: f64,
    category: &str,
) -> anyhow::Result<()> {
    let table = load_category_table(config)?;
    let Some(code) = entorno_core::resolve_categories(Some(category), &table)
        .into_iter()
        .next()
    else {
        anyhow::bail!("empty category");
    };

    let client = PlacesClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build places client: {e}"))?;
    let task = SearchTask::new(Origin::new(lat, lng), code);
    let mut dedup = DedupCache::new();

    match run_task(&client, config, &task, &mut dedup).await? {
        TaskOutcome::Saved {
            path,
            places,
            duplicates,
            ..
        } => {
            println!("{places} place(s) saved to {}", path.display());
            if duplicates > 0 {
                println!(
                    "{duplicates} possible duplicate(s) reported in {}",
                    config.problems_dir.display()
                );
            }
        }
        TaskOutcome::Empty => {
            println!("no {} found near {}", task.category, task.origin.position);
        }
        TaskOutcome::Skipped { path } => println!("already done: {}", path.display()),
        TaskOutcome::Failed { error } => anyhow::bail!(error),
    }
    Ok(())
}
