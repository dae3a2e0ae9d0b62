//! One search task: search, write, duplicate scan, classify.

use std::path::PathBuf;

use anyhow::Context;
use entorno_core::{AppConfig, Region, SearchTask};
use entorno_places::PlacesClient;
use entorno_store::DedupCache;

/// Result of processing a single `(origin, category)` task.
#[derive(Debug)]
pub(crate) enum TaskOutcome {
    /// A result file already existed.
    Skipped { path: PathBuf },
    /// Results were written (and possibly moved into a region folder).
    Saved {
        path: PathBuf,
        places: usize,
        duplicates: usize,
        region: Option<Region>,
    },
    /// The API returned no places; nothing was written.
    Empty,
    Failed { error: String },
}

/// Search, persist, flag duplicates against the run cache and classify.
///
/// # Errors
///
/// Returns an error if the search fails or the result file cannot be
/// written. Duplicate-report and classification failures are logged only.
pub(crate) async fn run_task(
    client: &PlacesClient,
    config: &AppConfig,
    task: &SearchTask,
    dedup: &mut DedupCache,
) -> anyhow::Result<TaskOutcome> {
    let records =
        entorno_places::search_by_coordinates(client, task.origin.position, &task.category)
            .await
            .with_context(|| format!("search failed for {}", task.filename()))?;

    if records.is_empty() {
        return Ok(TaskOutcome::Empty);
    }

    let written =
        entorno_store::write_result_set(&config.results_dir, &task.filename(), &records)
            .with_context(|| format!("failed to write {}", task.filename()))?;

    // Only persisted places enter the run cache.
    let mut duplicates = 0;
    for record in &records {
        if let Some(report) = dedup.observe(record) {
            duplicates += 1;
            tracing::warn!(
                name = %record.name,
                category = %task.category,
                kind = ?report.kind,
                "possible duplicate place"
            );
            if let Err(e) = report.write(&config.problems_dir) {
                tracing::warn!(error = %e, "failed to write duplicate report");
            }
        }
    }

    let (path, region) = match entorno_store::classify_and_move(&config.results_dir, &written) {
        Ok(outcome) => (outcome.path, outcome.region),
        Err(e) => {
            tracing::warn!(path = %written.display(), error = %e, "region classification failed");
            (written, None)
        }
    };

    Ok(TaskOutcome::Saved {
        path,
        places: records.len(),
        duplicates,
        region,
    })
}
