//! The `matrix` command: walking distance and time from each result file's
//! origin to every place in it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use entorno_core::AppConfig;
use entorno_places::PlacesClient;
use entorno_store::{augmented_sibling, list_plain_results, write_matrix_problem, MatrixSource};

#[derive(Debug)]
pub(crate) enum FileOutcome {
    Augmented(PathBuf),
    /// Nothing to do: no rows, or an augmented sibling already exists.
    Skipped,
    /// The request or response was unusable; a report was written.
    Problem(PathBuf),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct MatrixSummary {
    pub augmented: usize,
    pub skipped: usize,
    pub problems: usize,
    pub failed: usize,
}

fn problem(
    config: &AppConfig,
    source: &MatrixSource,
    detail: &str,
) -> anyhow::Result<FileOutcome> {
    let report = write_matrix_problem(
        &config.problems_dir,
        &source.path,
        source.origin,
        source.destinations.len(),
        detail,
    )?;
    tracing::warn!(
        path = %source.path.display(),
        report = %report.display(),
        "distance matrix unusable, original kept"
    );
    Ok(FileOutcome::Problem(report))
}

fn is_newer(path: &Path, than: &Path) -> std::io::Result<bool> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(modified > fs::metadata(than)?.modified()?)
}

/// Augment a single result file.
///
/// A plain file whose augmented sibling is at least as recent is removed
/// without a request. A newer plain file is augmented again and replaces it.
///
/// # Errors
///
/// Returns an error on local I/O failures. API and response-shape failures
/// become [`FileOutcome::Problem`].
pub(crate) async fn augment_file(
    client: &PlacesClient,
    config: &AppConfig,
    path: &Path,
) -> anyhow::Result<FileOutcome> {
    let sibling = augmented_sibling(path);
    if sibling.is_file() {
        if !is_newer(path, &sibling)? {
            // Left over from an interrupted replacement; the augmented copy wins.
            fs::remove_file(path)?;
            tracing::info!(path = %path.display(), "removed stale original of augmented file");
            return Ok(FileOutcome::Skipped);
        }
        tracing::info!(path = %path.display(), "result collected again, replacing augmented file");
    }

    let source = MatrixSource::load(path)?;
    if source.is_empty() {
        return Ok(FileOutcome::Skipped);
    }

    let body = match client
        .distance_matrix(source.origin, &source.destinations)
        .await
    {
        Ok(body) => body,
        Err(e) => return problem(config, &source, &format!("request failed: {e}")),
    };

    match entorno_places::parse_distance_matrix(&body, source.destinations.len()) {
        Ok(legs) => {
            let out = source.write_augmented(&legs)?;
            Ok(FileOutcome::Augmented(out))
        }
        Err(e) => {
            let raw = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
            problem(config, &source, &format!("{e}\n\nResponse:\n{raw}"))
        }
    }
}

/// Augment every plain result file under the results tree.
pub(crate) async fn augment_all(
    client: &PlacesClient,
    config: &AppConfig,
    throttle: Duration,
) -> MatrixSummary {
    let mut summary = MatrixSummary::default();
    let files = list_plain_results(&config.results_dir);
    tracing::info!(files = files.len(), "starting distance augmentation");

    for path in files {
        match augment_file(client, config, &path).await {
            Ok(FileOutcome::Skipped) => {
                summary.skipped += 1;
                continue;
            }
            Ok(FileOutcome::Augmented(out)) => {
                summary.augmented += 1;
                println!("  \u{2713} {}", out.display());
            }
            Ok(FileOutcome::Problem(report)) => {
                summary.problems += 1;
                println!("  \u{2717} {} (see {})", path.display(), report.display());
            }
            Err(e) => {
                summary.failed += 1;
                let error = format!("{e:#}");
                tracing::error!(path = %path.display(), error = %error, "augmentation failed");
                println!("  \u{2717} {}: {error}", path.display());
                continue;
            }
        }
        if !throttle.is_zero() {
            tokio::time::sleep(throttle).await;
        }
    }
    summary
}

/// Entry point of the `matrix` command.
///
/// # Errors
///
/// Returns an error if the API client cannot be built.
pub(crate) async fn run_matrix(config: &AppConfig, throttle_ms: u64) -> anyhow::Result<()> {
    let client = PlacesClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build places client: {e}"))?;

    let summary = augment_all(&client, config, Duration::from_millis(throttle_ms)).await;
    println!();
    println!(
        "augmented: {}  skipped: {}  problems: {}  failed: {}",
        summary.augmented, summary.skipped, summary.problems, summary.failed
    );
    Ok(())
}
