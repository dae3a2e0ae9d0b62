//! The `concat` command.

use entorno_core::AppConfig;

/// Concatenate result files into `<output_dir>/entorno_<stamp>_<name>.csv`.
///
/// # Errors
///
/// Returns an error if a source cannot be read or the output cannot be written.
pub(crate) fn run_concat(config: &AppConfig, name: &str, include_all: bool) -> anyhow::Result<()> {
    let now = chrono::Local::now().naive_local();
    match entorno_store::concat_results(
        &config.results_dir,
        &config.output_dir,
        name,
        include_all,
        now,
    )? {
        Some(outcome) => println!(
            "{} row(s) from {} file(s) written to {}",
            outcome.rows,
            outcome.files,
            outcome.path.display()
        ),
        None if include_all => println!("no result files found"),
        None => println!("no distance-augmented files found (use --all to include plain results)"),
    }
    Ok(())
}
