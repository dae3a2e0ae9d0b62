//! Category table loading and the `categories` command.

use entorno_core::{AppConfig, Category};

/// The active category table: the YAML file when present, else the built-in table.
///
/// # Errors
///
/// Returns an error if the configured file exists but is unreadable or invalid.
pub(crate) fn load_category_table(config: &AppConfig) -> anyhow::Result<Vec<Category>> {
    if config.categories_path.is_file() {
        let table = entorno_core::load_categories(&config.categories_path)?;
        tracing::debug!(
            path = %config.categories_path.display(),
            count = table.len(),
            "loaded category table"
        );
        Ok(table)
    } else {
        Ok(entorno_core::default_categories())
    }
}

pub(crate) fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let table = load_category_table(config)?;
    for category in &table {
        println!("  {:<24} {}", category.label, category.code);
    }
    println!("{} categories", table.len());
    Ok(())
}
