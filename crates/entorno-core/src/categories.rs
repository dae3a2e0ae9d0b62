//! Place-type categories: friendly labels mapped to the codes the places API
//! understands.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<Category>,
}

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("escola publica", "school"),
    ("hospital", "hospital"),
    ("cinema", "movie_theater"),
    ("teatro", "theater"),
    ("aeroporto", "airport"),
    ("rodoviaria", "bus_station"),
    ("centro de convenções", "convention_center"),
    ("museu", "museum"),
    ("hotel", "hotel"),
    ("pousada", "guesthouse"),
    ("shopping center", "shopping_center"),
    ("centro comercial", "business"),
    ("varejo", "retail"),
    ("loja", "shop"),
    ("restaurante", "restaurant"),
    ("universidade", "university"),
    ("posto de saude", "health_center"),
];

/// The built-in interest categories used when no categories file exists.
#[must_use]
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(label, code)| Category {
            label: (*label).to_string(),
            code: (*code).to_string(),
        })
        .collect()
}

/// Load and validate the category table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_categories(path: &Path) -> Result<Vec<Category>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CategoriesFile = serde_yaml::from_str(&content)?;
    validate_categories(&file.categories)?;

    Ok(file.categories)
}

fn validate_categories(categories: &[Category]) -> Result<(), ConfigError> {
    let mut seen_labels = HashSet::new();

    for category in categories {
        if category.label.trim().is_empty() || category.code.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category label and code must be non-empty".to_string(),
            ));
        }

        if !seen_labels.insert(category.label.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category label: '{}'",
                category.label
            )));
        }
    }

    Ok(())
}

/// Resolve a user filter into an ordered, duplicate-free list of category codes.
///
/// `filter` is a comma-separated list of labels or raw codes. Labels are
/// matched case-insensitively; anything unknown is passed through as a raw
/// code. An empty or absent filter selects every code in `table`.
#[must_use]
pub fn resolve_categories(filter: Option<&str>, table: &[Category]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    let filter = filter.map(str::trim).filter(|f| !f.is_empty());
    let Some(filter) = filter else {
        for category in table {
            if seen.insert(category.code.clone()) {
                out.push(category.code.clone());
            }
        }
        return out;
    };

    for raw in filter.split(',') {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        let code = table
            .iter()
            .find(|c| c.label.trim().to_lowercase() == key)
            .map_or(key, |c| c.code.clone());
        if seen.insert(code.clone()) {
            out.push(code);
        }
    }

    out
}
