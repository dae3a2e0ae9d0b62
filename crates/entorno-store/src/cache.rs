//! Skip policy: a task is done when its result file exists anywhere under the
//! results tree, plain or distance-augmented.

use std::path::{Path, PathBuf};

use entorno_core::{augmented_filename, make_filename, LatLng};
use walkdir::WalkDir;

/// Path of an existing result file for `(category, origin)`.
#[must_use]
pub fn find_existing(results_dir: &Path, category: &str, origin: LatLng) -> Option<PathBuf> {
    let plain = make_filename(category, origin);
    let augmented = augmented_filename(&plain);

    WalkDir::new(results_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            let name = entry.file_name().to_string_lossy();
            name == plain || name == augmented
        })
        .map(walkdir::DirEntry::into_path)
}

#[must_use]
pub fn already_done(results_dir: &Path, category: &str, origin: LatLng) -> bool {
    find_existing(results_dir, category, origin).is_some()
}
