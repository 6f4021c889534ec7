//! Input discovery: expands command line patterns into document paths.

use std::path::PathBuf;

/// Characters that make an argument a glob pattern rather than a path
const GLOB_META: &[char] = &['*', '?', '['];

/// Expand input arguments into paths, keeping argument order.
///
/// Arguments without glob metacharacters are passed through unchanged so a
/// missing file is reported when it is loaded. Patterns expand in the sorted
/// order `glob` yields; patterns that match nothing or do not parse are
/// logged and skipped.
#[must_use]
pub fn discover_inputs<S: AsRef<str>>(patterns: &[S]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        if !pattern.contains(GLOB_META) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let entries = match glob::glob(pattern) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Invalid input pattern {pattern}: {e}");
                continue;
            }
        };

        let before = paths.len();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(path) => tracing::debug!("Skipping {} (not a file)", path.display()),
                Err(e) => tracing::warn!("Cannot read {}: {}", e.path().display(), e.error()),
            }
        }
        if paths.len() == before {
            tracing::warn!("Input pattern {pattern} matched no files");
        }
    }
    paths
}
