//! URL to static file resolution.

use std::path::{Path, PathBuf};

use crate::utils::path::join_within;

/// Resolve the part of a `/static/` URL after the prefix to a file under
/// `static_dir`. Query strings are ignored, traversal is rejected.
pub fn resolve_static(tail: &str, static_dir: &Path) -> Option<PathBuf> {
    let tail = tail.split(['?', '#']).next().unwrap_or_default();
    let local = join_within(static_dir, tail)?;

    // Canonicalize to resolve symlinks and verify path is under static_dir
    let canonical = local.canonicalize().ok()?;
    let root_canonical = static_dir.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    canonical.is_file().then_some(canonical)
}
