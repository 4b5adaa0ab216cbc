//! Path normalization utilities.
//!
//! Pure functions for path manipulation. No side effects.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding normal component.
///
/// Unlike `canonicalize()` this never touches the file system, so a path
/// keeps the same identity after the file it names is deleted.
///
/// # Example
/// ```ignore
/// assert_eq!(clean_path(Path::new("a/./b/../c.html")), PathBuf::from("a/c.html"));
/// ```
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Join `reference` onto `base`, treating a rooted reference as relative.
///
/// `Path::join` would let `/parts/nav.html` replace `base` entirely; here
/// root and prefix components are dropped so it lands under `base`.
pub fn join_relative(base: &Path, reference: &Path) -> PathBuf {
    let tail: PathBuf = reference
        .components()
        .filter(|c| {
            matches!(
                c,
                Component::Normal(_) | Component::ParentDir | Component::CurDir
            )
        })
        .collect();
    base.join(tail)
}

/// Resolve a URL tail (e.g. `alpinejs@3.14.8.js`) under `base`, rejecting any
/// path that would escape it.
pub fn join_within(base: &Path, tail: &str) -> Option<PathBuf> {
    let mut out = base.to_path_buf();
    for part in tail.split('/') {
        match part {
            "" | "." => {}
            ".." => return None,
            p if p.contains('\\') => return None,
            p => out.push(p),
        }
    }
    Some(out)
}
