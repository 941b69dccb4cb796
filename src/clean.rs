//! Build-artifact and cache removal.
//!
//! Patterns mirror the Python packaging layout this tool drives: setuptools
//! build output, egg metadata, bytecode caches, pytest/coverage leftovers.
//! A pattern that matches nothing is a no-op, not an error.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::util::fs::remove_path;

/// Removal targets, in order. A trailing slash marks directory-only
/// patterns; the `**/` prefix expands recursively below the project root.
pub const CLEAN_PATTERNS: &[&str] = &[
    "build/",
    "dist/",
    "*.egg-info/",
    "__pycache__/",
    "**/__pycache__/",
    ".pytest_cache/",
    ".coverage",
    "htmlcov/",
    "*.pyc",
    "**/*.pyc",
    "*.pyo",
    "**/*.pyo",
];

/// Match a single path component against a pattern body ("build",
/// "*.egg-info", "*.pyc"). Only leading-star wildcards occur in the table.
fn name_matches(name: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        name.ends_with(suffix) && name.len() > suffix.len()
    } else {
        name == pattern
    }
}

fn pattern_parts(pattern: &str) -> (&str, bool, bool) {
    let (body, recursive) = match pattern.strip_prefix("**/") {
        Some(rest) => (rest, true),
        None => (pattern, false),
    };
    let (body, dir_only) = match body.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (body, false),
    };
    (body, recursive, dir_only)
}

/// Collect every path under `root` the pattern table selects for removal.
/// Recursive patterns may select entries nested under non-recursive ones;
/// removal tolerates that (a vanished child is simply not counted).
pub fn collect_artifacts(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = Vec::new();

    for pattern in CLEAN_PATTERNS {
        let (body, recursive, dir_only) = pattern_parts(pattern);
        if recursive {
            for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
                if entry.path() == root {
                    continue;
                }
                let name = entry.file_name().to_string_lossy();
                if !name_matches(&name, body) {
                    continue;
                }
                if dir_only && !entry.file_type().is_dir() {
                    continue;
                }
                out.push(entry.path().to_path_buf());
            }
        } else {
            let entries = match std::fs::read_dir(root) {
                Ok(it) => it,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            for entry in entries.filter_map(|e| e.ok()) {
                let name = entry.file_name().to_string_lossy().to_string();
                if !name_matches(&name, body) {
                    continue;
                }
                if dir_only && !entry.path().is_dir() {
                    continue;
                }
                out.push(entry.path());
            }
        }
    }

    out.sort();
    out.dedup();
    Ok(out)
}

/// Remove all matching artifacts. Returns the number of files/directories
/// actually removed; running twice removes zero the second time.
pub fn remove_artifacts(root: &Path) -> io::Result<usize> {
    let mut removed = 0usize;
    for p in collect_artifacts(root)? {
        // A parent directory matched earlier may already have taken this
        // entry with it; remove_path reports that as a non-removal.
        if remove_path(&p)? {
            removed += 1;
        }
    }
    Ok(removed)
}
