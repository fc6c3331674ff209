//! Parallel, deterministic file discovery with efficient directory pruning.
//!
//! Performance optimizations:
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Parallel file processing via Rayon's `par_bridge`
//! - Minimal work in parallel threads (only an extension check)
//!
//! Also hosts the path filter deciding which changed files the doc gate
//! looks at: library headers outside test, example, documentation and build
//! trees.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as C/C++ library headers.
pub const HEADER_EXTS: &[&str] = &["h", "H", "hpp", "hxx", "hh"];

/// Extensions treated as C++ test sources.
pub const TEST_SOURCE_EXTS: &[&str] = &["cc", "cpp", "cxx", "C"];

/// Directories to exclude from any walk.
const EXCLUDED_DIRS: &[&str] = &[".git", ".github", "docs", "scripts", "Testing", "node_modules"];

/// Top-level directories whose headers are out of scope for the doc gate.
const EXCLUDED_TOP_LEVEL: &[&str] = &["Tests", "Examples", "docs", ".github", "scripts", "Testing"];

/// Directory-name prefixes always pruned (out-of-tree build residue).
const EXCLUDED_DIR_PREFIXES: &[&str] = &["build", "cmake-build-"];

/// Checks if a directory entry should be pruned (excluded from traversal).
///
/// Called by `WalkDir::filter_entry`; runs sequentially but enables O(1)
/// subtree skipping for excluded directories.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| {
            excludes.contains(name) || EXCLUDED_DIR_PREFIXES.iter().any(|p| name.starts_with(p))
        })
}

fn gather_by_extension(
    root: &Path,
    exts: &[&str],
    excludes: &HashSet<&str>,
) -> Result<Vec<PathBuf>> {
    let mut files = WalkDir::new(root)
        .into_iter()
        // filter_entry prunes entire subtrees before iteration
        .filter_entry(|e| !is_excluded_dir(e, excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                let wanted = path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| exts.contains(&ext));
                if wanted {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .context(format!("Failed to gather files from {}", root.display()))?;

    // par_bridge yields in nondeterministic order
    files.sort();
    Ok(files)
}

/// Gathers library header files under `root`, pruning excluded directories
/// plus the test/example trees and any custom excludes.
pub fn gather_header_files(root: &Path, extra_excludes: &[String]) -> Result<Vec<PathBuf>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(EXCLUDED_TOP_LEVEL.iter().copied())
        .chain(extra_excludes.iter().map(String::as_str))
        .collect();
    gather_by_extension(root, HEADER_EXTS, &excludes)
}

/// Gathers test source files under `root` (typically a `Tests/` tree).
pub fn gather_test_sources(root: &Path, extra_excludes: &[String]) -> Result<Vec<PathBuf>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(extra_excludes.iter().map(String::as_str))
        .collect();
    gather_by_extension(root, TEST_SOURCE_EXTS, &excludes)
}

/// Is this repository-relative path a library header the doc gate cares
/// about? Expects `/`-separated paths as they appear in diff output.
pub fn in_scope_header(path: &str) -> bool {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    if !HEADER_EXTS.contains(&ext) {
        return false;
    }

    let parts: Vec<&str> = path.split('/').collect();
    let Some(first) = parts.first() else {
        return false;
    };
    if EXCLUDED_TOP_LEVEL.contains(first) {
        return false;
    }
    if parts
        .iter()
        .any(|p| EXCLUDED_DIR_PREFIXES.iter().any(|prefix| p.starts_with(prefix)))
    {
        return false;
    }

    true
}
