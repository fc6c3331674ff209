//! Builder pattern API for hdrscan analysis.
//!
//! Provides a fluent interface for configuring and running both consumers
//! of the lexical engine:
//!
//! ```rust,ignore
//! use hdrscan_core::prelude::*;
//!
//! let report = Hdrscan::new("/path/to/library")
//!     .test_root("Tests")
//!     .coverage_matrix()?;
//!
//! for decl in &report.unreferenced {
//!     println!("unreferenced: {}:{} {}", decl.file, decl.line, decl.name);
//! }
//! ```
//!
//! Each file's sanitize → extract → cross-reference pipeline is a pure
//! function of that file's text, so files fan out over Rayon with no
//! coordination; results are merged in sorted order for determinism. A file
//! that cannot be read is logged, recorded as skipped and excluded from the
//! aggregates — a single header's access error never aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calls::{extract_calls, CallReference};
use crate::config::HdrscanConfig;
use crate::coverage::{build_matrix, CoverageReport, SkippedFile};
use crate::decl::{extract_declarations, Declaration, ExtractMode};
use crate::doccheck::{check_doc_coverage, parse_added_lines_by_file, DocCoverage};
use crate::scan::{gather_header_files, gather_test_sources, in_scope_header};

/// Default minimum doc-coverage percentage for the gate.
pub const DEFAULT_MIN_COVERAGE: f64 = 80.0;

/// Result of a diff-scoped documentation gate run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocGateReport {
    /// Opaque label of the compared range, echoed in summaries.
    pub diff_range: String,
    /// In-scope changed headers that were analyzed.
    pub files: Vec<String>,
    pub coverage: DocCoverage,
    /// Threshold the gate was run with.
    pub min: f64,
    pub skipped: Vec<SkippedFile>,
}

impl DocGateReport {
    pub fn total(&self) -> usize {
        self.coverage.total()
    }

    pub fn percentage(&self) -> f64 {
        self.coverage.percentage()
    }

    /// No changed public declarations is trivially passing, not a division
    /// fault.
    pub fn passed(&self) -> bool {
        self.total() == 0 || self.percentage() + 1e-9 >= self.min
    }
}

/// Builder for configuring header analysis runs.
#[derive(Debug, Clone)]
pub struct Hdrscan {
    /// Root path of the library to analyze.
    root: PathBuf,

    /// Header roots, relative to `root` (or absolute). Empty means `root`.
    header_roots: Vec<PathBuf>,

    /// Test-source roots, relative to `root` (or absolute). Empty means
    /// `Tests/` under the root when present, else the root itself.
    test_roots: Vec<PathBuf>,

    /// Extra directory names pruned while scanning.
    excluded_dirs: Vec<String>,

    /// Doc-gate threshold percentage.
    min_coverage: f64,
}

impl Hdrscan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            header_roots: Vec::new(),
            test_roots: Vec::new(),
            excluded_dirs: Vec::new(),
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }

    /// Adds a header root (relative to the analyzed root, or absolute).
    pub fn header_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.header_roots.push(path.into());
        self
    }

    /// Adds a test-source root (relative to the analyzed root, or absolute).
    pub fn test_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_roots.push(path.into());
        self
    }

    /// Adds a directory name to prune while scanning.
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.excluded_dirs.push(name.into());
        self
    }

    /// Sets the doc-gate threshold percentage.
    pub fn min_coverage(mut self, pct: f64) -> Self {
        self.min_coverage = pct;
        self
    }

    /// Applies an optional hdrscan.toml on top of the current settings.
    pub fn apply_config(mut self, cfg: &HdrscanConfig) -> Self {
        if let Some(min) = cfg.min {
            self.min_coverage = min;
        }
        if let Some(headers) = &cfg.headers {
            self.header_roots.extend(headers.iter().map(PathBuf::from));
        }
        if let Some(tests) = &cfg.tests {
            self.test_roots.extend(tests.iter().map(PathBuf::from));
        }
        if let Some(exclude) = &cfg.exclude {
            self.excluded_dirs.extend(exclude.iter().cloned());
        }
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn effective_header_roots(&self) -> Vec<PathBuf> {
        if self.header_roots.is_empty() {
            vec![self.root.clone()]
        } else {
            self.header_roots.iter().map(|p| self.resolve(p)).collect()
        }
    }

    fn effective_test_roots(&self) -> Vec<PathBuf> {
        if self.test_roots.is_empty() {
            let tests = self.root.join("Tests");
            if tests.is_dir() {
                vec![tests]
            } else {
                vec![self.root.clone()]
            }
        } else {
            self.test_roots.iter().map(|p| self.resolve(p)).collect()
        }
    }

    /// Label a path relative to the analyzed root for scopes and rows.
    fn label(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Builds the declaration/test-scope coverage matrix.
    ///
    /// Header declarations are extracted in definitions-only mode (the
    /// header-only library policy: a bare prototype has no body to cover).
    pub fn coverage_matrix(&self) -> Result<CoverageReport> {
        let mut headers: Vec<PathBuf> = Vec::new();
        for root in self.effective_header_roots() {
            headers.extend(gather_header_files(&root, &self.excluded_dirs)?);
        }

        let mut test_sources: Vec<PathBuf> = Vec::new();
        for root in self.effective_test_roots() {
            test_sources.extend(gather_test_sources(&root, &self.excluded_dirs)?);
        }

        let mut skipped: Vec<SkippedFile> = Vec::new();

        let header_results: Vec<Result<Vec<Declaration>, SkippedFile>> = headers
            .par_iter()
            .map(|path| {
                let label = self.label(path);
                match fs::read_to_string(path) {
                    Ok(text) => Ok(extract_declarations(&label, &text, ExtractMode::Definitions)),
                    Err(e) => Err(SkippedFile { path: label, reason: e.to_string() }),
                }
            })
            .collect();

        let mut declarations: Vec<Declaration> = Vec::new();
        for result in header_results {
            match result {
                Ok(decls) => declarations.extend(decls),
                Err(skip) => {
                    warn!(path = %skip.path, reason = %skip.reason, "skipping unreadable header");
                    skipped.push(skip);
                }
            }
        }

        let call_results: Vec<Result<Vec<CallReference>, SkippedFile>> = test_sources
            .par_iter()
            .map(|path| {
                let label = self.label(path);
                match fs::read_to_string(path) {
                    Ok(text) => Ok(extract_calls(&label, &text)),
                    Err(e) => Err(SkippedFile { path: label, reason: e.to_string() }),
                }
            })
            .collect();

        let mut calls: Vec<CallReference> = Vec::new();
        for result in call_results {
            match result {
                Ok(refs) => calls.extend(refs),
                Err(skip) => {
                    warn!(path = %skip.path, reason = %skip.reason, "skipping unreadable test source");
                    skipped.push(skip);
                }
            }
        }

        let mut report = build_matrix(&declarations, &calls);
        report.skipped = skipped;
        Ok(report)
    }

    /// Runs the documentation gate over unified-diff text.
    ///
    /// Only in-scope library headers named by the diff are analyzed; each is
    /// read from the analyzed root at its diff path.
    pub fn doc_gate(&self, diff_text: &str, diff_range: &str) -> Result<DocGateReport> {
        let by_file = parse_added_lines_by_file(diff_text);

        let mut files: Vec<String> = Vec::new();
        let mut coverage = DocCoverage::default();
        let mut skipped: Vec<SkippedFile> = Vec::new();

        for (path, added) in &by_file {
            if !in_scope_header(path) || added.is_empty() {
                continue;
            }
            match fs::read_to_string(self.root.join(path)) {
                Ok(text) => {
                    coverage.extend(check_doc_coverage(path, &text, added));
                    files.push(path.clone());
                }
                Err(e) => {
                    warn!(path = %path, reason = %e, "skipping unreadable changed header");
                    skipped.push(SkippedFile { path: path.clone(), reason: e.to_string() });
                }
            }
        }

        Ok(DocGateReport {
            diff_range: diff_range.to_string(),
            files,
            coverage,
            min: self.min_coverage,
            skipped,
        })
    }
}
