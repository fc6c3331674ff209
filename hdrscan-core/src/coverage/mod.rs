//! Test-coverage matrix for header declarations.
//!
//! Joins the declaration extractor's output with the call cross-referencer's
//! output into a per-declaration report of referencing test scopes, plus an
//! unreferenced list.

pub mod matrix;

pub use matrix::{build_matrix, CoverageReport, CoverageRow, CoverageStats, SkippedFile};
