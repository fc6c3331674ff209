//! Coverage matrix construction: declarations joined against call references.
//!
//! This is a pure filter join, not a graph traversal: a callee name that is
//! not among the declared names is ignored, and each declaration collects
//! the distinct scope labels that reference its name.
//!
//! Performance characteristics:
//! - Build: O(|D| + |C|) hash joins, D = declarations, C = call references
//! - Output ordered by `(name, line, file)` for deterministic reports

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::calls::CallReference;
use crate::decl::Declaration;

/// One declaration with every scope that references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRow {
    pub decl: Declaration,
    /// Distinct referencing scope labels, ordered.
    pub scopes: BTreeSet<String>,
}

/// Aggregate counters over a coverage report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageStats {
    pub total_declarations: usize,
    pub referenced: usize,
    pub unreferenced: usize,
    /// Number of distinct scope labels across all rows.
    pub distinct_scopes: usize,
}

/// A file the run could not analyze; excluded from the aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Full result of a coverage-matrix run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub rows: Vec<CoverageRow>,
    /// Declarations with an empty scope set, in row order.
    pub unreferenced: Vec<Declaration>,
    pub stats: CoverageStats,
    pub skipped: Vec<SkippedFile>,
}

/// Joins declarations with call references into per-declaration rows.
///
/// Rows are ordered by `(name, line, file)`. Two declarations of the same
/// name at different lines are distinct identities: both get a row, and
/// both appear in the unreferenced list when nothing references the name.
pub fn build_matrix(declarations: &[Declaration], calls: &[CallReference]) -> CoverageReport {
    let declared: HashSet<&str> = declarations.iter().map(|d| d.name.as_str()).collect();

    let mut scopes_by_name: HashMap<&str, BTreeSet<String>> = HashMap::new();
    for call in calls {
        if declared.contains(call.callee.as_str()) {
            scopes_by_name
                .entry(call.callee.as_str())
                .or_default()
                .insert(call.scope.clone());
        }
    }

    let mut rows: Vec<CoverageRow> = declarations
        .iter()
        .map(|decl| CoverageRow {
            decl: decl.clone(),
            scopes: scopes_by_name.get(decl.name.as_str()).cloned().unwrap_or_default(),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.decl
            .name
            .cmp(&b.decl.name)
            .then(a.decl.line.cmp(&b.decl.line))
            .then(a.decl.file.cmp(&b.decl.file))
    });

    let unreferenced: Vec<Declaration> = rows
        .iter()
        .filter(|r| r.scopes.is_empty())
        .map(|r| r.decl.clone())
        .collect();

    let distinct_scopes: usize = rows
        .iter()
        .flat_map(|r| r.scopes.iter())
        .collect::<BTreeSet<_>>()
        .len();

    let stats = CoverageStats {
        total_declarations: rows.len(),
        referenced: rows.len() - unreferenced.len(),
        unreferenced: unreferenced.len(),
        distinct_scopes,
    };

    CoverageReport { rows, unreferenced, stats, skipped: Vec::new() }
}
