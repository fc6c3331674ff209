//! Diff-scoped documentation checking.
//!
//! Restricts the declaration extractor to public declarations on lines a
//! diff added, and classifies each as documented or undocumented with the
//! backward doc-comment scan.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::decl::{extract_declarations, Declaration, ExtractMode, Visibility};
use crate::doccheck::doc_comment::doc_comment_before;

/// Documentation status for the public declarations a diff touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocCoverage {
    pub documented: Vec<Declaration>,
    pub undocumented: Vec<Declaration>,
}

impl DocCoverage {
    pub fn total(&self) -> usize {
        self.documented.len() + self.undocumented.len()
    }

    /// Percentage of documented declarations; 0.0 when there are none.
    /// Callers treat "no declarations" as trivially passing.
    pub fn percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        100.0 * self.documented.len() as f64 / total as f64
    }

    pub fn extend(&mut self, other: DocCoverage) {
        self.documented.extend(other.documented);
        self.undocumented.extend(other.undocumented);
    }
}

/// Checks doc coverage of one file against its set of added line numbers.
///
/// Declarations are extracted in `All` mode (prototypes in a header deserve
/// documentation just as much as inline definitions), restricted to public
/// ones whose signature line was added by the diff.
pub fn check_doc_coverage(file: &str, text: &str, added_lines: &BTreeSet<usize>) -> DocCoverage {
    let raw_lines: Vec<&str> = text.lines().collect();
    let mut coverage = DocCoverage::default();

    for decl in extract_declarations(file, text, ExtractMode::All) {
        if decl.visibility != Visibility::Public {
            continue;
        }
        if !added_lines.contains(&decl.line) {
            continue;
        }
        if doc_comment_before(&raw_lines, decl.line) {
            coverage.documented.push(decl);
        } else {
            coverage.undocumented.push(decl);
        }
    }

    coverage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added(lines: &[usize]) -> BTreeSet<usize> {
        lines.iter().copied().collect()
    }

    #[test]
    fn test_documented_added_declaration() {
        let text = "/// Sorts in place.\nvoid sort(V & v);\n";
        let coverage = check_doc_coverage("List.H", text, &added(&[2]));
        assert_eq!(coverage.documented.len(), 1);
        assert!(coverage.undocumented.is_empty());
        assert_eq!(coverage.documented[0].name, "sort");
    }

    #[test]
    fn test_undocumented_added_declaration() {
        let text = "void sort(V & v);\n";
        let coverage = check_doc_coverage("List.H", text, &added(&[1]));
        assert_eq!(coverage.undocumented.len(), 1);
        assert_eq!(coverage.percentage(), 0.0);
    }

    #[test]
    fn test_untouched_declarations_ignored() {
        let text = "void old_one(int x);\nvoid fresh(int y);\n";
        let coverage = check_doc_coverage("List.H", text, &added(&[2]));
        assert_eq!(coverage.total(), 1);
        assert_eq!(coverage.undocumented[0].name, "fresh");
    }

    #[test]
    fn test_non_public_declarations_ignored() {
        let text = "class C {\n  void hidden_new();\npublic:\n  void shown_new();\n};\n";
        let coverage = check_doc_coverage("C.H", text, &added(&[2, 4]));
        assert_eq!(coverage.total(), 1);
        assert_eq!(coverage.undocumented[0].name, "shown_new");
    }

    #[test]
    fn test_template_header_between_doc_and_decl() {
        let text = "/// Does X.\ntemplate <typename T>\nT maximum(T a, T b);\n";
        let coverage = check_doc_coverage("Algo.H", text, &added(&[3]));
        assert_eq!(coverage.documented.len(), 1);
    }

    #[test]
    fn test_no_added_declarations_is_empty() {
        let text = "/// Doc.\nvoid f();\n";
        let coverage = check_doc_coverage("A.H", text, &added(&[]));
        assert_eq!(coverage.total(), 0);
        assert_eq!(coverage.percentage(), 0.0);
    }

    #[test]
    fn test_percentage_mix() {
        let text = "/// Doc.\nvoid a();\nvoid b();\n";
        let coverage = check_doc_coverage("A.H", text, &added(&[2, 3]));
        assert_eq!(coverage.total(), 2);
        assert!((coverage.percentage() - 50.0).abs() < 1e-9);
    }
}
