//! Diff-scoped documentation gate.
//!
//! # Components
//!
//! - `diff`: unified-diff hunk parsing into added post-diff line numbers
//! - `doc_comment`: bounded backward scan for a doc-style comment
//! - `checker`: joins both with the declaration extractor into
//!   documented/undocumented rows

pub mod checker;
pub mod diff;
pub mod doc_comment;

pub use checker::{check_doc_coverage, DocCoverage};
pub use diff::{parse_added_lines, parse_added_lines_by_file};
pub use doc_comment::doc_comment_before;
