//! hdrscan-core: lexical C/C++ header analysis library.
//!
//! Recovers structural facts from C/C++-family source text — declared
//! functions, classes, their visibility, and where they are referenced —
//! without a compiler front end. Two consumers drive it:
//!
//! - **Coverage matrix**: maps declarations in library headers to the test
//!   scopes (`TEST`/`TEST_F` blocks) that call them
//! - **Documentation gate**: maps newly added public declarations in a diff
//!   to whether a doc comment precedes them
//!
//! Both share the same machinery: a layout-preserving comment/literal
//! sanitizer, a literal-aware balanced-paren matcher, and a regex +
//! brace-counting declaration extractor with a class scope stack. The
//! engine trades soundness for simplicity on purpose — no preprocessor, no
//! symbol table, no AST — and every miss is a silent discard, never a
//! fatal error.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use hdrscan_core::prelude::*;
//!
//! let report = Hdrscan::new("/path/to/library")
//!     .test_root("Tests")
//!     .coverage_matrix()?;
//!
//! for row in &report.rows {
//!     println!("{} referenced from {} scopes", row.decl.name, row.scopes.len());
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`sanitize`]: comment/literal blanking and balanced-paren matching
//! - [`decl`]: declaration extraction with class scope tracking
//! - [`calls`]: call references attributed to test scopes
//! - [`coverage`]: declaration × call-reference matrix
//! - [`doccheck`]: diff parsing and doc-comment classification
//! - [`scan`]: parallel file discovery
//! - [`builder`]: fluent run API
//! - [`report`]: plain/JSON/Markdown rendering
//! - [`error`]: typed error handling

pub mod builder;
pub mod calls;
pub mod config;
pub mod coverage;
pub mod decl;
pub mod doccheck;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod sanitize;
pub mod scan;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{HdrscanError, HdrscanResult, IoResultExt};

// Builder API
pub use builder::{DocGateReport, Hdrscan, DEFAULT_MIN_COVERAGE};

// Configuration
pub use config::{load_config, HdrscanConfig, OutputConfig};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Sanitization
pub use sanitize::{find_closing_paren, sanitize};

// Declarations
pub use decl::{extract_declarations, DeclKind, Declaration, ExtractMode, Visibility};

// Call references
pub use calls::{extract_call_names, extract_calls, CallReference, GLOBAL_SCOPE};

// Coverage matrix
pub use coverage::{build_matrix, CoverageReport, CoverageRow, CoverageStats, SkippedFile};

// Documentation gate
pub use doccheck::{
    check_doc_coverage, doc_comment_before, parse_added_lines, parse_added_lines_by_file,
    DocCoverage,
};

// Reporting
pub use report::{
    coverage_markdown, doc_gate_markdown, print_coverage_json, print_coverage_plain,
    print_doc_gate_json, print_doc_gate_plain,
};

// File scanning
pub use scan::{
    gather_header_files, gather_test_sources, in_scope_header, HEADER_EXTS, TEST_SOURCE_EXTS,
};
