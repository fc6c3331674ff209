//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use hdrscan_core::prelude::*;
//! ```

// Core analysis types
pub use crate::decl::{extract_declarations, DeclKind, Declaration, ExtractMode, Visibility};

// Call cross-referencing
pub use crate::calls::{extract_calls, CallReference, GLOBAL_SCOPE};

// Coverage matrix
pub use crate::coverage::{build_matrix, CoverageReport, CoverageRow};

// Documentation gate
pub use crate::doccheck::{check_doc_coverage, parse_added_lines, DocCoverage};

// Run orchestration
pub use crate::builder::{DocGateReport, Hdrscan};

// Errors
pub use crate::error::{HdrscanError, HdrscanResult};

// Configuration
pub use crate::config::{load_config, HdrscanConfig};
