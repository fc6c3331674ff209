//! Declaration-level analysis of C/C++ headers.
//!
//! # Components
//!
//! - `decl_extractor`: recognizes function/method/class/struct/concept
//!   signatures in sanitized source lines
//! - `scope`: tracks class bodies, access levels and brace depth across
//!   lines of one file
//!
//! # Example Usage
//!
//! ```ignore
//! use hdrscan_core::decl::{extract_declarations, ExtractMode};
//!
//! let content = std::fs::read_to_string("List.H")?;
//! for decl in extract_declarations("List.H", &content, ExtractMode::All) {
//!     println!("{}:{} {} {}", decl.file, decl.line, decl.kind.as_str(), decl.name);
//! }
//! ```

pub mod decl_extractor;
pub mod scope;

pub use decl_extractor::{extract_declarations, DeclKind, Declaration, ExtractMode, Visibility};
pub use scope::{Access, ScopeFrame, ScopeStack};
