//! Call-reference analysis of test sources.
//!
//! # Components
//!
//! - `call_extractor`: finds call-like expressions and attributes them to
//!   `TEST`/`TEST_F` block scopes or the global sentinel

pub mod call_extractor;

pub use call_extractor::{extract_call_names, extract_calls, CallReference, GLOBAL_SCOPE};
