//! Call-reference extraction from C/C++ test sources.
//!
//! Finds call-like expressions (identifier, optional single-level template
//! argument list, then `(`) and attributes each to the enclosing named test
//! block or to the global sentinel. This is a syntactic approximation: it
//! does not verify the identifier is actually invoked rather than merely
//! named, which is acceptable because results are only ever intersected
//! against a known declaration-name set.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize;

/// Scope label for calls outside any recognized test block.
pub const GLOBAL_SCOPE: &str = "<global>";

/// A call-like expression tied to the scope it appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallReference {
    /// Name of the (apparent) callee.
    pub callee: String,
    /// `"<file>:<suite>.<test>"`, or [`GLOBAL_SCOPE`].
    pub scope: String,
}

fn test_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*TEST(?:_F)?\s*\(\s*([A-Za-z_]\w*)\s*,\s*([A-Za-z_]\w*)\s*\)")
            .expect("hardcoded regex pattern is valid")
    })
}

fn call_site_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z_]\w*)\s*(?:<[^<>]*>)?\s*\(")
            .expect("hardcoded regex pattern is valid")
    })
}

/// Extracts call references from one test source file.
///
/// A `TEST(Suite, Name)` or `TEST_F(Suite, Name)` header switches the scope
/// label to `"<file_label>:<Suite>.<Name>"` and restarts a brace counter;
/// the header line's own braces count, so both `TEST(S, C) {` and a `{` on
/// the following line work. The scope reverts to the global sentinel once
/// the counter is back at zero after at least one closing brace. Calls on a
/// line belong to the scope active while that line is scanned.
pub fn extract_calls(file_label: &str, text: &str) -> Vec<CallReference> {
    let sanitized = sanitize(text);

    let mut refs = Vec::new();
    let mut scope = GLOBAL_SCOPE.to_string();
    let mut depth: i64 = 0;
    let mut seen_close = false;

    for line in sanitized.lines() {
        if let Some(caps) = test_header_regex().captures(line) {
            scope = format!("{file_label}:{}.{}", &caps[1], &caps[2]);
            depth = 0;
            seen_close = false;
        }

        for caps in call_site_regex().captures_iter(line) {
            refs.push(CallReference {
                callee: caps[1].to_string(),
                scope: scope.clone(),
            });
        }

        if scope != GLOBAL_SCOPE {
            let opens = line.bytes().filter(|&b| b == b'{').count() as i64;
            let closes = line.bytes().filter(|&b| b == b'}').count() as i64;
            depth += opens - closes;
            if closes > 0 {
                seen_close = true;
            }
            // At (or, on malformed input, below) the entry depth the test
            // block is over.
            if seen_close && depth <= 0 {
                scope = GLOBAL_SCOPE.to_string();
            }
        }
    }

    refs
}

/// Distinct callee names referenced in a file (simplified interface).
pub fn extract_call_names(file_label: &str, text: &str) -> std::collections::HashSet<String> {
    extract_calls(file_label, text)
        .into_iter()
        .map(|c| c.callee)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scopes_of<'a>(refs: &'a [CallReference], callee: &str) -> Vec<&'a str> {
        refs.iter()
            .filter(|r| r.callee == callee)
            .map(|r| r.scope.as_str())
            .collect()
    }

    #[test]
    fn test_call_inside_test_block() {
        let text = "TEST(Sort, Basic) {\n  quicksort(v);\n}\n";
        let refs = extract_calls("sort_test.cc", text);
        assert_eq!(scopes_of(&refs, "quicksort"), vec!["sort_test.cc:Sort.Basic"]);
    }

    #[test]
    fn test_global_call_keeps_sentinel() {
        let text = "TEST(Sort, Basic) {\n  quicksort(v);\n}\nquicksort(w);\n";
        let refs = extract_calls("sort_test.cc", text);
        assert_eq!(
            scopes_of(&refs, "quicksort"),
            vec!["sort_test.cc:Sort.Basic", GLOBAL_SCOPE]
        );
    }

    #[test]
    fn test_brace_on_next_line() {
        let text = "TEST_F(Fixture, Case)\n{\n  probe();\n}\nafter();\n";
        let refs = extract_calls("t.cc", text);
        assert_eq!(scopes_of(&refs, "probe"), vec!["t.cc:Fixture.Case"]);
        assert_eq!(scopes_of(&refs, "after"), vec![GLOBAL_SCOPE]);
    }

    #[test]
    fn test_nested_braces_stay_in_scope() {
        let text = "TEST(Loop, Deep) {\n  for (int i = 0; i < n; ++i) {\n    touch(i);\n  }\n  done();\n}\n";
        let refs = extract_calls("t.cc", text);
        assert_eq!(scopes_of(&refs, "touch"), vec!["t.cc:Loop.Deep"]);
        assert_eq!(scopes_of(&refs, "done"), vec!["t.cc:Loop.Deep"]);
    }

    #[test]
    fn test_one_line_test_block() {
        let text = "TEST(Quick, One) { ping(); }\npong();\n";
        let refs = extract_calls("t.cc", text);
        assert_eq!(scopes_of(&refs, "ping"), vec!["t.cc:Quick.One"]);
        assert_eq!(scopes_of(&refs, "pong"), vec![GLOBAL_SCOPE]);
    }

    #[test]
    fn test_consecutive_test_blocks() {
        let text = "TEST(A, One) {\n  f();\n}\nTEST(A, Two) {\n  f();\n}\n";
        let refs = extract_calls("t.cc", text);
        assert_eq!(scopes_of(&refs, "f"), vec!["t.cc:A.One", "t.cc:A.Two"]);
    }

    #[test]
    fn test_template_argument_call() {
        let text = "TEST(Gen, T) {\n  maximum<int>(a, b);\n}\n";
        let refs = extract_calls("t.cc", text);
        assert_eq!(scopes_of(&refs, "maximum"), vec!["t.cc:Gen.T"]);
    }

    #[test]
    fn test_calls_in_comments_ignored() {
        let text = "TEST(Doc, Only) {\n  // quicksort(v);\n  /* mergesort(v); */\n  real();\n}\n";
        let refs = extract_calls("t.cc", text);
        assert!(scopes_of(&refs, "quicksort").is_empty());
        assert!(scopes_of(&refs, "mergesort").is_empty());
        assert_eq!(scopes_of(&refs, "real"), vec!["t.cc:Doc.Only"]);
    }

    #[test]
    fn test_calls_in_strings_ignored() {
        let text = "TEST(Str, Lit) {\n  log(\"quicksort(v) failed\");\n}\n";
        let refs = extract_calls("t.cc", text);
        assert!(scopes_of(&refs, "quicksort").is_empty());
        assert_eq!(scopes_of(&refs, "log"), vec!["t.cc:Str.Lit"]);
    }

    #[test]
    fn test_header_call_attributed_to_its_own_scope() {
        // The TEST macro itself matches the call pattern; it lands in the
        // scope it opens and is filtered out by the declaration join anyway.
        let text = "TEST(Sort, Basic) {\n}\n";
        let refs = extract_calls("t.cc", text);
        assert_eq!(scopes_of(&refs, "TEST"), vec!["t.cc:Sort.Basic"]);
    }

    #[test]
    fn test_extract_call_names() {
        let text = "TEST(A, B) {\n  f();\n  g(h(1));\n}\n";
        let names = extract_call_names("t.cc", text);
        assert!(names.contains("f"));
        assert!(names.contains("g"));
        assert!(names.contains("h"));
    }
}
