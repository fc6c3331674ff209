//! Backward scan for a doc comment preceding a declaration.
//!
//! Real declarations are commonly preceded by template headers, attributes
//! and access specifiers; the scan skips those so a doc comment two or
//! three lines above the signature still counts. The scan runs on raw
//! (unsanitized) lines — the comments are the payload here.

use std::sync::OnceLock;

use regex::Regex;

/// How far above the declaration the scan looks, in raw lines.
const SCAN_LIMIT: usize = 20;

fn access_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(public|private|protected)\s*:\s*$").expect("hardcoded regex pattern is valid")
    })
}

/// A template-parameter continuation line, e.g. `typename U = T,` or
/// `class Alloc>` in a multi-line template header.
fn template_continuation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:typename|class)\b.+(?:,|>|>>)\s*$").expect("hardcoded regex pattern is valid")
    })
}

/// Does this line open a doc-style block comment (`/**` or `/*!`)?
fn opens_doc_block(line: &str) -> bool {
    let s = line.trim_start();
    s.starts_with("/**") || s.starts_with("/*!")
}

/// Is the declaration at `line_1_based` preceded by (or carrying) a
/// doc-style comment?
///
/// Accepts: a trailing `///<` / `//!<` member doc on the declaration line;
/// a `///` / `//!` line doc or `/**` / `/*!` block opener found while
/// scanning upward (skipping blanks, access specifiers, `template <`,
/// `requires`, attribute lines and template-parameter continuations); or a
/// `*/` whose matching opener, found scanning further upward, is doc-style.
/// Any other preceding content — code, a plain comment, or scan exhaustion
/// — classifies the declaration as undocumented.
pub fn doc_comment_before(lines: &[&str], line_1_based: usize) -> bool {
    if line_1_based == 0 {
        return false;
    }
    let idx = line_1_based - 1;
    if idx >= lines.len() {
        return false;
    }

    let here = lines[idx].trim();
    if here.contains("///<") || here.contains("//!<") {
        return true;
    }
    if opens_doc_block(here) {
        return true;
    }

    let mut i = idx as isize - 1;
    while i >= 0 && (idx as isize - i) as usize <= SCAN_LIMIT {
        let s = lines[i as usize].trim();

        if s.is_empty() {
            i -= 1;
            continue;
        }

        if access_line_regex().is_match(s)
            || s.starts_with("template <")
            || s.starts_with("requires ")
            || s.starts_with("[[")
            || s.starts_with("]]")
            || template_continuation_regex().is_match(s)
        {
            i -= 1;
            continue;
        }

        if s.starts_with("///") || s.starts_with("//!") {
            return true;
        }
        if opens_doc_block(s) {
            return true;
        }

        if s.contains("*/") {
            let mut j = i;
            while j >= 0 {
                let t = lines[j as usize].trim();
                if opens_doc_block(t) {
                    return true;
                }
                if t.starts_with("/*") {
                    break;
                }
                j -= 1;
            }
            return false;
        }

        break;
    }

    false
}
