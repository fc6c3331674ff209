//! Unified-diff parsing: which post-diff line numbers were added.
//!
//! Only the destination side matters. A hunk header `@@ -a,b +c,d @@` seeds
//! a running new-file line counter at `c`; `+` lines mark the counter and
//! advance it, `-` lines do not advance it, context lines advance it
//! without marking. Lines before the first recognized hunk header cannot be
//! attributed to any new-file line and are ignored rather than allowed to
//! desynchronize the counter.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

fn hunk_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^@@ -\d+(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("hardcoded regex pattern is valid")
    })
}

fn file_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\+\+\+ (?:b/)?(.+)$").expect("hardcoded regex pattern is valid")
    })
}

/// True for diff bookkeeping lines that carry no file content.
fn is_diff_metadata(line: &str) -> bool {
    line.starts_with("+++")
        || line.starts_with("---")
        || line.starts_with("diff --git")
        || line.starts_with("index ")
        || line.starts_with("\\ No newline")
}

/// Parses added post-diff line numbers out of unified-diff text.
pub fn parse_added_lines(diff_text: &str) -> BTreeSet<usize> {
    let mut added = BTreeSet::new();
    let mut cur_new: Option<usize> = None;

    for line in diff_text.lines() {
        if let Some(caps) = hunk_header_regex().captures(line) {
            cur_new = caps[1].parse().ok();
            continue;
        }

        let Some(n) = cur_new else { continue };
        if is_diff_metadata(line) {
            continue;
        }

        if line.starts_with('+') {
            added.insert(n);
            cur_new = Some(n + 1);
        } else if line.starts_with('-') {
            // deletion: no advance on the destination line counter
        } else {
            cur_new = Some(n + 1);
        }
    }

    added
}

/// Splits a multi-file unified diff into per-file added-line sets.
///
/// File boundaries come from `+++ b/<path>` headers; `+++ /dev/null`
/// (deleted files) contributes nothing. Within each file the accounting is
/// [`parse_added_lines`]'s.
pub fn parse_added_lines_by_file(diff_text: &str) -> BTreeMap<String, BTreeSet<usize>> {
    let mut by_file: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    let mut cur_file: Option<String> = None;
    let mut cur_new: Option<usize> = None;

    for line in diff_text.lines() {
        if let Some(caps) = file_header_regex().captures(line) {
            let path = caps[1].trim().to_string();
            cur_file = if path == "/dev/null" { None } else { Some(path) };
            cur_new = None;
            continue;
        }

        let Some(file) = cur_file.as_ref() else { continue };

        if let Some(caps) = hunk_header_regex().captures(line) {
            cur_new = caps[1].parse().ok();
            continue;
        }

        let Some(n) = cur_new else { continue };
        if is_diff_metadata(line) {
            continue;
        }

        if line.starts_with('+') {
            by_file.entry(file.clone()).or_default().insert(n);
            cur_new = Some(n + 1);
        } else if line.starts_with('-') {
            // deletion
        } else {
            cur_new = Some(n + 1);
        }
    }

    by_file
}
