//! Output formatting - plaintext, JSON and Markdown.
//!
//! Rendering concerns live here, out of the analysis core: scope lists are
//! truncated for display and long undocumented lists are capped, but the
//! underlying reports always carry everything.

use serde_json::json;

use crate::builder::DocGateReport;
use crate::coverage::CoverageReport;

/// Undocumented declarations listed before the summary truncates.
const MAX_LISTED_DECLS: usize = 200;

/// Referencing scopes shown per row before the list truncates.
const MAX_SCOPES_SHOWN: usize = 5;

fn scope_list(scopes: &std::collections::BTreeSet<String>) -> String {
    if scopes.is_empty() {
        return "unreferenced".to_string();
    }
    let shown: Vec<&str> = scopes.iter().take(MAX_SCOPES_SHOWN).map(String::as_str).collect();
    let extra = scopes.len().saturating_sub(MAX_SCOPES_SHOWN);
    if extra > 0 {
        format!("{} (+{} more)", shown.join(", "), extra)
    } else {
        shown.join(", ")
    }
}

/// Prints a coverage matrix in plain text format.
pub fn print_coverage_plain(report: &CoverageReport) {
    if report.rows.is_empty() {
        println!("No declarations found.");
        return;
    }

    println!(
        "DECLARATIONS ({} total, {} referenced, {} unreferenced):",
        report.stats.total_declarations, report.stats.referenced, report.stats.unreferenced
    );
    for row in &report.rows {
        println!(
            "- {}:{} {} `{}` [{}]",
            row.decl.file,
            row.decl.line,
            row.decl.kind.as_str(),
            row.decl.name,
            scope_list(&row.scopes)
        );
    }
    for skip in &report.skipped {
        println!("! skipped {}: {}", skip.path, skip.reason);
    }
}

/// Renders a coverage matrix as a Markdown document.
pub fn coverage_markdown(report: &CoverageReport) -> String {
    let mut lines = Vec::new();
    lines.push("## Header Test Coverage".to_string());
    lines.push(String::new());
    lines.push(format!("- Declarations: **{}**", report.stats.total_declarations));
    lines.push(format!("- Referenced: **{}**", report.stats.referenced));
    lines.push(format!("- Unreferenced: **{}**", report.stats.unreferenced));
    lines.push(format!("- Distinct test scopes: **{}**", report.stats.distinct_scopes));
    lines.push(String::new());
    lines.push("| Declaration | Kind | Location | Referencing scopes |".to_string());
    lines.push("|---|---|---|---|".to_string());
    for row in &report.rows {
        lines.push(format!(
            "| `{}` | {} | `{}:{}` | {} |",
            row.decl.name,
            row.decl.kind.as_str(),
            row.decl.file,
            row.decl.line,
            scope_list(&row.scopes)
        ));
    }

    if !report.unreferenced.is_empty() {
        lines.push(String::new());
        lines.push("Unreferenced declarations:".to_string());
        for decl in report.unreferenced.iter().take(MAX_LISTED_DECLS) {
            lines.push(format!("- `{}:{}` ({} `{}`)", decl.file, decl.line, decl.kind.as_str(), decl.name));
        }
        let extra = report.unreferenced.len().saturating_sub(MAX_LISTED_DECLS);
        if extra > 0 {
            lines.push(format!("- ... and {extra} more"));
        }
    }

    lines.join("\n") + "\n"
}

/// Prints a coverage matrix in JSON format.
///
/// Falls back to a minimal object if serialization fails (should never
/// happen with these types, but rendering must not panic the run).
pub fn print_coverage_json(report: &CoverageReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{}", json!({ "total": report.stats.total_declarations }));
        }
    }
}

/// Prints a doc-gate result in plain text format.
pub fn print_doc_gate_plain(report: &DocGateReport) {
    if report.total() == 0 {
        println!("No in-scope changed public declarations.");
        return;
    }

    println!(
        "Documented declarations: {}/{} ({:.2}%, min {}%)",
        report.coverage.documented.len(),
        report.total(),
        report.percentage(),
        report.min
    );
    for decl in report.coverage.undocumented.iter().take(MAX_LISTED_DECLS) {
        println!(
            "undocumented: {}:{} ({} {})",
            decl.file,
            decl.line,
            decl.kind.as_str(),
            decl.name
        );
    }
    let extra = report.coverage.undocumented.len().saturating_sub(MAX_LISTED_DECLS);
    if extra > 0 {
        println!("... and {extra} more");
    }
}

/// Renders a doc-gate result as the Markdown summary posted by CI.
pub fn doc_gate_markdown(report: &DocGateReport) -> String {
    let mut lines = Vec::new();
    lines.push("## Header Docstring Coverage".to_string());
    lines.push(String::new());
    lines.push(format!("- Diff range: `{}`", report.diff_range));
    lines.push(format!("- In-scope changed headers: **{}**", report.files.len()));
    lines.push(format!(
        "- Covered declarations: **{}/{}**",
        report.coverage.documented.len(),
        report.total()
    ));
    lines.push(format!(
        "- Coverage: **{:.2}%** (min: **{}%**)",
        report.percentage(),
        report.min
    ));
    lines.push(String::new());

    if report.coverage.undocumented.is_empty() {
        lines.push("Result: PASS".to_string());
    } else {
        lines.push("Result: FAIL".to_string());
        lines.push(String::new());
        lines.push("Undocumented changed declarations:".to_string());
        for decl in report.coverage.undocumented.iter().take(MAX_LISTED_DECLS) {
            lines.push(format!(
                "- `{}:{}` ({} `{}`)",
                decl.file,
                decl.line,
                decl.kind.as_str(),
                decl.name
            ));
        }
        let extra = report.coverage.undocumented.len().saturating_sub(MAX_LISTED_DECLS);
        if extra > 0 {
            lines.push(format!("- ... and {extra} more"));
        }
    }

    lines.join("\n") + "\n"
}

/// Prints a doc-gate result in JSON format.
pub fn print_doc_gate_json(report: &DocGateReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{}", json!({ "total": report.total(), "passed": report.passed() }));
        }
    }
}
