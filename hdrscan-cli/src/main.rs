//! hdrscan CLI - lexical C/C++ header coverage and doc-gate tool.
//!
//! Features:
//! - Declaration/test-scope coverage matrix over a header library
//! - Diff-scoped documentation gate with a configurable threshold
//! - Plain, JSON and Markdown output
//! - Optional hdrscan.toml configuration
//!
//! Diff text is an input (`--diff-file`, `-` for stdin); this tool never
//! invokes version control itself.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use hdrscan_core::{
    coverage_markdown, doc_gate_markdown, init_structured_logging, load_config,
    print_coverage_json, print_coverage_plain, print_doc_gate_json, print_doc_gate_plain,
    Hdrscan,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Lexical C/C++ header coverage and doc-gate tool")]
pub struct Cli {
    /// Path to the root of the header library
    #[arg(default_value = ".")]
    path: String,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Output results as Markdown
    #[arg(long)]
    markdown: bool,

    /// Header roots relative to the library root
    #[arg(long, num_args = 1..)]
    headers: Vec<String>,

    /// Test-source roots relative to the library root
    #[arg(long, num_args = 1..)]
    tests: Vec<String>,

    /// Extra directory names to exclude from scanning
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// Only print declarations with no referencing test scope
    #[arg(long)]
    unreferenced: bool,

    /// Run the diff-scoped documentation gate instead of the coverage matrix
    #[arg(long)]
    doc_gate: bool,

    /// Unified-diff input for the doc gate ("-" reads stdin)
    #[arg(long, value_name = "FILE")]
    diff_file: Option<String>,

    /// Label of the compared range, echoed in summaries
    #[arg(long, default_value = "")]
    diff_range: String,

    /// Minimum doc-coverage percentage for the gate (default: 80)
    #[arg(long)]
    min: Option<f64>,

    /// Write the Markdown summary to a file
    #[arg(long, value_name = "FILE")]
    summary_file: Option<String>,
}

fn read_diff(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read diff from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read diff file {source}"))
    }
}

fn build_scanner(cli: &Cli) -> Result<Hdrscan> {
    let root = PathBuf::from(&cli.path);
    let mut scan = Hdrscan::new(&root);

    if let Some(cfg) = load_config(&root)? {
        scan = scan.apply_config(&cfg);
    }
    if let Some(min) = cli.min {
        scan = scan.min_coverage(min);
    }
    for h in &cli.headers {
        scan = scan.header_root(h);
    }
    for t in &cli.tests {
        scan = scan.test_root(t);
    }
    for e in &cli.exclude {
        scan = scan.exclude_dir(e);
    }

    Ok(scan)
}

fn run_coverage(cli: &Cli, scan: &Hdrscan) -> Result<ExitCode> {
    let report = scan.coverage_matrix()?;

    if cli.unreferenced {
        for decl in &report.unreferenced {
            println!("{}:{} ({} {})", decl.file, decl.line, decl.kind.as_str(), decl.name);
        }
    } else if cli.json {
        print_coverage_json(&report);
    } else if cli.markdown {
        print!("{}", coverage_markdown(&report));
    } else {
        print_coverage_plain(&report);
    }

    if let Some(path) = &cli.summary_file {
        fs::write(path, coverage_markdown(&report))
            .with_context(|| format!("Failed to write summary to {path}"))?;
    }

    Ok(ExitCode::SUCCESS)
}

fn run_doc_gate(cli: &Cli, scan: &Hdrscan) -> Result<ExitCode> {
    let diff_source = cli
        .diff_file
        .as_deref()
        .ok_or_else(|| anyhow!("--doc-gate requires --diff-file (use '-' for stdin)"))?;
    let diff_text = read_diff(diff_source)?;

    let report = scan.doc_gate(&diff_text, &cli.diff_range)?;

    if cli.json {
        print_doc_gate_json(&report);
    } else if cli.markdown {
        print!("{}", doc_gate_markdown(&report));
    } else {
        print_doc_gate_plain(&report);
    }

    if let Some(path) = &cli.summary_file {
        fs::write(path, doc_gate_markdown(&report))
            .with_context(|| format!("Failed to write summary to {path}"))?;
    }

    if report.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "[fail] header docstring coverage below threshold: {:.2}% < {}%",
            report.percentage(),
            report.min
        );
        Ok(ExitCode::FAILURE)
    }
}

fn main() -> ExitCode {
    init_structured_logging();

    let cli = Cli::parse();

    let result = build_scanner(&cli).and_then(|scan| {
        if cli.doc_gate {
            run_doc_gate(&cli, &scan)
        } else {
            run_coverage(&cli, &scan)
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e:#}");
            ExitCode::FAILURE
        }
    }
}
