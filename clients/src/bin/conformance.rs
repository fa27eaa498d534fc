//! `samm-conformance`: Runs the SAMM conformance suite over a fixture directory.
//!
//! Every `.ttl` document below the directory is checked for:
//! - Turtle well-formedness and SAMM vocabulary version
//! - Round trip through Turtle
//! - Round trip through N-Triples
//!
//! **Usage:**
//! ```text
//! samm-conformance [--fixtures <path>] [--config <file>] [--json]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use samm_clients::{init_tracing, ConfigArgs};
use samm_conformance::run_all;

/// Run the SAMM conformance suite.
#[derive(Parser)]
#[command(
    name = "samm-conformance",
    about = "Validate SAMM aspect model fixtures: Turtle well-formedness and round trip"
)]
struct Args {
    /// Directory searched recursively for `.ttl` fixtures.
    #[arg(long, default_value = "model/tests/fixtures")]
    fixtures: PathBuf,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    loader: ConfigArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.loader.resolve()?;

    let report = run_all(&args.fixtures, &config)?;
    let summary = report.summary();

    if args.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        println!("SAMM Conformance Report");
        println!("=======================");
        println!();
        for result in &report.results {
            println!(
                "[{}] {} {}: {}",
                result.severity.label(),
                result.validator,
                result.fixture,
                result.message
            );
            for detail in &result.details {
                println!("       {detail}");
            }
        }
        println!();
        println!(
            "Summary: {} passed, {} warnings, {} failed",
            summary.passed, summary.warned, summary.failed
        );
    }

    if summary.failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", summary.failed);
        process::exit(1);
    }

    if !args.json {
        println!("Conformance PASSED.");
    }
    Ok(())
}
