//! `samm-load`: Loads an aspect model and prints a summary of its element graph.
//!
//! **Usage:**
//! ```text
//! samm-load <model.ttl> [--aspect <urn>] [--config <file>] [--json]
//! ```
//!
//! Exits non-zero if the document does not parse or has no loadable aspect.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use samm_clients::{init_tracing, ConfigArgs};
use samm_model::{load_aspect, TripleStore};

/// Load a SAMM aspect model.
#[derive(Parser)]
#[command(name = "samm-load", about = "Load a SAMM aspect model and summarize it")]
struct Args {
    /// Turtle document to load.
    input: PathBuf,

    /// Aspect URN, required when the document declares several aspects.
    #[arg(long)]
    aspect: Option<String>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    loader: ConfigArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.loader.resolve()?;

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let store = TripleStore::from_turtle(&source)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    let model = load_aspect(&store, &config, args.aspect.as_deref())
        .with_context(|| format!("Failed to load an aspect from {}", args.input.display()))?;

    let graph = &model.graph;
    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for id in graph.all_elements() {
        if let Some(element) = graph.element(id) {
            *kinds.entry(element.kind.label()).or_default() += 1;
        }
    }
    let diagnostics: Vec<String> = graph.diagnostics().iter().map(ToString::to_string).collect();

    if args.json {
        let summary = serde_json::json!({
            "aspect": graph.urn(model.aspect),
            "elements": graph.len(),
            "kinds": kinds,
            "diagnostics": diagnostics,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
        return Ok(());
    }

    println!("Aspect {}", graph.urn(model.aspect));
    if let Some(aspect) = model.aspect() {
        println!(
            "  {} properties, {} operations, {} events",
            aspect.structure.properties.len(),
            aspect.operations.len(),
            aspect.events.len()
        );
    }
    println!("  {} elements", graph.len());
    for (kind, count) in &kinds {
        println!("    {kind}: {count}");
    }
    if !diagnostics.is_empty() {
        println!("  {} diagnostic(s):", diagnostics.len());
        for diagnostic in &diagnostics {
            println!("    {diagnostic}");
        }
    }
    Ok(())
}
