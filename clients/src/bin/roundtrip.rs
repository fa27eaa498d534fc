//! `samm-roundtrip`: Loads an aspect model and writes it back as RDF.
//!
//! **Outputs:**
//! - Turtle (default) or N-Triples, to `--out` or stdout
//!
//! **Usage:**
//! ```text
//! samm-roundtrip <model.ttl> [--format turtle|ntriples] [--out <path>] [--check]
//! ```
//!
//! With `--check`, the written document is reloaded and compared with the
//! first load; any difference exits non-zero.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use samm_clients::{init_tracing, ConfigArgs};
use samm_model::graph::compare::differences;
use samm_model::serializer::{ntriples, serialize_aspect, turtle};
use samm_model::{load_aspect, TripleStore};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Turtle,
    Ntriples,
}

/// Round-trip a SAMM aspect model.
#[derive(Parser)]
#[command(name = "samm-roundtrip", about = "Load a SAMM aspect model and serialize it again")]
struct Args {
    /// Turtle document to load.
    input: PathBuf,

    /// Aspect URN, required when the document declares several aspects.
    #[arg(long)]
    aspect: Option<String>,

    /// Output syntax.
    #[arg(long, value_enum, default_value = "turtle")]
    format: Format,

    /// Output file (default: stdout).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Reload the output and fail on structural differences.
    #[arg(long)]
    check: bool,

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

    let triples = serialize_aspect(&model.graph, model.aspect, &config)
        .context("Failed to serialize the aspect")?;
    let written = match args.format {
        Format::Turtle => turtle::to_turtle(&triples),
        Format::Ntriples => ntriples::to_ntriples(&triples),
    };

    match &args.out {
        Some(path) => {
            fs::write(path, &written).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Written: {} ({} triples)", path.display(), triples.len());
        }
        None => print!("{written}"),
    }

    if args.check {
        let reparsed = TripleStore::from_turtle(&written).context("Written document does not parse")?;
        let reloaded = load_aspect(&reparsed, &config, Some(model.graph.urn(model.aspect)))
            .context("Written document does not reload")?;
        let diff = differences(&model.graph, &reloaded.graph);
        if !diff.is_empty() {
            for line in &diff {
                eprintln!("  {line}");
            }
            eprintln!("Round trip FAILED: {} element(s) differ.", diff.len());
            process::exit(1);
        }
        eprintln!("Round trip OK.");
    }
    Ok(())
}
