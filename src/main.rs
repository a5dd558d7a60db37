//! enginegen CLI entrypoint
//! Parses command-line arguments and runs the generation pipeline.
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use enginegen::{GeneratorConfig, Language, pipeline};

#[derive(Parser)]
#[command(name = "enginegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the engine API schema document (JSON)
    schema: PathBuf,

    /// Overlay document merged onto the schema before ingestion; defaults
    /// to a `{stem}_change.json` sibling of the schema when one exists
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Generator configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target language; repeatable (csharp, typescript). Both when omitted
    #[arg(long = "language", value_parser = parse_language)]
    languages: Vec<Language>,

    /// Namespace for the generated output
    #[arg(long)]
    namespace: Option<String>,

    /// Output directory for the C# run
    #[arg(long)]
    output_csharp: Option<PathBuf>,

    /// Output directory for the TypeScript run
    #[arg(long)]
    output_typescript: Option<PathBuf>,

    /// Concatenate each language's output into one module file
    #[arg(long)]
    bundle: bool,

    /// Skip description doc comments in the generated output
    #[arg(long)]
    no_descriptions: bool,
}

fn parse_language(s: &str) -> Result<Language, enginegen::Error> {
    s.parse()
}

fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    info!("Starting enginegen");

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(namespace) = cli.namespace {
        config.namespace = namespace;
    }
    if let Some(dir) = cli.output_csharp {
        config.output_csharp = Some(dir);
    }
    if let Some(dir) = cli.output_typescript {
        config.output_typescript = Some(dir);
    }
    if cli.bundle {
        config.bundle = true;
    }
    if cli.no_descriptions {
        config.use_descriptions = false;
    }

    let languages = if cli.languages.is_empty() {
        vec![Language::CSharp, Language::TypeScript]
    } else {
        cli.languages
    };

    let written = pipeline::run(&cli.schema, cli.overlay.as_deref(), &config, &languages)
        .context("Generation failed")?;
    info!(files = written.len(), "Generation finished");
    Ok(())
}
