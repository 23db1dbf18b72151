//! Entry point for the mapres analyzer.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap` and set up logging.
//! 2. Load the project file and register its configurations.
//! 3. Ingest every entry file.
//! 4. Resolve conflicts, build the projection and write the report.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mapres::analyzer::{Analyzer, Options};
use mapres::config::Config;
use mapres::project::{load_entries, load_project};
use mapres::writer::write_report;

fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log level '{}'", config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut analyzer = Analyzer::new(Options {
        remove_unmatched: config.remove_unmatched,
        strict: config.strict,
    });

    for configuration in load_project(&config.project)? {
        analyzer.add_configuration(configuration)?;
    }

    // 1. Ingest (translate, classify, order)
    for path in &config.entries {
        let raws = load_entries(path)?;
        tracing::info!("{}: {} record(s)", path.display(), raws.len());
        analyzer.ingest_all(&raws)?;
    }

    // 2. Canonicalize sections and objects
    analyzer.resolve()?;

    // 3. Project and write
    let report = analyzer.report()?;
    write_report(&config.output, &report)?;

    println!(
        "Wrote {} configuration(s) to {} ({} warning(s))",
        report.configurations.len(),
        config.output.display(),
        report.warnings
    );
    Ok(())
}
