//! Configuration module.
//!
//! This module defines the command-line interface (CLI) using `clap`.
//! It handles the project file, the entry files produced by the map file
//! parser, the output path and the policies for recoverable problems.

use clap::Parser;
use std::path::PathBuf;

/// Resolves linker map records against the memory layout of embedded targets.
///
/// Records are translated into physical memory, classified into the configured
/// regions and cleaned of duplicated, contained and overlapping ranges. The
/// result is written as a JSON report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Project file describing configurations, address spaces and VAS tables
    #[arg(short, long)]
    pub project: PathBuf,

    /// Entry files (JSON arrays of raw records)
    #[arg(short, long = "entries", required = true, num_args = 1..)]
    pub entries: Vec<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "report.json", help = "Path to the JSON report")]
    pub output: PathBuf,

    /// Drop records outside every memory region instead of tagging them
    #[arg(long)]
    pub remove_unmatched: bool,

    /// Treat translation warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}
