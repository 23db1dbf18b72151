//! Report writer.
//!
//! This module writes the resolved collections, the objects-in-sections view
//! and the consumption totals as one JSON document for the reporting tools.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::entry::MemoryEntry;
use crate::summary::RegionSummary;

#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationReport {
    pub id: String,
    pub summary: Vec<RegionSummary>,
    pub sections: Vec<MemoryEntry>,
    pub objects: Vec<MemoryEntry>,
    pub objects_in_sections: Vec<MemoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Recoverable problems met while ingesting.
    pub warnings: usize,
    pub configurations: Vec<ConfigurationReport>,
}

/// Write a report to disk.
pub fn write_report(output_path: &Path, report: &Report) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
