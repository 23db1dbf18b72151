//! Monolith segment table.
//!
//! A monolith table lists, for one virtual address space, how each named
//! virtual segment is placed in physical memory.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{AddressTranslator, Translation};
use crate::project::AddressValue;
use crate::utils::inclusive_end;

/// A monolith row as written in the project file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMonolithEntry {
    pub virtual_start: AddressValue,
    pub physical_start: AddressValue,
    pub size: AddressValue,
    pub section_name: String,
}

/// One virtual segment and where it lives physically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonolithEntry {
    pub virtual_start: u64,
    pub physical_start: u64,
    /// `physical_start - virtual_start`.
    pub offset: i128,
    pub size: u64,
    pub section_name: String,
}

impl MonolithEntry {
    pub fn new(virtual_start: u64, physical_start: u64, size: u64, section_name: &str) -> Self {
        Self {
            virtual_start,
            physical_start,
            offset: physical_start as i128 - virtual_start as i128,
            size,
            section_name: section_name.to_string(),
        }
    }

    /// Inclusive virtual end, `None` for an empty segment.
    pub fn virtual_end(&self) -> Option<u64> {
        inclusive_end(self.virtual_start, self.size)
    }
}

/// An ordered list of monolith entries.
#[derive(Debug, Clone, Default)]
pub struct MonolithTable {
    entries: Vec<MonolithEntry>,
}

impl MonolithTable {
    pub fn new(entries: Vec<MonolithEntry>) -> Self {
        Self { entries }
    }

    pub fn from_raw(raw: &[RawMonolithEntry]) -> Result<Self> {
        let mut entries = Vec::with_capacity(raw.len());
        for (index, row) in raw.iter().enumerate() {
            let context = || format!("monolith entry {} ('{}')", index, row.section_name);
            entries.push(MonolithEntry::new(
                row.virtual_start.to_u64().with_context(context)?,
                row.physical_start.to_u64().with_context(context)?,
                row.size.to_u64().with_context(context)?,
                &row.section_name,
            ));
        }
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[MonolithEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AddressTranslator for MonolithTable {
    /// Scans the table in order and uses the first allowed segment that
    /// contains the whole element. Overlapping segments are not detected.
    fn translate(
        &self,
        virtual_start: u64,
        size: u64,
        allowed_sections: &[String],
    ) -> Option<Translation> {
        let virtual_end = inclusive_end(virtual_start, size.max(1))?;

        for entry in &self.entries {
            if !allowed_sections.contains(&entry.section_name) {
                continue;
            }
            let Some(entry_end) = entry.virtual_end() else {
                continue;
            };
            if entry.virtual_start <= virtual_start && virtual_end <= entry_end {
                let physical = virtual_start as i128 + entry.offset;
                let physical_start = u64::try_from(physical).ok()?;
                return Some(Translation {
                    physical_start,
                    section_name: entry.section_name.clone(),
                });
            }
        }
        None
    }
}
