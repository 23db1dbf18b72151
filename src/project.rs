//! Project and input files.
//!
//! The project file describes every analyzed configuration: its physical
//! address space and, for virtual address spaces, the monolith table used to
//! translate them. Entry files carry the raw records extracted from map files
//! by an external parser. Both are JSON and are read through a memory map.

use anyhow::{bail, Context, Result};
use memmap2::Mmap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use crate::address_space::{AddressSpace, RawAddressSpace};
use crate::translate::monolith::{MonolithTable, RawMonolithEntry};
use crate::utils::parse_address;

/// An address written as an integer or as a (hex or decimal) string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AddressValue {
    Int(u64),
    Text(String),
}

impl AddressValue {
    pub fn to_u64(&self) -> Result<u64> {
        match self {
            AddressValue::Int(value) => Ok(*value),
            AddressValue::Text(text) => parse_address(text),
        }
    }
}

impl From<u64> for AddressValue {
    fn from(value: u64) -> Self {
        AddressValue::Int(value)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    pub configurations: Vec<RawConfiguration>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfiguration {
    pub id: String,
    pub memory: RawAddressSpace,
    /// VAS name to the monolith segments belonging to it.
    #[serde(default)]
    pub virtual_sections: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub monolith: Vec<RawMonolithEntry>,
}

/// A validated configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub id: String,
    pub address_space: AddressSpace,
    pub virtual_sections: BTreeMap<String, Vec<String>>,
    pub monolith: MonolithTable,
}

impl Configuration {
    pub fn new(id: &str, address_space: AddressSpace) -> Self {
        Self {
            id: id.to_string(),
            address_space,
            virtual_sections: BTreeMap::new(),
            monolith: MonolithTable::default(),
        }
    }

    pub fn from_raw(raw: &RawConfiguration) -> Result<Self> {
        if raw.id.trim().is_empty() {
            bail!("configuration id must not be empty");
        }
        let address_space = AddressSpace::from_raw(&raw.memory)
            .with_context(|| format!("address space of configuration '{}'", raw.id))?;
        let monolith = MonolithTable::from_raw(&raw.monolith)
            .with_context(|| format!("monolith table of configuration '{}'", raw.id))?;
        if !raw.virtual_sections.is_empty() && monolith.is_empty() {
            tracing::warn!(
                "configuration '{}' declares virtual address spaces but no monolith table",
                raw.id
            );
        }
        Ok(Self {
            id: raw.id.clone(),
            address_space,
            virtual_sections: raw.virtual_sections.clone(),
            monolith,
        })
    }
}

/// A record as produced by the map file parser.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEntry {
    pub config_id: String,
    pub mapfile: String,
    pub section_name: String,
    #[serde(default)]
    pub object_name: String,
    pub address_start: AddressValue,
    #[serde(default)]
    pub address_length: Option<AddressValue>,
    /// Inclusive; used when no length is given.
    #[serde(default)]
    pub address_end: Option<AddressValue>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub vas_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl RawEntry {
    /// Parses start and length, deriving the length from the end if needed.
    pub fn address_range(&self) -> Result<(u64, u64)> {
        let start = self.address_start.to_u64()?;
        let length = match (&self.address_length, &self.address_end) {
            (Some(length), _) => length.to_u64()?,
            (None, Some(end)) => {
                let end = end.to_u64()?;
                if end < start {
                    bail!("end address {:#x} lies before start {:#x}", end, start);
                }
                end - start + 1
            }
            (None, None) => bail!("neither length nor end address given"),
        };
        if length > 0 && start.checked_add(length - 1).is_none() {
            bail!("range {:#x} + {:#x} exceeds the address space", start, length);
        }
        Ok((start, length))
    }
}

fn map_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    // Read-only mapping of an input file nobody is expected to modify meanwhile.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("failed to map {}", path.display()))?;
    Ok(mmap)
}

pub fn parse_project(bytes: &[u8]) -> Result<Vec<Configuration>> {
    let project: ProjectFile = serde_json::from_slice(bytes)?;
    let mut configurations = Vec::with_capacity(project.configurations.len());
    for raw in &project.configurations {
        if configurations.iter().any(|c: &Configuration| c.id == raw.id) {
            bail!("duplicate configuration '{}'", raw.id);
        }
        configurations.push(Configuration::from_raw(raw)?);
    }
    Ok(configurations)
}

pub fn load_project(path: &Path) -> Result<Vec<Configuration>> {
    let mmap = map_file(path)?;
    parse_project(&mmap).with_context(|| format!("failed to load project {}", path.display()))
}

pub fn load_entries(path: &Path) -> Result<Vec<RawEntry>> {
    let mmap = map_file(path)?;
    serde_json::from_slice(&mmap)
        .with_context(|| format!("failed to parse entries {}", path.display()))
}
