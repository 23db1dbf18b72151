//! Address space management.
//!
//! An `AddressSpace` is the validated catalog of physical memory regions of
//! one configuration. It is built once from the raw project description and
//! then used to classify physical addresses into regions.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;

use crate::project::AddressValue;
use crate::utils::parse_offset;

/// Region description as written in the project file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRegion {
    pub name: String,
    pub start: AddressValue,
    /// Inclusive.
    pub end: AddressValue,
    #[serde(rename = "type")]
    pub mem_type: String,
}

/// Address space description as written in the project file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAddressSpace {
    pub regions: Vec<RawRegion>,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// A physical memory region with inclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub start: u64,
    pub end: u64,
    pub mem_type: String,
}

impl Region {
    pub fn contains(&self, address: u64) -> bool {
        self.start <= address && address <= self.end
    }

    pub fn overlaps(&self, other: &Region) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// The validated memory regions of one configuration, in configured order.
#[derive(Debug, Clone, Default)]
pub struct AddressSpace {
    regions: Vec<Region>,
    offset: i64,
}

impl AddressSpace {
    /// Builds an address space from regions in their configured order.
    pub fn new(regions: Vec<Region>, offset: i64) -> Result<Self> {
        let mut names = HashSet::new();
        for region in &regions {
            if region.end < region.start {
                bail!(
                    "memory region '{}' ends ({:#x}) before it starts ({:#x})",
                    region.name,
                    region.end,
                    region.start
                );
            }
            if !names.insert(region.name.as_str()) {
                bail!("duplicate memory region '{}'", region.name);
            }
        }

        let space = Self { regions, offset };
        for (first, second) in space.overlapping_regions() {
            tracing::warn!(
                "memory regions '{}' [{:#x}, {:#x}] and '{}' [{:#x}, {:#x}] overlap; \
                 addresses in both are classified into the one defined last",
                first.name,
                first.start,
                first.end,
                second.name,
                second.start,
                second.end
            );
        }
        Ok(space)
    }

    /// Validates a raw description, dropping ignored regions.
    pub fn from_raw(raw: &RawAddressSpace) -> Result<Self> {
        for ignored in &raw.ignore {
            if !raw.regions.iter().any(|r| &r.name == ignored) {
                tracing::warn!("ignored memory region '{}' is not defined", ignored);
            }
        }

        let mut regions = Vec::with_capacity(raw.regions.len());
        for region in &raw.regions {
            if raw.ignore.contains(&region.name) {
                tracing::debug!("ignoring memory region '{}'", region.name);
                continue;
            }
            regions.push(Region {
                name: region.name.clone(),
                start: region
                    .start
                    .to_u64()
                    .with_context(|| format!("start of memory region '{}'", region.name))?,
                end: region
                    .end
                    .to_u64()
                    .with_context(|| format!("end of memory region '{}'", region.name))?,
                mem_type: region.mem_type.clone(),
            });
        }

        let offset = match &raw.offset {
            Some(text) => parse_offset(text).context("address space offset")?,
            None => 0,
        };
        Self::new(regions, offset)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Applies the global offset to a physical address.
    pub fn apply_offset(&self, address: u64) -> Result<u64> {
        address.checked_add_signed(self.offset).with_context(|| {
            format!(
                "address {:#x} with offset {:#x} leaves the address range",
                address, self.offset
            )
        })
    }

    /// Returns `(region name, memory type)` of the region containing
    /// `address`.
    ///
    /// All regions are visited; when several contain the address the one
    /// defined last wins, regardless of how specific it is.
    pub fn classify(&self, address: u64) -> Option<(&str, &str)> {
        let mut found = None;
        for region in &self.regions {
            if region.contains(address) {
                found = Some((region.name.as_str(), region.mem_type.as_str()));
            }
        }
        found
    }

    /// Every pair of regions whose ranges intersect, in configured order.
    pub fn overlapping_regions(&self) -> Vec<(&Region, &Region)> {
        let mut pairs = Vec::new();
        for (i, first) in self.regions.iter().enumerate() {
            for second in &self.regions[i + 1..] {
                if first.overlaps(second) {
                    pairs.push((first, second));
                }
            }
        }
        pairs
    }
}
