//! Memory consumption totals.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::entry::{EntryKind, MemoryEntry};

/// Bytes used in one region of one configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub mem_type: String,
    pub section_bytes: u64,
    pub object_bytes: u64,
    /// Section bytes not claimed by any object.
    pub reserve_bytes: u64,
}

/// Sums the current lengths per region. Entries canonicalized away have a
/// length of zero and add nothing.
pub fn summarize(
    sections: &[MemoryEntry],
    objects: &[MemoryEntry],
    objects_in_sections: &[MemoryEntry],
) -> Vec<RegionSummary> {
    let mut regions: BTreeMap<(&str, &str), RegionSummary> = BTreeMap::new();
    let all = sections.iter().chain(objects).chain(
        objects_in_sections
            .iter()
            .filter(|e| e.kind == EntryKind::Reserve),
    );

    for entry in all {
        let summary = regions
            .entry((entry.mem_type_tag.as_str(), entry.mem_type.as_str()))
            .or_insert_with(|| RegionSummary {
                region: entry.mem_type_tag.clone(),
                mem_type: entry.mem_type.clone(),
                ..Default::default()
            });
        match entry.kind {
            EntryKind::Section => summary.section_bytes += entry.address_length,
            EntryKind::Object => summary.object_bytes += entry.address_length,
            EntryKind::Reserve => summary.reserve_bytes += entry.address_length,
            EntryKind::SectionMarker => {}
        }
    }
    regions.into_values().collect()
}
