//! Memory entry records.
//!
//! A `MemoryEntry` is one contiguous address range owned by a linker output
//! section or by an object placed inside a section. Entries are created once
//! per raw record, after translation to a physical address, and afterwards
//! only mutated by conflict resolution. The address range as it was at
//! construction is kept in a snapshot that nothing can overwrite.

use serde::Serialize;

use crate::utils::inclusive_end;

/// Region tag and type given to entries that match no configured region.
pub const UNKNOWN_REGION: &str = "<unspecified>";

/// Object name suffix of the zero-length marker emitted per section.
pub const SECTION_ENTRY_SUFFIX: &str = "<section entry>";

/// Object name of address ranges inside a section claimed by no object.
pub const SECTION_RESERVE: &str = "<section reserve>";

/// What an entry stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A linker output section.
    Section,
    /// A contribution of one input module to a section.
    Object,
    /// Zero-length copy of a section emitted by the projection.
    SectionMarker,
    /// Part of a section's range not claimed by any object.
    Reserve,
}

/// One address range of a section or object, with its resolution flags.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryEntry {
    pub kind: EntryKind,
    pub config_id: String,
    pub mapfile: String,
    pub section_name: String,
    /// Empty for sections.
    pub object_name: String,
    pub address_start: u64,
    pub address_length: u64,
    address_start_original: u64,
    address_length_original: u64,
    /// Virtual address space this entry was translated from, if any.
    pub vas_name: Option<String>,
    /// Monolith section that matched during translation.
    pub vas_section_name: Option<String>,
    /// Memory type of the region the entry was classified into.
    pub mem_type: String,
    /// Name of that region.
    pub mem_type_tag: String,
    pub category: String,
    pub duplicate: Option<String>,
    pub containment: Option<String>,
    pub overlap: Option<String>,
    pub containing_others: bool,
    pub overlapping_others: bool,
}

impl MemoryEntry {
    /// Creates an entry and snapshots its address range.
    ///
    /// The kind is `Section` when `object_name` is empty, `Object` otherwise.
    pub fn new(
        config_id: &str,
        mapfile: &str,
        section_name: &str,
        object_name: &str,
        address_start: u64,
        address_length: u64,
    ) -> Self {
        let kind = if object_name.is_empty() {
            EntryKind::Section
        } else {
            EntryKind::Object
        };
        Self {
            kind,
            config_id: config_id.to_string(),
            mapfile: mapfile.to_string(),
            section_name: section_name.to_string(),
            object_name: object_name.to_string(),
            address_start,
            address_length,
            address_start_original: address_start,
            address_length_original: address_length,
            vas_name: None,
            vas_section_name: None,
            mem_type: String::new(),
            mem_type_tag: String::new(),
            category: String::new(),
            duplicate: None,
            containment: None,
            overlap: None,
            containing_others: false,
            overlapping_others: false,
        }
    }

    /// Inclusive end address, absent for zero-length entries.
    pub fn address_end(&self) -> Option<u64> {
        inclusive_end(self.address_start, self.address_length)
    }

    pub fn address_start_original(&self) -> u64 {
        self.address_start_original
    }

    pub fn address_length_original(&self) -> u64 {
        self.address_length_original
    }

    pub fn address_end_original(&self) -> Option<u64> {
        inclusive_end(self.address_start_original, self.address_length_original)
    }

    /// Human readable reference used in the resolution flags of other
    /// entries.
    pub fn reference(&self) -> String {
        if self.object_name.is_empty() {
            format!(
                "{}: {} @ {:#x} ({:#x} bytes)",
                self.mapfile,
                self.section_name,
                self.address_start_original,
                self.address_length_original
            )
        } else {
            format!(
                "{}: {}::{} @ {:#x} ({:#x} bytes)",
                self.mapfile,
                self.section_name,
                self.object_name,
                self.address_start_original,
                self.address_length_original
            )
        }
    }
}

/// Inserts `entry` keeping `collection` ascending by `address_start`.
///
/// Among entries with an equal start the insertion point is unspecified;
/// currently it lands after the existing ones.
pub fn insert_sorted(collection: &mut Vec<MemoryEntry>, entry: MemoryEntry) {
    let index = collection.partition_point(|e| e.address_start <= entry.address_start);
    collection.insert(index, entry);
}
