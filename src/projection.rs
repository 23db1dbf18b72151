//! Objects-in-sections projection.
//!
//! Merges the resolved sections and resolved objects of a configuration into
//! one ordered list. Each section contributes a zero-length marker and
//! "reserve" entries for the parts of its range no object claims; every
//! object is copied in as is. Inputs are never mutated, all output entries
//! are fresh values.

use crate::entry::{insert_sorted, EntryKind, MemoryEntry, SECTION_ENTRY_SUFFIX, SECTION_RESERVE};

/// The part of a section's range not yet attributed.
#[derive(Debug, Clone, Copy)]
struct Remaining {
    start: u64,
    end: u64,
}

/// Builds the objects-in-sections view.
///
/// Both inputs must be ascending by start address and already resolved.
pub fn project_objects_in_sections(
    sections: &[MemoryEntry],
    objects: &[MemoryEntry],
) -> Vec<MemoryEntry> {
    let mut output = Vec::with_capacity(sections.len() * 2 + objects.len());

    for section in sections {
        insert_sorted(&mut output, section_marker(section));

        if section.containment.is_some() {
            continue;
        }
        let Some(end) = section.address_end() else {
            continue;
        };

        let mut remaining = Some(Remaining {
            start: section.address_start,
            end,
        });

        for object in objects {
            let Some(current) = remaining else {
                break;
            };
            if object.config_id != section.config_id {
                continue;
            }
            let Some(object_end) = object.address_end() else {
                continue;
            };
            if object_end < current.start {
                continue;
            }
            let object_start = object.address_start;

            if object_start <= current.start {
                if current.end <= object_end {
                    remaining = None;
                } else {
                    remaining = Some(Remaining {
                        start: object_end + 1,
                        end: current.end,
                    });
                }
            } else if object_start > current.end {
                break;
            } else {
                insert_sorted(
                    &mut output,
                    reserve(section, current.start, object_start - current.start),
                );
                if object_end < current.end {
                    remaining = Some(Remaining {
                        start: object_end + 1,
                        end: current.end,
                    });
                } else {
                    remaining = None;
                }
            }
        }

        if let Some(leftover) = remaining {
            insert_sorted(
                &mut output,
                reserve(section, leftover.start, leftover.end - leftover.start + 1),
            );
        }
    }

    for object in objects {
        insert_sorted(&mut output, object.clone());
    }
    output
}

fn section_marker(section: &MemoryEntry) -> MemoryEntry {
    let mut marker = section.clone();
    marker.kind = EntryKind::SectionMarker;
    marker.object_name = format!("{} {}", section.section_name, SECTION_ENTRY_SUFFIX);
    marker.address_length = 0;
    marker
}

fn reserve(section: &MemoryEntry, start: u64, length: u64) -> MemoryEntry {
    let mut entry = MemoryEntry::new(
        &section.config_id,
        &section.mapfile,
        &section.section_name,
        SECTION_RESERVE,
        start,
        length,
    );
    entry.kind = EntryKind::Reserve;
    entry.vas_name = section.vas_name.clone();
    entry.vas_section_name = section.vas_section_name.clone();
    entry.mem_type = section.mem_type.clone();
    entry.mem_type_tag = section.mem_type_tag.clone();
    entry.category = section.category.clone();
    entry
}
