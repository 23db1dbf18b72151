//! Conflict resolution.
//!
//! Detects duplicated, contained and overlapping address ranges inside one
//! homogeneous collection (all sections or all objects) and rewrites the
//! collection so that no byte is counted twice.
//!
//! Every ordered pair `(a, b)` of entries from the same configuration is
//! visited, so each unordered pair is seen once from either side. Mutations
//! done while visiting one pair are visible to every later visit; the result
//! therefore depends on the visit order, which is the collection order.

use anyhow::{bail, Result};

use crate::entry::MemoryEntry;

/// How the range of `a` relates to the range of `b`, seen from `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Disjoint,
    Duplicate,
    Contains,
    ContainedBy,
    /// `a` starts and ends before `b` does.
    OverlapsStartOf,
    /// `a` starts and ends after `b` does.
    OverlapsEndOf,
}

/// Classifies two inclusive ranges `[a_start, a_end]` and `[b_start, b_end]`.
pub fn relation(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> Result<Relation> {
    let relation = if a_end < b_start || a_start > b_end {
        Relation::Disjoint
    } else if a_start == b_start && a_end == b_end {
        Relation::Duplicate
    } else if a_start <= b_start && a_end >= b_end {
        Relation::Contains
    } else if a_start >= b_start && a_end <= b_end {
        Relation::ContainedBy
    } else if a_start < b_start && a_end < b_end {
        Relation::OverlapsStartOf
    } else if a_start > b_start && a_end > b_end {
        Relation::OverlapsEndOf
    } else {
        bail!(
            "internal error: unhandled relation between [{:#x}, {:#x}] and [{:#x}, {:#x}]",
            a_start,
            a_end,
            b_start,
            b_end
        );
    };
    Ok(relation)
}

/// What `a` needs to know about `b` while `a` is being updated.
struct Partner {
    start: u64,
    end: u64,
    is_duplicate: bool,
    reference: String,
}

/// Resolves all conflicts inside `entries` in place.
///
/// Entries of different configurations are never compared. Entries that
/// arrive with zero length have no range and take no part. An entry that
/// collapses to zero length during the pass stops looking at partners, but
/// its partners still see it with the range it had before collapsing.
pub fn resolve_conflicts(entries: &mut [MemoryEntry]) -> Result<()> {
    let mut collapsed: Vec<Option<(u64, u64)>> = vec![None; entries.len()];

    for a in 0..entries.len() {
        for b in 0..entries.len() {
            if a == b || entries[a].config_id != entries[b].config_id {
                continue;
            }
            let Some(a_end) = entries[a].address_end() else {
                break;
            };
            let (b_start, b_end) = match entries[b].address_end() {
                Some(end) => (entries[b].address_start, end),
                None => match collapsed[b] {
                    Some(range) => range,
                    None => continue,
                },
            };
            let partner = Partner {
                start: b_start,
                end: b_end,
                is_duplicate: entries[b].duplicate.is_some(),
                reference: entries[b].reference(),
            };
            let a_start = entries[a].address_start;
            apply(&mut entries[a], a_end, partner)?;
            if entries[a].address_length == 0 {
                collapsed[a] = Some((a_start, a_end));
            }
        }
    }
    Ok(())
}

fn apply(entry: &mut MemoryEntry, end: u64, partner: Partner) -> Result<()> {
    match relation(entry.address_start, end, partner.start, partner.end)? {
        Relation::Disjoint => {}
        Relation::Duplicate => {
            if entry.duplicate.is_none() {
                entry.duplicate = Some(partner.reference);
            }
            if partner.is_duplicate {
                entry.address_length = 0;
            }
        }
        Relation::Contains => entry.containing_others = true,
        Relation::ContainedBy => {
            if entry.containment.is_none() {
                entry.containment = Some(partner.reference);
                entry.address_length = 0;
            }
        }
        Relation::OverlapsStartOf => entry.overlapping_others = true,
        Relation::OverlapsEndOf => {
            tracing::debug!(
                "{} {} overlaps {}; moving start from {:#x} to {:#x}",
                entry.section_name,
                entry.object_name,
                partner.reference,
                entry.address_start,
                partner.end + 1
            );
            entry.overlap = Some(partner.reference);
            entry.address_start = partner.end + 1;
            entry.address_length = end - entry.address_start + 1;
        }
    }
    Ok(())
}
