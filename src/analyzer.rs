//! Core analysis logic.
//!
//! This module contains the `Analyzer` struct which drives a run:
//! 1. Ingestion: translates virtual records, classifies them into memory
//!    regions and files them, ordered by address, per configuration.
//! 2. Resolution: canonicalizes the section and the object collection of
//!    every configuration.
//! 3. Projection: derives the objects-in-sections view.
//! 4. Report: gathers the collections and their consumption totals.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::entry::{insert_sorted, EntryKind, MemoryEntry, UNKNOWN_REGION};
use crate::project::{Configuration, RawEntry};
use crate::projection::project_objects_in_sections;
use crate::resolve::resolve_conflicts;
use crate::summary::summarize;
use crate::translate::AddressTranslator;
use crate::writer::{ConfigurationReport, Report};

/// Policies for recoverable problems.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Drop records matching no memory region instead of tagging them
    /// with `UNKNOWN_REGION`.
    pub remove_unmatched: bool,
    /// Abort when a virtual record cannot be translated.
    pub strict: bool,
}

/// The section and object collections of one configuration.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub sections: Vec<MemoryEntry>,
    pub objects: Vec<MemoryEntry>,
}

enum Prepared {
    Classified(MemoryEntry),
    Unclassified(MemoryEntry),
    Untranslated(String),
}

/// Collects the records of every configuration and runs the analysis phases.
pub struct Analyzer {
    options: Options,
    configurations: BTreeMap<String, Configuration>,
    collections: BTreeMap<String, Collections>,
    warnings: usize,
    resolved: bool,
}

impl Analyzer {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            configurations: BTreeMap::new(),
            collections: BTreeMap::new(),
            warnings: 0,
            resolved: false,
        }
    }

    pub fn add_configuration(&mut self, configuration: Configuration) -> Result<()> {
        if self.configurations.contains_key(&configuration.id) {
            bail!("duplicate configuration '{}'", configuration.id);
        }
        self.collections
            .insert(configuration.id.clone(), Collections::default());
        self.configurations
            .insert(configuration.id.clone(), configuration);
        Ok(())
    }

    /// Adds one raw record.
    ///
    /// Records that cannot be translated are dropped with a warning, or fail
    /// the run under the strict policy. Records outside every region are
    /// dropped or kept as unknown according to `remove_unmatched`.
    pub fn ingest(&mut self, raw: &RawEntry) -> Result<()> {
        if self.resolved {
            bail!("cannot add entries after resolution");
        }

        let entry = match self.prepare(raw).with_context(|| describe(raw))? {
            Prepared::Classified(entry) => entry,
            Prepared::Unclassified(mut entry) => {
                self.warnings += 1;
                tracing::warn!(
                    "{} @ {:#x} (size {:#x}) matches no memory region{}",
                    describe(raw),
                    entry.address_start,
                    entry.address_length,
                    if self.options.remove_unmatched {
                        "; dropped"
                    } else {
                        ""
                    }
                );
                if self.options.remove_unmatched {
                    return Ok(());
                }
                entry.mem_type = UNKNOWN_REGION.to_string();
                entry.mem_type_tag = UNKNOWN_REGION.to_string();
                entry
            }
            Prepared::Untranslated(message) => {
                if self.options.strict {
                    bail!("{}", message);
                }
                self.warnings += 1;
                tracing::warn!("{}; dropped", message);
                return Ok(());
            }
        };

        let collections = self
            .collections
            .get_mut(&entry.config_id)
            .context("collections missing for configuration")?;
        match entry.kind {
            EntryKind::Section => insert_sorted(&mut collections.sections, entry),
            _ => insert_sorted(&mut collections.objects, entry),
        }
        Ok(())
    }

    pub fn ingest_all<'r>(&mut self, raws: impl IntoIterator<Item = &'r RawEntry>) -> Result<()> {
        for raw in raws {
            self.ingest(raw)?;
        }
        Ok(())
    }

    fn prepare(&self, raw: &RawEntry) -> Result<Prepared> {
        let Some(configuration) = self.configurations.get(&raw.config_id) else {
            bail!("unknown configuration '{}'", raw.config_id);
        };
        let (start, length) = raw.address_range()?;

        let mut physical = start;
        let mut translation = None;
        if raw.is_virtual {
            let vas_name = raw.vas_name.as_deref().unwrap_or_default();
            let allowed = configuration
                .virtual_sections
                .get(vas_name)
                .map(Vec::as_slice)
                .unwrap_or_default();
            match configuration.monolith.translate(start, length, allowed) {
                Some(found) => {
                    tracing::debug!(
                        "{}: {:#x} in '{}' maps to {:#x} via '{}'",
                        describe(raw),
                        start,
                        vas_name,
                        found.physical_start,
                        found.section_name
                    );
                    physical = found.physical_start;
                    translation = Some((vas_name.to_string(), found.section_name));
                }
                None => {
                    return Ok(Prepared::Untranslated(format!(
                        "{} @ {:#x} (size {:#x}) in virtual address space '{}' \
                         could not be translated",
                        describe(raw),
                        start,
                        length,
                        vas_name
                    )));
                }
            }
        }
        let physical = configuration.address_space.apply_offset(physical)?;
        if length > 0 && physical.checked_add(length - 1).is_none() {
            bail!("range {:#x} + {:#x} exceeds the address space", physical, length);
        }

        let mut entry = MemoryEntry::new(
            &raw.config_id,
            &raw.mapfile,
            &raw.section_name,
            &raw.object_name,
            physical,
            length,
        );
        if let Some((vas_name, section_name)) = translation {
            entry.vas_name = Some(vas_name);
            entry.vas_section_name = Some(section_name);
        }
        entry.category = raw.category.clone().unwrap_or_default();

        match configuration.address_space.classify(physical) {
            Some((region, mem_type)) => {
                entry.mem_type_tag = region.to_string();
                entry.mem_type = mem_type.to_string();
                Ok(Prepared::Classified(entry))
            }
            None => Ok(Prepared::Unclassified(entry)),
        }
    }

    /// Resolves the sections and, separately, the objects of every
    /// configuration. Configurations are independent and run in parallel.
    pub fn resolve(&mut self) -> Result<()> {
        self.collections
            .par_iter_mut()
            .try_for_each(|(id, collections)| -> Result<()> {
                resolve_conflicts(&mut collections.sections)
                    .with_context(|| format!("resolving sections of '{}'", id))?;
                resolve_conflicts(&mut collections.objects)
                    .with_context(|| format!("resolving objects of '{}'", id))?;
                Ok(())
            })?;
        self.resolved = true;
        tracing::info!("resolved {} configuration(s)", self.collections.len());
        Ok(())
    }

    /// Objects-in-sections view of every configuration.
    pub fn project(&self) -> Result<BTreeMap<String, Vec<MemoryEntry>>> {
        if !self.resolved {
            bail!("entries must be resolved before projection");
        }
        Ok(self
            .collections
            .par_iter()
            .map(|(id, c)| {
                (
                    id.clone(),
                    project_objects_in_sections(&c.sections, &c.objects),
                )
            })
            .collect())
    }

    pub fn report(&self) -> Result<Report> {
        let mut projections = self.project()?;
        let mut configurations = Vec::with_capacity(self.collections.len());
        for (id, collections) in &self.collections {
            let objects_in_sections = projections.remove(id).unwrap_or_default();
            configurations.push(ConfigurationReport {
                id: id.clone(),
                summary: summarize(
                    &collections.sections,
                    &collections.objects,
                    &objects_in_sections,
                ),
                sections: collections.sections.clone(),
                objects: collections.objects.clone(),
                objects_in_sections,
            });
        }
        Ok(Report {
            warnings: self.warnings,
            configurations,
        })
    }

    pub fn collections(&self, config_id: &str) -> Option<&Collections> {
        self.collections.get(config_id)
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }
}

fn describe(raw: &RawEntry) -> String {
    if raw.object_name.is_empty() {
        format!(
            "[{}] {}: section {}",
            raw.config_id, raw.mapfile, raw.section_name
        )
    } else {
        format!(
            "[{}] {}: object {} in {}",
            raw.config_id, raw.mapfile, raw.object_name, raw.section_name
        )
    }
}
