use crate::error::Result;
use crate::index::ArchiveIndex;
use crate::write::{copy_entry, copy_entry_raw, rewrite_entry, write_new_entry};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Seek, Write};
use zip::ZipWriter;

/// What happened to each entry while applying a [`Patch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub copied: Vec<String>,
    pub replaced: Vec<String>,
    pub removed: Vec<String>,
    pub added: Vec<String>,
    /// Replace/remove targets that were not in the index.
    pub missing: Vec<String>,
}

/// Copies an indexed archive into a writer, editing it on the way.
///
/// Entries are visited in archive order: removed ones are skipped, replaced
/// ones are rewritten with their new content and header preserved, the rest
/// are copied. Added entries are appended last, stored, in insertion order.
pub struct Patch<'a> {
    index: &'a ArchiveIndex,
    replace: BTreeMap<String, Vec<u8>>,
    remove: BTreeSet<String>,
    add: Vec<(String, Vec<u8>)>,
    raw_copy: bool,
}

impl<'a> Patch<'a> {
    pub fn new(index: &'a ArchiveIndex) -> Self {
        Self {
            index,
            replace: BTreeMap::new(),
            remove: BTreeSet::new(),
            add: Vec::new(),
            raw_copy: true,
        }
    }

    pub fn replace(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.replace.insert(name.into(), content.into());
        self
    }

    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.remove.insert(name.into());
        self
    }

    pub fn add(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.add.push((name.into(), content.into()));
        self
    }

    /// Copy untouched entries byte-for-byte (default) instead of
    /// recompressing them.
    pub fn raw_copy(mut self, raw: bool) -> Self {
        self.raw_copy = raw;
        self
    }

    pub fn apply<W: Write + Seek>(self, writer: &mut ZipWriter<W>) -> Result<PatchReport> {
        let mut report = PatchReport::default();

        for name in self.replace.keys().chain(self.remove.iter()) {
            if !self.index.contains(name) {
                warn!("patch target '{name}' not found in '{}'", self.index.origin());
                report.missing.push(name.clone());
            }
        }

        for entry in self.index.entries_in_archive_order() {
            let name = entry.name();
            if self.remove.contains(name) {
                report.removed.push(name.to_string());
            } else if let Some(content) = self.replace.get(name) {
                rewrite_entry(writer, entry, content)?;
                report.replaced.push(name.to_string());
            } else {
                if self.raw_copy {
                    copy_entry_raw(writer, entry)?;
                } else {
                    copy_entry(writer, entry)?;
                }
                report.copied.push(name.to_string());
            }
        }

        for (name, content) in &self.add {
            write_new_entry(writer, name, content)?;
            report.added.push(name.clone());
        }

        debug!(
            "patched '{}': {} copied, {} replaced, {} removed, {} added",
            self.index.origin(),
            report.copied.len(),
            report.replaced.len(),
            report.removed.len(),
            report.added.len()
        );
        Ok(report)
    }
}
