//! Name-keyed index over the entries of a ZIP archive.

mod directory;
mod entry;
mod options;

pub use entry::EntryHandle;
pub use options::IndexOptions;

use crate::error::{ArchiveError, Origin, Result};
use entry::SharedArchive;
use log::{debug, trace, warn};
use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use zip::ZipArchive;

/// Inserts `items` in order so that a later item replaces an earlier one of
/// the same name. Returns the map and the names that were replaced.
fn collapse_last_wins<T>(
    items: impl IntoIterator<Item = (String, T)>,
) -> (BTreeMap<String, T>, Vec<String>) {
    let mut map = BTreeMap::new();
    let mut replaced = Vec::new();
    for (name, item) in items {
        if let Some(_previous) = map.insert(name.clone(), item) {
            replaced.push(name);
        }
    }
    (map, replaced)
}

/// Mapping from entry name to [`EntryHandle`], built once from an archive
/// and read-only afterwards.
///
/// The archive bytes are shared between the index and its handles, so
/// handles stay valid after the index is dropped.
#[derive(Debug, Clone)]
pub struct ArchiveIndex {
    origin: Origin,
    entries: BTreeMap<String, EntryHandle>,
    duplicates: Vec<String>,
}

impl ArchiveIndex {
    /// Reads the file at `path` into memory and indexes it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with(path, &IndexOptions::default())
    }

    pub fn from_path_with(path: impl AsRef<Path>, options: &IndexOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|err| ArchiveError::file_read(path, err))?;
        Self::build(Arc::from(data), Origin::Path(path.to_path_buf()), options)
    }

    /// Indexes an archive already held in memory.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Result<Self> {
        Self::from_bytes_with(data, &IndexOptions::default())
    }

    pub fn from_bytes_with(data: impl Into<Arc<[u8]>>, options: &IndexOptions) -> Result<Self> {
        Self::build(data.into(), Origin::Memory, options)
    }

    fn build(data: Arc<[u8]>, origin: Origin, options: &IndexOptions) -> Result<Self> {
        let len = data.len();
        let directory = directory::scan_names(&data);
        let archive: SharedArchive = ZipArchive::new(Cursor::new(Arc::clone(&data)))
            .map_err(|err| ArchiveError::invalid_archive(origin.clone(), err))?;

        let (positions, replaced) = match &directory {
            Some(names) => directory::last_positions(names),
            None => {
                debug!("central directory of '{origin}' not walked, duplicates not detected");
                Default::default()
            }
        };

        let mut handles = Vec::with_capacity(archive.len());
        for archive_index in 0..archive.len() {
            let mut handle = EntryHandle::load(&archive, archive_index, options.max_content_size)
                .map_err(|err| ArchiveError::invalid_archive(origin.clone(), err))?;
            if let Some(&position) = positions.get(handle.name()) {
                handle = handle.at_position(position);
            }
            if handle.is_dir() && !options.include_directories {
                trace!("skipping directory entry '{}'", handle.name());
                continue;
            }
            trace!("indexed '{}' at position {}", handle.name(), handle.position());
            handles.push((handle.name().to_string(), handle));
        }

        // The library may already have merged duplicates; what it left is
        // collapsed the same way, and the raw directory names the rest.
        let (entries, mut duplicates) = collapse_last_wins(handles);
        if directory.is_some() {
            duplicates = replaced
                .into_iter()
                .filter(|name| options.include_directories || !name.ends_with('/'))
                .collect();
        }
        for name in &duplicates {
            warn!("duplicate entry '{name}' in '{origin}', keeping the last one");
        }
        debug!("indexed {} entries from '{origin}' ({len} bytes)", entries.len());

        Ok(Self {
            origin,
            entries,
            duplicates,
        })
    }

    /// Where the archive was loaded from.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn get(&self, name: &str) -> Option<&EntryHandle> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries sorted by name.
    pub fn iter(&self) -> btree_map::Iter<'_, String, EntryHandle> {
        self.entries.iter()
    }

    /// Entries in central-directory order.
    pub fn entries_in_archive_order(&self) -> Vec<&EntryHandle> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.position());
        entries
    }

    /// Names that appeared more than once; each resolves to its last
    /// occurrence.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

impl<'a> IntoIterator for &'a ArchiveIndex {
    type Item = (&'a String, &'a EntryHandle);
    type IntoIter = btree_map::Iter<'a, String, EntryHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
