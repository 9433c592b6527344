//! Handle on a single entry of an indexed archive.

use crate::error::{ArchiveError, EntryOp, Result};
use std::fmt;
use std::io::{Cursor, Read, Seek, Write};
use std::sync::Arc;
use time::{Date, Month, PrimitiveDateTime, Time};
use zip::result::ZipResult;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Archive view shared by the index and all of its handles.
pub(crate) type SharedArchive = ZipArchive<Cursor<Arc<[u8]>>>;

/// Never preallocate more than this for `read_content`, whatever the
/// header claims.
const PREALLOC_LIMIT: u64 = 16 * 1024 * 1024;

/// Converts a ZIP (DOS) timestamp to a calendar date-time.
///
/// Returns `None` for the zeroed or out-of-range values some writers emit.
fn dos_to_datetime(dt: DateTime) -> Option<PrimitiveDateTime> {
    let month = Month::try_from(dt.month()).ok()?;
    let date = Date::from_calendar_date(i32::from(dt.year()), month, dt.day()).ok()?;
    let time = Time::from_hms(dt.hour(), dt.minute(), dt.second()).ok()?;
    Some(PrimitiveDateTime::new(date, time))
}

/// Read-only reference to one entry: its header fields and the ability to
/// open a decompressing stream over its payload.
///
/// Cloning is cheap; the archive bytes are shared, not copied.
#[derive(Clone)]
pub struct EntryHandle {
    archive: SharedArchive,
    archive_index: usize,
    position: usize,
    name: String,
    compression: CompressionMethod,
    size: u64,
    compressed_size: u64,
    crc32: u32,
    modified: Option<DateTime>,
    unix_mode: Option<u32>,
    is_dir: bool,
    comment: String,
    max_content_size: Option<u64>,
}

impl EntryHandle {
    /// Captures the header of the library's entry number `archive_index`.
    ///
    /// The directory position defaults to the same number; see
    /// [`EntryHandle::at_position`].
    pub(crate) fn load(
        archive: &SharedArchive,
        archive_index: usize,
        max_content_size: Option<u64>,
    ) -> ZipResult<Self> {
        let mut archive = archive.clone();
        let file = archive.by_index_raw(archive_index)?;
        let name = file.name().to_string();
        let compression = file.compression();
        let size = file.size();
        let compressed_size = file.compressed_size();
        let crc32 = file.crc32();
        let modified = file.last_modified();
        let unix_mode = file.unix_mode();
        let is_dir = file.is_dir();
        let comment = file.comment().to_string();
        drop(file);

        Ok(Self {
            archive,
            archive_index,
            position: archive_index,
            name,
            compression,
            size,
            compressed_size,
            crc32,
            modified,
            unix_mode,
            is_dir,
            comment,
            max_content_size,
        })
    }

    /// Records where the entry sits in the raw central directory, which
    /// differs from the library's numbering once duplicates are merged.
    pub(crate) fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compression(&self) -> CompressionMethod {
        self.compression
    }

    /// Uncompressed size declared by the header.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    /// Raw ZIP timestamp, as stored in the header.
    pub fn modified(&self) -> Option<DateTime> {
        self.modified
    }

    /// Last modification time, if the header carries a valid one.
    pub fn last_modified(&self) -> Option<PrimitiveDateTime> {
        self.modified.and_then(dos_to_datetime)
    }

    pub fn unix_mode(&self) -> Option<u32> {
        self.unix_mode
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Index of the entry in central-directory order, counting every
    /// header. For a duplicated name this is its last occurrence.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Reads the whole decompressed content into memory.
    ///
    /// A CRC mismatch or a truncated payload is an error; partial content is
    /// never returned.
    pub fn read_content(&self) -> Result<Vec<u8>> {
        if let Some(limit) = self.max_content_size {
            if self.size > limit {
                return Err(ArchiveError::ContentTooLarge {
                    name: self.name.clone(),
                    size: self.size,
                    limit,
                });
            }
        }

        let capacity = usize::try_from(self.size.min(PREALLOC_LIMIT)).unwrap_or(0);
        let content = self.with_stream(EntryOp::Read, |stream| {
            let mut content = Vec::with_capacity(capacity);
            let result = match self.max_content_size {
                // One byte past the limit is enough to detect a lying header.
                Some(limit) => stream.take(limit.saturating_add(1)).read_to_end(&mut content),
                None => stream.read_to_end(&mut content),
            };
            result.map_err(|err| ArchiveError::entry(EntryOp::Read, &self.name, err))?;
            Ok(content)
        })?;

        match self.max_content_size {
            Some(limit) if content.len() as u64 > limit => Err(ArchiveError::ContentTooLarge {
                name: self.name.clone(),
                size: content.len() as u64,
                limit,
            }),
            _ => Ok(content),
        }
    }

    /// Opens a decompressing stream over the payload and hands it to `f`.
    ///
    /// The stream lives only for the duration of the call and is released
    /// on every path out of it.
    pub(crate) fn with_stream<T>(
        &self,
        op: EntryOp,
        f: impl FnOnce(&mut dyn Read) -> Result<T>,
    ) -> Result<T> {
        let mut archive = self.archive.clone();
        let mut stream = archive
            .by_index(self.archive_index)
            .map_err(|err| ArchiveError::entry_zip(op, &self.name, err))?;
        f(&mut stream)
    }

    /// Copies header and compressed payload into `writer` without
    /// decompressing.
    pub(crate) fn raw_copy_into<W: Write + Seek>(&self, writer: &mut ZipWriter<W>) -> Result<()> {
        let mut archive = self.archive.clone();
        let raw = archive
            .by_index_raw(self.archive_index)
            .map_err(|err| ArchiveError::entry_zip(EntryOp::RawCopy, &self.name, err))?;
        writer
            .raw_copy_file(raw)
            .map_err(|err| ArchiveError::entry_zip(EntryOp::RawCopy, &self.name, err))
    }
}

impl fmt::Debug for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryHandle")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("compression", &self.compression)
            .field("size", &self.size)
            .field("compressed_size", &self.compressed_size)
            .field("crc32", &self.crc32)
            .field("is_dir", &self.is_dir)
            .finish_non_exhaustive()
    }
}
