//! Entry-level operations against an open [`ZipWriter`].
//!
//! Each function appends exactly one entry. The writer must be used by one
//! caller at a time, and finishing it (writing the central directory) stays
//! with the caller. A failed call does not undo entries already written.

use crate::error::{ArchiveError, EntryOp, Result};
use crate::index::EntryHandle;
use log::{debug, trace};
use std::io::{self, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Sizes at or above this need zip64 records.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

fn needs_zip64(len: u64) -> bool {
    len >= ZIP64_THRESHOLD
}

/// Copies `entry` into `writer` under the same name and compression method.
///
/// Content goes through a decompress/recompress cycle; header fields other
/// than name and method are not carried over. See [`copy_entry_raw`] for a
/// byte-for-byte copy.
pub fn copy_entry<W: Write + Seek>(writer: &mut ZipWriter<W>, entry: &EntryHandle) -> Result<()> {
    let name = entry.name();
    entry.with_stream(EntryOp::Copy, |stream| {
        let options = SimpleFileOptions::default()
            .compression_method(entry.compression())
            .large_file(needs_zip64(entry.size()));
        writer
            .start_file(name, options)
            .map_err(|err| ArchiveError::entry_zip(EntryOp::Copy, name, err))?;
        let copied = io::copy(stream, &mut *writer)
            .map_err(|err| ArchiveError::entry(EntryOp::Copy, name, err))?;
        trace!("copied '{name}' ({copied} bytes)");
        Ok(())
    })
}

/// Copies `entry` into `writer` without decompressing it, keeping its full
/// header.
pub fn copy_entry_raw<W: Write + Seek>(writer: &mut ZipWriter<W>, entry: &EntryHandle) -> Result<()> {
    entry.raw_copy_into(writer)?;
    trace!("raw copied '{}' ({} bytes)", entry.name(), entry.compressed_size());
    Ok(())
}

/// Reads the decompressed content of `entry`.
pub fn read_entry_content(entry: &EntryHandle) -> Result<Vec<u8>> {
    entry.read_content()
}

/// Writes `content` into `writer` as a new entry that reuses `entry`'s
/// header: name, compression method, modification time and Unix
/// permission bits (`0o777`). File type, setuid/setgid/sticky bits, extra
/// fields and the entry comment are not carried over; use
/// [`copy_entry_raw`] to keep them. Sizes and CRC are recomputed by the
/// writer.
pub fn rewrite_entry<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    entry: &EntryHandle,
    content: &[u8],
) -> Result<()> {
    let name = entry.name();
    let mut options = SimpleFileOptions::default()
        .compression_method(entry.compression())
        .large_file(needs_zip64(content.len() as u64));
    if let Some(modified) = entry.modified() {
        options = options.last_modified_time(modified);
    }
    if let Some(mode) = entry.unix_mode() {
        options = options.unix_permissions(mode);
    }

    writer
        .start_file(name, options)
        .map_err(|err| ArchiveError::entry_zip(EntryOp::Rewrite, name, err))?;
    writer
        .write_all(content)
        .map_err(|err| ArchiveError::entry(EntryOp::Rewrite, name, err))?;
    debug!("rewrote '{name}' ({} bytes)", content.len());
    Ok(())
}

/// Writes `content` as a new stored (uncompressed) entry called `name`.
pub fn write_new_entry<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    name: &str,
    content: &[u8],
) -> Result<()> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(needs_zip64(content.len() as u64));

    writer
        .start_file(name, options)
        .map_err(|err| ArchiveError::entry_zip(EntryOp::WriteNew, name, err))?;
    writer
        .write_all(content)
        .map_err(|err| ArchiveError::entry(EntryOp::WriteNew, name, err))?;
    debug!("wrote new entry '{name}' ({} bytes)", content.len());
    Ok(())
}
