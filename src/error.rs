//! Error types for zipmap
//!
//! Every failure is one of two kinds: the byte source or sink failed
//! ([`ErrorKind::Io`]), or the bytes are not a ZIP archive
//! ([`ErrorKind::Format`]). Variants carry the context needed to tell
//! which operation and which entry failed.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Broad classification of an [`ArchiveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Underlying byte source or sink failed (missing file, rejected
    /// header, truncated or corrupt entry stream).
    Io,
    /// Bytes do not parse as a ZIP archive.
    Format,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::Format => "format",
        }
    }
}

/// The entry-level operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOp {
    Copy,
    RawCopy,
    Read,
    Rewrite,
    WriteNew,
}

impl fmt::Display for EntryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryOp::Copy => "copy",
            EntryOp::RawCopy => "raw copy",
            EntryOp::Read => "read",
            EntryOp::Rewrite => "rewrite",
            EntryOp::WriteNew => "write",
        };
        f.write_str(s)
    }
}

/// Where the archive bytes came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Path(PathBuf),
    Memory,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Path(path) => write!(f, "{}", path.display()),
            Origin::Memory => f.write_str("<memory>"),
        }
    }
}

/// Main error type for zipmap
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Archive file could not be read
    #[error("cannot read file '{}': {}", .path.display(), .source)]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Bytes are not a valid ZIP archive
    #[error("invalid ZIP archive '{origin}': {source}")]
    InvalidArchive {
        origin: Origin,
        #[source]
        source: ZipError,
    },

    /// Entry stream or output writer failed
    #[error("cannot {op} entry '{name}': {source}")]
    Entry {
        op: EntryOp,
        name: String,
        #[source]
        source: io::Error,
    },

    /// Entry content exceeds the configured limit
    #[error("entry '{name}' is {size} bytes, limit is {limit}")]
    ContentTooLarge { name: String, size: u64, limit: u64 },
}

impl ArchiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArchiveError::FileRead { .. } => ErrorKind::Io,
            ArchiveError::InvalidArchive { .. } => ErrorKind::Format,
            ArchiveError::Entry { .. } => ErrorKind::Io,
            ArchiveError::ContentTooLarge { .. } => ErrorKind::Io,
        }
    }

    /// Name of the entry involved, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            ArchiveError::Entry { name, .. } | ArchiveError::ContentTooLarge { name, .. } => {
                Some(name.as_str())
            }
            _ => None,
        }
    }

    /// Create a file read error
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ArchiveError::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid archive error
    pub fn invalid_archive(origin: Origin, source: ZipError) -> Self {
        ArchiveError::InvalidArchive { origin, source }
    }

    /// Create an entry error from a plain I/O failure
    pub fn entry(op: EntryOp, name: impl Into<String>, source: io::Error) -> Self {
        ArchiveError::Entry {
            op,
            name: name.into(),
            source,
        }
    }

    /// Create an entry error from a failure reported by the zip library.
    ///
    /// Whatever the library reports while an entry is being streamed or
    /// written is a source/sink failure from the caller's point of view.
    pub fn entry_zip(op: EntryOp, name: impl Into<String>, source: ZipError) -> Self {
        let source = match source {
            ZipError::Io(err) => err,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        };
        ArchiveError::entry(op, name, source)
    }
}

/// Result type for zipmap operations
pub type Result<T> = std::result::Result<T, ArchiveError>;
