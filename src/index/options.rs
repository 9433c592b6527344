/// Options controlling how an [`ArchiveIndex`](super::ArchiveIndex) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    /// Keep directory entries (names ending in `/`) in the index.
    pub include_directories: bool,
    /// Upper bound on the decompressed size `read_content` will buffer.
    /// `None` leaves bounding memory use to the caller.
    pub max_content_size: Option<u64>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            include_directories: true,
            max_content_size: None,
        }
    }
}

impl IndexOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_directories(mut self, include: bool) -> Self {
        self.include_directories = include;
        self
    }

    pub fn max_content_size(mut self, limit: u64) -> Self {
        self.max_content_size = Some(limit);
        self
    }
}
