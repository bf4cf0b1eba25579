//! File: one byte store plus its modification time
//!
//! Directory entries, permissions and the rest of the metadata live
//! elsewhere. Stream views only need the content and the "modified" hook.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use crate::idgen::{FileId, IdGen};
use crate::io::{ByteStore, StoreConfig};
use crate::stream::{InputStream, OutputStream};

static FILE_IDS: IdGen = IdGen::new();

/// Source of timestamps for file metadata
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// In-memory regular file
///
/// Owns exactly one [`ByteStore`]. The size is always that of the store;
/// the modification time is explicit and refreshed by writers through
/// [`File::update_modified_time`].
///
/// Share a file between streams with `Arc<File>`.
pub struct File {
    id: FileId,
    content: ByteStore,
    modified: Mutex<SystemTime>,
    clock: Arc<dyn Clock>,
}

impl File {
    /// Create an empty, unbounded file
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self::from_content(ByteStore::with_config(config))
    }

    /// Create a file owning `content`
    #[must_use]
    pub fn from_content(content: ByteStore) -> Self {
        Self::with_clock(content, Arc::new(SystemClock))
    }

    /// Create a file owning `content` and stamping times from `clock`
    #[must_use]
    pub fn with_clock(content: ByteStore, clock: Arc<dyn Clock>) -> Self {
        let modified = Mutex::new(clock.now());
        Self {
            id: FILE_IDS.get_next(),
            content,
            modified,
            clock,
        }
    }

    #[must_use]
    pub fn id(&self) -> FileId {
        self.id
    }

    /// Handle to the shared content
    #[must_use]
    pub fn content(&self) -> ByteStore {
        self.content.clone()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.content.size()
    }

    /// Stamp the modification time with "now"
    pub fn update_modified_time(&self) {
        let now = self.clock.now();
        *self.modified.lock() = now;
    }

    #[must_use]
    pub fn last_modified_time(&self) -> SystemTime {
        *self.modified.lock()
    }

    /// Open a writing stream; see [`OutputStream::new`]
    #[must_use]
    pub fn new_output_stream(self: &Arc<Self>, append: bool) -> OutputStream {
        OutputStream::new(Arc::clone(self), append)
    }

    /// Open a reading stream positioned at the start
    #[must_use]
    pub fn new_input_stream(self: &Arc<Self>) -> InputStream {
        InputStream::new(Arc::clone(self))
    }
}

impl Default for File {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File(id={}, size={}, modified={:?})",
            self.id,
            self.size(),
            self.last_modified_time()
        )
    }
}
