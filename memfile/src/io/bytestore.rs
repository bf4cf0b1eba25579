//! Shared byte store with internal locking
//!
//! Backing storage for the content of one file. The store can be shared
//! across threads; every operation takes the internal lock once, so each
//! call is atomic with respect to every other call on the same store.

use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::io::{self, Read};
use std::ops::Deref;
use std::sync::Arc;

use super::config::StoreConfig;

/// Error type for store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The write would grow the store past its configured limit
    #[error("store is full: {requested} bytes requested, limit is {limit}")]
    Full { requested: usize, limit: usize },

    /// `index + len` overflows or cannot be allocated
    #[error("cannot grow store to hold {len} bytes at index {index}")]
    TooLarge { index: usize, len: usize },
}

impl From<StoreError> for io::Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Full { .. } => io::Error::new(io::ErrorKind::StorageFull, e),
            StoreError::TooLarge { .. } => io::Error::new(io::ErrorKind::OutOfMemory, e),
        }
    }
}

/// Read-only guard to store contents
///
/// Holds the store lock until dropped. Writers on other threads block
/// meanwhile, so keep the guard short-lived.
pub struct StoreReadGuard<'a>(MutexGuard<'a, Vec<u8>>);

impl Deref for StoreReadGuard<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for StoreReadGuard<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

struct StoreShared {
    data: Mutex<Vec<u8>>,
    max_size: Option<usize>,
}

/// Growable in-memory content of a single file
///
/// A thread-safe buffer backed by `Arc` + `parking_lot::Mutex`. Clones
/// share the same bytes. The logical size is the length of the inner
/// vector; spare capacity is never visible.
///
/// Writing past the end zero-fills the gap first, so a read below the size
/// always sees either written bytes or zeros.
///
/// # Example
///
/// ```
/// use memfile::io::ByteStore;
///
/// let store = ByteStore::new();
/// store.write(3, b"xy").unwrap();
///
/// assert_eq!(store.size(), 5);
/// assert_eq!(store.to_vec(), vec![0, 0, 0, b'x', b'y']);
/// ```
#[derive(Clone)]
pub struct ByteStore(Arc<StoreShared>);

impl ByteStore {
    /// Create a new empty, unbounded store
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self(Arc::new(StoreShared {
            data: Mutex::new(Vec::with_capacity(config.effective_capacity())),
            max_size: config.max_size,
        }))
    }

    /// Create an unbounded store holding a copy of `bytes`
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Arc::new(StoreShared {
            data: Mutex::new(bytes.to_vec()),
            max_size: None,
        }))
    }

    #[must_use]
    pub fn max_size(&self) -> Option<usize> {
        self.0.max_size
    }

    fn check_limit(&self, requested: usize) -> Result<(), StoreError> {
        match self.0.max_size {
            Some(limit) if requested > limit => {
                log::warn!("store write rejected: {requested} bytes requested, limit is {limit}");
                Err(StoreError::Full { requested, limit })
            }
            _ => Ok(()),
        }
    }

    /// Make room for `len` bytes at `index`, zero-filling any gap. Never
    /// shrinks. Returns the end of the range.
    fn grow_to(
        &self,
        data: &mut Vec<u8>,
        index: usize,
        len: usize,
    ) -> Result<usize, StoreError> {
        let end = index
            .checked_add(len)
            .ok_or(StoreError::TooLarge { index, len })?;
        if end > data.len() {
            self.check_limit(end)?;
            if data.try_reserve(end - data.len()).is_err() {
                log::warn!("store cannot grow to {end} bytes");
                return Err(StoreError::TooLarge { index, len });
            }
            log::trace!("store grows from {} to {end} bytes", data.len());
            data.resize(end, 0);
        }
        Ok(end)
    }

    /// Set the byte at `index`, growing the store if needed
    ///
    /// Bytes between the old end and `index` read back as zero.
    ///
    /// # Errors
    ///
    /// [`StoreError::Full`] if the store is bounded and `index` is past the limit,
    /// [`StoreError::TooLarge`] if the store cannot grow that far.
    pub fn write_byte(&self, index: usize, byte: u8) -> Result<(), StoreError> {
        let mut data = self.0.data.lock();
        self.grow_to(&mut data, index, 1)?;
        #[allow(clippy::indexing_slicing)]
        {
            data[index] = byte;
        }
        Ok(())
    }

    /// Write `bytes` starting at `index`, growing the store if needed
    ///
    /// Returns the number of bytes written, which is always `bytes.len()`.
    /// A gap between the old end and `index` is zero-filled, even for an
    /// empty `bytes`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Full`] if the resulting size would exceed the limit, or
    /// [`StoreError::TooLarge`] if `index + bytes.len()` cannot be allocated.
    /// Nothing is written in either case.
    pub fn write(&self, index: usize, bytes: &[u8]) -> Result<usize, StoreError> {
        let mut data = self.0.data.lock();
        let end = self.grow_to(&mut data, index, bytes.len())?;
        #[allow(clippy::indexing_slicing)]
        {
            data[index..end].copy_from_slice(bytes);
        }
        Ok(bytes.len())
    }

    /// Append one byte at the current end
    ///
    /// Returns the index the byte was stored at.
    ///
    /// # Errors
    ///
    /// [`StoreError::Full`] if the store is already at its limit.
    pub fn append_byte(&self, byte: u8) -> Result<usize, StoreError> {
        let mut data = self.0.data.lock();
        let at = data.len();
        self.grow_to(&mut data, at, 1)?;
        #[allow(clippy::indexing_slicing)]
        {
            data[at] = byte;
        }
        Ok(at)
    }

    /// Append `bytes` at the current end
    ///
    /// Returns the index the first byte was stored at. The bytes land
    /// contiguously even when other handles append concurrently.
    ///
    /// # Errors
    ///
    /// [`StoreError::Full`] if the resulting size would exceed the limit.
    pub fn append(&self, bytes: &[u8]) -> Result<usize, StoreError> {
        let mut data = self.0.data.lock();
        let at = data.len();
        let end = self.grow_to(&mut data, at, bytes.len())?;
        #[allow(clippy::indexing_slicing)]
        {
            data[at..end].copy_from_slice(bytes);
        }
        Ok(at)
    }

    /// Byte at `index`, or `None` at end of data
    #[must_use]
    pub fn read_byte(&self, index: usize) -> Option<u8> {
        self.0.data.lock().get(index).copied()
    }

    /// Copy bytes starting at `index` into `buf`
    ///
    /// Returns `Some(n)` with `n <= buf.len()`, short when the end of data
    /// is near, or `None` when `index` is at or past the end.
    pub fn read(&self, index: usize, buf: &mut [u8]) -> Option<usize> {
        let data = self.0.data.lock();
        if index >= data.len() {
            return None;
        }
        let n = buf.len().min(data.len() - index);
        #[allow(clippy::indexing_slicing)]
        {
            buf[..n].copy_from_slice(&data[index..index + n]);
        }
        Some(n)
    }

    /// Discard everything past `new_len`
    ///
    /// Never grows the store. Returns `true` if bytes were discarded.
    pub fn truncate(&self, new_len: usize) -> bool {
        let mut data = self.0.data.lock();
        if new_len >= data.len() {
            return false;
        }
        log::trace!("store truncated from {} to {new_len} bytes", data.len());
        data.truncate(new_len);
        true
    }

    /// Current logical size
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.data.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.data.lock().is_empty()
    }

    /// Snapshot of the whole content
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.data.lock().clone()
    }

    /// Independent store with a snapshot of this one's content
    ///
    /// The copy keeps the size limit of the original.
    #[must_use]
    pub fn copy(&self) -> Self {
        let data = self.0.data.lock().clone();
        Self(Arc::new(StoreShared {
            data: Mutex::new(data),
            max_size: self.0.max_size,
        }))
    }

    /// Lock the store for reading
    ///
    /// # Example
    ///
    /// ```
    /// use memfile::io::ByteStore;
    ///
    /// let store = ByteStore::from_bytes(b"hello world");
    /// let guard = store.lock();
    /// assert_eq!(&guard[0..5], b"hello");
    /// ```
    #[must_use]
    pub fn lock(&self) -> StoreReadGuard<'_> {
        StoreReadGuard(self.0.data.lock())
    }

    /// Copy up to `count` bytes starting at `index` into `sink`
    ///
    /// The bytes are snapshotted under the lock and written to the sink
    /// after it is released. Returns the number of bytes transferred,
    /// zero when `index` is at or past the end.
    ///
    /// # Errors
    ///
    /// Whatever `sink` reports.
    pub fn transfer_to<W: io::Write + ?Sized>(
        &self,
        index: usize,
        count: usize,
        sink: &mut W,
    ) -> io::Result<usize> {
        let chunk = {
            let data = self.0.data.lock();
            if index >= data.len() {
                return Ok(0);
            }
            let end = data.len().min(index.saturating_add(count));
            data[index..end].to_vec()
        };
        sink.write_all(&chunk)?;
        Ok(chunk.len())
    }

    /// Read up to `count` bytes from `source` and write them at `index`
    ///
    /// Returns the number of bytes transferred. When the source is already
    /// exhausted the store is left untouched.
    ///
    /// # Errors
    ///
    /// Whatever `source` reports, or `StorageFull` if the store limit is hit.
    pub fn transfer_from<R: io::Read + ?Sized>(
        &self,
        source: &mut R,
        index: usize,
        count: usize,
    ) -> io::Result<usize> {
        let mut chunk = Vec::new();
        let limit = u64::try_from(count).unwrap_or(u64::MAX);
        Read::take(&mut *source, limit).read_to_end(&mut chunk)?;
        if chunk.is_empty() {
            return Ok(0);
        }
        Ok(self.write(index, &chunk)?)
    }
}

impl Default for ByteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ByteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ByteStore(size={}, max_size={:?})",
            self.size(),
            self.0.max_size
        )
    }
}
