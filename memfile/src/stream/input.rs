//! Reading side of a file

use parking_lot::Mutex;
use std::fmt;
use std::io;
use std::sync::Arc;

use super::ViewState;
use crate::error::StreamError;
use crate::file::File;

/// Input stream over a [`File`]
///
/// Reads from the shared store at the stream's own position. Reaching the
/// end of data is not an error: [`read`](Self::read) returns `Ok(0)` and
/// [`read_byte`](Self::read_byte) returns `Ok(None)`. Data appended later
/// by a writer becomes readable on the next call.
///
/// # Thread Safety
///
/// Like [`OutputStream`](crate::OutputStream), each operation holds the
/// stream's own lock, so concurrent reads through one stream consume
/// disjoint ranges. Separate streams are independent.
///
/// Reads never touch the file's modification time.
pub struct InputStream {
    state: Mutex<ViewState>,
}

impl InputStream {
    /// Open a stream on `file`, positioned at the start
    #[must_use]
    pub fn new(file: Arc<File>) -> Self {
        log::debug!("input stream opened on {}", file.id());
        Self {
            state: Mutex::new(ViewState::open(file)),
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().is_closed()
    }

    /// Index of the next byte to read
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] after [`close`](Self::close).
    pub fn position(&self) -> Result<usize, StreamError> {
        Ok(self.state.lock().get()?.pos)
    }

    /// Read one byte, `None` at end of data
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] after [`close`](Self::close).
    pub fn read_byte(&self) -> Result<Option<u8>, StreamError> {
        let mut state = self.state.lock();
        let view = state.get_mut()?;

        let byte = view.store.read_byte(view.pos);
        if byte.is_some() {
            view.pos += 1;
        }
        Ok(byte)
    }

    /// Read into `buf`, returning the number of bytes read
    ///
    /// Returns `Ok(0)` at end of data, or when `buf` is empty.
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] after [`close`](Self::close).
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let mut state = self.state.lock();
        let view = state.get_mut()?;

        if buf.is_empty() {
            return Ok(0);
        }

        match view.store.read(view.pos, buf) {
            Some(n) => {
                view.pos += n;
                Ok(n)
            }
            None => Ok(0),
        }
    }

    /// Read into `buf[offset..offset + len]`
    ///
    /// The range is validated before the closed check.
    ///
    /// # Errors
    ///
    /// [`StreamError::IndexOutOfBounds`] if the range does not fit in
    /// `buf`, otherwise as for [`read`](Self::read).
    pub fn read_range(
        &self,
        buf: &mut [u8],
        offset: usize,
        len: usize,
    ) -> Result<usize, StreamError> {
        StreamError::check_range(offset, len, buf.len())?;
        self.read(&mut buf[offset..offset + len])
    }

    /// Move the position forward by up to `n` bytes, never past the end
    ///
    /// Returns how far the position moved.
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] after [`close`](Self::close).
    pub fn skip(&self, n: usize) -> Result<usize, StreamError> {
        let mut state = self.state.lock();
        let view = state.get_mut()?;

        let skipped = n.min(view.store.size().saturating_sub(view.pos));
        view.pos += skipped;
        Ok(skipped)
    }

    /// Bytes between the position and the current end of data
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] after [`close`](Self::close).
    pub fn available(&self) -> Result<usize, StreamError> {
        let state = self.state.lock();
        let view = state.get()?;
        Ok(view.store.size().saturating_sub(view.pos))
    }

    /// Release the file and store. Can be called multiple times.
    pub fn close(&self) {
        let released = self.state.lock().close();
        match released {
            Some(view) => log::debug!(
                "input stream closed on {} at pos {}",
                view.file.id(),
                view.pos
            ),
            None => log::debug!("InputStream::close() called on already closed stream"),
        }
    }
}

impl Drop for InputStream {
    fn drop(&mut self) {
        if !self.is_closed() {
            self.close();
        }
    }
}

impl fmt::Debug for InputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        match state.get() {
            Ok(view) => write!(f, "InputStream(file={}, pos={})", view.file.id(), view.pos),
            Err(_) => write!(f, "InputStream(closed)"),
        }
    }
}

impl io::Read for InputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(InputStream::read(self, buf)?)
    }
}

impl io::Read for &InputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(InputStream::read(self, buf)?)
    }
}

impl embedded_io::ErrorType for InputStream {
    type Error = StreamError;
}

impl embedded_io::Read for InputStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        InputStream::read(self, buf)
    }
}

impl embedded_io_async::Read for InputStream {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        InputStream::read(self, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ByteStore;

    fn file_with(bytes: &[u8]) -> Arc<File> {
        Arc::new(File::from_content(ByteStore::from_bytes(bytes)))
    }

    #[test]
    fn test_read_to_end() {
        let input = InputStream::new(file_with(b"abc"));
        let mut buf = [0u8; 2];

        assert_eq!(input.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"ab");
        assert_eq!(input.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'c');
        assert_eq!(input.read(&mut buf).unwrap(), 0);
        assert_eq!(input.read_byte().unwrap(), None);
    }

    #[test]
    fn test_skip_stops_at_end() {
        let input = InputStream::new(file_with(b"abcdef"));
        assert_eq!(input.skip(4).unwrap(), 4);
        assert_eq!(input.available().unwrap(), 2);
        assert_eq!(input.skip(10).unwrap(), 2);
        assert_eq!(input.available().unwrap(), 0);
        assert_eq!(input.position().unwrap(), 6);
    }

    #[test]
    fn test_closed_stream_rejects_reads() {
        let input = InputStream::new(file_with(b"abc"));
        input.close();
        input.close();

        let mut buf = [0u8; 1];
        assert_eq!(input.read(&mut buf), Err(StreamError::Closed));
        assert_eq!(input.read_byte(), Err(StreamError::Closed));
        assert_eq!(input.available(), Err(StreamError::Closed));
    }
}
