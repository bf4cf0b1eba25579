//! Writing side of a file
//!
//! Writes go to the file's shared store, either at the stream's own cursor
//! or, in append mode, at whatever the end of the store is at call time.

use parking_lot::Mutex;
use std::fmt;
use std::io;
use std::sync::Arc;

use super::ViewState;
use crate::error::StreamError;
use crate::file::File;

/// Output stream over a [`File`]
///
/// # Thread Safety
///
/// All methods take `&self`; share the stream with `Arc` or scoped
/// threads if needed.
///
/// - **Per-stream ordering**: every operation holds the stream's own
///   `parking_lot::Mutex` from the closed check to the modification-time
///   update. Two threads writing through the same stream never lose or
///   overlap a cursor advance.
/// - **Across streams**: no ordering beyond the store's per-call atomicity.
///   Two append streams on one file interleave whole calls, never bytes.
/// - **NOT reentrant**: do not call back into the same stream from a
///   [`Clock`](crate::Clock) implementation.
///
/// Every successful write call refreshes the file's modification time
/// once, including a zero-length write. Failed calls leave the cursor and
/// the time untouched.
///
/// # Example
///
/// ```
/// use memfile::File;
/// use std::sync::Arc;
///
/// let file = Arc::new(File::new());
/// let out = file.new_output_stream(false);
/// out.write_buf(&[1, 2, 3]).unwrap();
/// out.close();
///
/// assert_eq!(file.content().to_vec(), vec![1, 2, 3]);
/// assert!(out.write_byte(4).is_err());
/// ```
pub struct OutputStream {
    state: Mutex<ViewState>,
    append: bool,
}

impl OutputStream {
    /// Open a stream on `file`
    ///
    /// With `append == false` the cursor starts at 0 and existing content
    /// is overwritten in place. With `append == true` every write lands at
    /// the current end of the content.
    #[must_use]
    pub fn new(file: Arc<File>, append: bool) -> Self {
        log::debug!("output stream opened on {} (append={append})", file.id());
        Self {
            state: Mutex::new(ViewState::open(file)),
            append,
        }
    }

    #[must_use]
    pub fn is_append(&self) -> bool {
        self.append
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().is_closed()
    }

    /// Index of the next byte a non-append write targets
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] after [`close`](Self::close).
    pub fn position(&self) -> Result<usize, StreamError> {
        Ok(self.state.lock().get()?.pos)
    }

    /// Write one byte
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] after [`close`](Self::close), or
    /// [`StreamError::Store`] if the store refuses to grow.
    pub fn write_byte(&self, byte: u8) -> Result<(), StreamError> {
        let mut state = self.state.lock();
        let view = state.get_mut()?;

        if self.append {
            view.store.append_byte(byte)?;
        } else {
            view.store.write_byte(view.pos, byte)?;
            view.pos += 1;
        }

        view.file.update_modified_time();
        Ok(())
    }

    /// Write all of `bytes`
    ///
    /// # Errors
    ///
    /// As for [`write_byte`](Self::write_byte). Nothing is written on error.
    pub fn write_buf(&self, bytes: &[u8]) -> Result<(), StreamError> {
        let mut state = self.state.lock();
        let view = state.get_mut()?;

        if self.append {
            view.store.append(bytes)?;
        } else {
            view.pos += view.store.write(view.pos, bytes)?;
        }

        view.file.update_modified_time();
        Ok(())
    }

    /// Write `bytes[offset..offset + len]`
    ///
    /// The range is validated before anything else, so a bad range is
    /// reported even on a closed stream.
    ///
    /// # Errors
    ///
    /// [`StreamError::IndexOutOfBounds`] if the range does not fit in
    /// `bytes`, otherwise as for [`write_buf`](Self::write_buf).
    pub fn write_range(&self, bytes: &[u8], offset: usize, len: usize) -> Result<(), StreamError> {
        StreamError::check_range(offset, len, bytes.len())?;
        self.write_buf(&bytes[offset..offset + len])
    }

    /// Nothing is buffered; only checks that the stream is open
    ///
    /// # Errors
    ///
    /// [`StreamError::Closed`] after [`close`](Self::close).
    pub fn flush(&self) -> Result<(), StreamError> {
        self.state.lock().get().map(|_| ())
    }

    /// Release the file and store. Can be called multiple times.
    /// "drop" will call "close" automatically.
    pub fn close(&self) {
        let released = self.state.lock().close();
        match released {
            Some(view) => log::debug!(
                "output stream closed on {} at pos {} (append={})",
                view.file.id(),
                view.pos,
                self.append
            ),
            None => log::debug!("OutputStream::close() called on already closed stream"),
        }
    }
}

impl Drop for OutputStream {
    fn drop(&mut self) {
        if !self.is_closed() {
            self.close();
        }
    }
}

impl fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        match state.get() {
            Ok(view) => write!(
                f,
                "OutputStream(file={}, pos={}, append={})",
                view.file.id(),
                view.pos,
                self.append
            ),
            Err(_) => write!(f, "OutputStream(closed, append={})", self.append),
        }
    }
}

impl io::Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_buf(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        OutputStream::flush(self)?;
        Ok(())
    }
}

impl io::Write for &OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_buf(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        OutputStream::flush(self)?;
        Ok(())
    }
}

impl embedded_io::ErrorType for OutputStream {
    type Error = StreamError;
}

impl embedded_io::Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.write_buf(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        OutputStream::flush(self)
    }
}

impl embedded_io_async::Write for OutputStream {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.write_buf(buf)?;
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        OutputStream::flush(self)
    }
}
