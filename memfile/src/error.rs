//! Errors reported by stream views

use std::io;

use crate::io::StoreError;

/// Error type for stream operations
///
/// End of data is not an error: reads report it as `Ok(0)` or `Ok(None)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("stream is closed")]
    Closed,

    #[error("range [{offset}, {offset} + {len}) is out of bounds for buffer of length {buf_len}")]
    IndexOutOfBounds {
        offset: usize,
        len: usize,
        buf_len: usize,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StreamError {
    /// Check that `[offset, offset + len)` lies within a buffer of `buf_len` bytes
    pub(crate) fn check_range(offset: usize, len: usize, buf_len: usize) -> Result<(), Self> {
        match offset.checked_add(len) {
            Some(end) if end <= buf_len => Ok(()),
            _ => Err(Self::IndexOutOfBounds {
                offset,
                len,
                buf_len,
            }),
        }
    }
}

impl embedded_io::Error for StreamError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            StreamError::Closed => embedded_io::ErrorKind::BrokenPipe,
            StreamError::IndexOutOfBounds { .. } => embedded_io::ErrorKind::InvalidInput,
            StreamError::Store(StoreError::Full { .. } | StoreError::TooLarge { .. }) => {
                embedded_io::ErrorKind::OutOfMemory
            }
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Closed => io::Error::new(io::ErrorKind::BrokenPipe, e),
            StreamError::IndexOutOfBounds { .. } => io::Error::new(io::ErrorKind::InvalidInput, e),
            StreamError::Store(store) => store.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::Error as _;

    #[test]
    fn test_check_range() {
        assert!(StreamError::check_range(0, 5, 5).is_ok());
        assert!(StreamError::check_range(5, 0, 5).is_ok());
        assert_eq!(
            StreamError::check_range(3, 10, 5),
            Err(StreamError::IndexOutOfBounds {
                offset: 3,
                len: 10,
                buf_len: 5
            })
        );
        assert!(StreamError::check_range(usize::MAX, 2, 5).is_err());
    }

    #[test]
    fn test_io_error_kinds() {
        let err: io::Error = StreamError::Closed.into();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        let err: io::Error = StreamError::check_range(1, 9, 2).unwrap_err().into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err: io::Error = StreamError::Store(StoreError::Full {
            requested: 2,
            limit: 1,
        })
        .into();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    }

    #[test]
    fn test_embedded_io_kinds() {
        assert_eq!(
            StreamError::Closed.kind(),
            embedded_io::ErrorKind::BrokenPipe
        );
        assert_eq!(
            StreamError::Store(StoreError::Full {
                requested: 2,
                limit: 1
            })
            .kind(),
            embedded_io::ErrorKind::OutOfMemory
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(StreamError::Closed.to_string(), "stream is closed");
        assert_eq!(
            StreamError::check_range(3, 10, 5).unwrap_err().to_string(),
            "range [3, 3 + 10) is out of bounds for buffer of length 5"
        );
    }
}
