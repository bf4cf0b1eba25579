//! In-memory file content with stream views
//!
//! A [`File`] owns one [`ByteStore`](io::ByteStore). Any number of
//! [`OutputStream`]s and [`InputStream`]s may be open on the same file at
//! once, each with its own cursor and lock, all sharing the store.
//!
//! ```
//! use memfile::File;
//! use std::sync::Arc;
//!
//! let file = Arc::new(File::new());
//! let log = file.new_output_stream(true);
//! log.write_buf(b"one ").unwrap();
//! log.write_buf(b"two").unwrap();
//!
//! let input = file.new_input_stream();
//! let mut buf = [0u8; 16];
//! let n = input.read(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"one two");
//! ```

pub mod error;
pub mod file;
pub mod idgen;
pub mod io;
pub mod stream;

pub use error::StreamError;
pub use file::{Clock, File, SystemClock};
pub use idgen::{FileId, IdGen};

// Re-export store types for convenience
pub use io::{ByteStore, StoreConfig, StoreError, StoreReadGuard};

pub use stream::{InputStream, OutputStream};
