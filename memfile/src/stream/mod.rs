//! Stream views over a file's content
//!
//! # Locking
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │ OutputStream │  │ OutputStream │  │ InputStream  │
//! │ Mutex<state> │  │ Mutex<state> │  │ Mutex<state> │
//! │ pos, append  │  │ pos, append  │  │ pos          │
//! └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!        │ one store call per view call      │
//!        ▼                 ▼                 ▼
//! ┌─────────────────────────────────────────────────┐
//! │  ByteStore (Arc + Mutex<Vec<u8>>)               │
//! │  each call atomic w.r.t. the others             │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! A view holds its own lock for the whole of each operation, so the
//! cursor update and the store call form one unit for that view. Views
//! are not ordered against each other: concurrent writers interleave at
//! call granularity. Lock order is view, then store, then file metadata.

mod input;
mod output;

pub use input::InputStream;
pub use output::OutputStream;

use std::mem;
use std::sync::Arc;

use crate::error::StreamError;
use crate::file::File;
use crate::io::ByteStore;

/// References held by an open view
pub(crate) struct OpenView {
    pub(crate) file: Arc<File>,
    pub(crate) store: ByteStore,
    pub(crate) pos: usize,
}

pub(crate) enum ViewState {
    Open(OpenView),
    Closed,
}

impl ViewState {
    pub(crate) fn open(file: Arc<File>) -> Self {
        let store = file.content();
        Self::Open(OpenView {
            file,
            store,
            pos: 0,
        })
    }

    pub(crate) fn get_mut(&mut self) -> Result<&mut OpenView, StreamError> {
        match self {
            Self::Open(view) => Ok(view),
            Self::Closed => Err(StreamError::Closed),
        }
    }

    pub(crate) fn get(&self) -> Result<&OpenView, StreamError> {
        match self {
            Self::Open(view) => Ok(view),
            Self::Closed => Err(StreamError::Closed),
        }
    }

    /// Switch to `Closed`, returning the released references if it was open
    pub(crate) fn close(&mut self) -> Option<OpenView> {
        match mem::replace(self, Self::Closed) {
            Self::Open(view) => Some(view),
            Self::Closed => None,
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
