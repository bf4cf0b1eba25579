//! Storage for file content
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Stream views (crate::stream)       │
//! │  - per-view lock and cursor         │
//! │  - append or positional writes      │
//! └─────────────────────────────────────┘
//!          ▲
//!          │ one store call per view call
//!          ▼
//! ┌─────────────────────────────────────┐
//! │  ByteStore (shared storage)         │
//! │  - Arc<Mutex<Vec<u8>>>              │
//! │  - write/append grow and zero-fill  │
//! │  - read/truncate/size               │
//! └─────────────────────────────────────┘
//!          ▲
//!          │ owned by
//!          ▼
//! ┌─────────────────────────────────────┐
//! │  File (crate::File)                 │
//! │  - one store per file               │
//! │  - modification time                │
//! └─────────────────────────────────────┘
//! ```

pub mod bytestore;
pub mod config;

pub use bytestore::{ByteStore, StoreError, StoreReadGuard};
pub use config::StoreConfig;
