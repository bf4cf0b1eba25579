//! Store configuration

/// Configuration for a [`ByteStore`](super::ByteStore)
///
/// The default is an empty, unbounded store with no preallocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Bytes to preallocate. A hint only: it never changes the logical size.
    pub initial_capacity: usize,
    /// Upper bound on the logical size, `None` for unbounded.
    pub max_size: Option<usize>,
}

impl StoreConfig {
    /// Unbounded store, no preallocation.
    pub const UNBOUNDED: Self = Self {
        initial_capacity: 0,
        max_size: None,
    };

    /// Set the preallocation hint
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Limit the logical size of the store
    #[must_use]
    pub fn with_max_size(mut self, limit: usize) -> Self {
        self.max_size = Some(limit);
        self
    }

    /// Preallocation actually performed: the hint, clamped to the size limit.
    #[must_use]
    pub fn effective_capacity(&self) -> usize {
        match self.max_size {
            Some(limit) => self.initial_capacity.min(limit),
            None => self.initial_capacity,
        }
    }
}
