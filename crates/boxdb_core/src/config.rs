//! Store configuration.

use boxdb_engine::DEFAULT_MAX_READERS;

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deepest nesting level a transaction scope may reach (depth 0 is the
    /// top-level transaction).
    pub max_nesting_depth: u32,

    /// Maximum number of concurrently open read transactions.
    ///
    /// Applied to engines the store creates itself.
    pub max_readers: usize,

    /// Whether the store rejects all write transactions.
    pub read_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_nesting_depth: 64,
            max_readers: DEFAULT_MAX_READERS,
            read_only: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn max_nesting_depth(mut self, depth: u32) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Sets the maximum number of concurrent readers.
    #[must_use]
    pub const fn max_readers(mut self, readers: usize) -> Self {
        self.max_readers = readers;
        self
    }

    /// Sets whether the store is read-only.
    #[must_use]
    pub const fn read_only(mut self, value: bool) -> Self {
        self.read_only = value;
        self
    }
}
