//! Store configuration.

/// Configuration for opening a record store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the data file (header only) if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to sync the file after every persisted slot.
    pub sync_on_write: bool,

    /// Whether failing to take the advisory file lock aborts the open.
    ///
    /// When false the store opens without cross-process exclusivity.
    pub require_file_lock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: false,
            sync_on_write: true,
            require_file_lock: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the data file if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to sync after every write.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Sets whether the advisory file lock is mandatory.
    #[must_use]
    pub const fn require_file_lock(mut self, value: bool) -> Self {
        self.require_file_lock = value;
        self
    }
}
