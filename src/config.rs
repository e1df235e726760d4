//! Configuration for CellStore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{CellStoreError, Result};

/// Default per-slot buffer capacity (10 MB, a cap per slot, not a record count)
pub const DEFAULT_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Default capacity hint passed to the engine at array creation
pub const DEFAULT_CAPACITY: u64 = 1000;

/// Main configuration for a CellStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Workspace Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all arrays; an array named `a` lives at
    /// `{workspace}/a` from the engine's point of view.
    pub workspace: PathBuf,

    // -------------------------------------------------------------------------
    // Buffer Configuration
    // -------------------------------------------------------------------------
    /// Capacity of each buffer slot, in bytes. Allocated once per opened
    /// array or iterator and reused across steps/writes.
    pub buffer_size: usize,

    /// Capacity hint handed to the engine when defining an array
    pub capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("./cellstore_workspace"),
            buffer_size: DEFAULT_BUFFER_SIZE,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the workspace directory (root for all arrays)
    pub fn workspace(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.workspace = path.into();
        self
    }

    /// Set the per-slot buffer capacity (in bytes)
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Set the array-creation capacity hint
    pub fn capacity(mut self, capacity: u64) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Mode an array is opened in
///
/// Parsed once from the caller-facing mode string at the StorageManager
/// boundary; carried as an enum everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only open (`"r"`)
    Read,

    /// Write open (`"w"`)
    Write,
}

impl OpenMode {
    /// Parse a caller-facing mode string
    ///
    /// Only `"r"` and `"w"` are recognized; anything else is a
    /// configuration error.
    pub fn parse(mode: &str) -> Result<Self> {
        match mode {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::Write),
            other => Err(CellStoreError::Config(format!(
                "unknown open mode \"{}\" (expected \"r\" or \"w\")",
                other
            ))),
        }
    }

    /// Whether this mode permits writes
    pub fn is_write(self) -> bool {
        matches!(self, OpenMode::Write)
    }
}
