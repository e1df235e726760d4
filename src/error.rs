//! Error types for CellStore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using CellStoreError
pub type Result<T> = std::result::Result<T, CellStoreError>;

/// Unified error type for CellStore operations
#[derive(Debug, Error)]
pub enum CellStoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    /// Unknown open-mode string, or an unmapped type/compression id during
    /// schema translation. Surfaced immediately, never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Descriptor Errors
    // -------------------------------------------------------------------------
    /// Descriptor out of range or pointing at a closed slot.
    #[error("Invalid array descriptor: {0}")]
    InvalidHandle(String),

    // -------------------------------------------------------------------------
    // Engine Errors
    // -------------------------------------------------------------------------
    /// Non-success status from the storage engine collaborator (open, create,
    /// load-schema, iterator init/advance, write). Never retried here; the
    /// engine boundary owns its own durability and retry policy.
    #[error("Engine failure: {0}")]
    Engine(String),

    // -------------------------------------------------------------------------
    // Layout Errors
    // -------------------------------------------------------------------------
    /// Internal buffer-slot bookkeeping mismatch, or a flat record that does
    /// not match the schema layout. A bug or corrupted input, not a condition
    /// callers can recover from.
    #[error("Buffer layout violation: {0}")]
    Layout(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),
}
