//! # CellStore
//!
//! Buffer-layout and cell-marshalling adaptation layer between a
//! multi-attribute variant-record schema and a columnar array storage
//! engine that exchanges cells as flat byte buffers:
//! - Bidirectional schema translation (domain types ⇄ engine primitive ids)
//! - Deterministic buffer-slot layout per attribute subset
//! - Zero-copy read views and one-cell buffered writes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    StorageManager                           │
//! │        (descriptors, open/close, schema translation)        │
//! └──────────────┬───────────────────────────┬──────────────────┘
//!                │ read                      │ write
//! ┌──────────────▼──────────┐   ┌────────────▼─────────────────┐
//! │      CellIterator       │   │        ArrayHandle           │
//! │  (CellView over slots)  │   │  (CellBuilder staging)       │
//! └──────────────┬──────────┘   └────────────┬─────────────────┘
//!                │                           │
//! ┌──────────────▼───────────────────────────▼──────────────────┐
//! │                        BufferSet                            │
//! │   (offset/value slots per attribute + coordinate slot)      │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │
//!                ┌───────────▼───────────┐
//!                │   ArrayEngine trait   │
//!                │ (FileEngine bundled)  │
//!                └───────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod schema;
pub mod buffer;
pub mod cell;
pub mod engine;
pub mod array;
pub mod manager;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CellStoreError, Result};
pub use config::{Config, OpenMode};
pub use schema::{ArraySchema, Attribute, Compression, Dimension, FieldType, ValueCount};
pub use engine::{ArrayEngine, CoordRange, FileEngine};
pub use cell::{CellView, RecordBuilder};
pub use manager::StorageManager;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of CellStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
