//! Engine Module
//!
//! The seam to the external columnar array storage engine. The engine owns
//! persistence, compression and on-disk layout; this crate only exchanges
//! schemas and buffer sets with it through the [`ArrayEngine`] trait.
//!
//! [`FileEngine`] is the bundled reference collaborator: a single snapshot
//! file per array, good enough to drive the tests, benches and CLI, and a
//! template for wiring a real engine behind the same trait.

mod file;

use serde::{Deserialize, Serialize};

use crate::buffer::{BufferSet, SlotBytes};
use crate::config::OpenMode;
use crate::error::Result;

pub use file::{FileCursor, FileEngine, FileHandle};

/// Engine-side sentinel marking a variable-length attribute's cell value
/// count
pub const VAR_CELL_VAL_NUM: u32 = u32::MAX;

/// Engine cell-order id for column-major ordering
pub const CELL_ORDER_COL_MAJOR: i32 = 1;

/// Array-creation request handed to the engine
///
/// Attribute-parallel vectors are in canonical attribute order; `types` and
/// `compression` carry one extra trailing slot describing coordinate
/// storage. `domain` is the flattened `[lo0, hi0, lo1, hi1, ...]` bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayCreationRequest {
    pub path: String,
    pub attribute_names: Vec<String>,
    pub cell_val_num: Vec<u32>,
    pub types: Vec<i32>,
    pub compression: Vec<i32>,
    pub dim_names: Vec<String>,
    pub domain: Vec<i64>,
    pub cell_order: i32,
    pub capacity: u64,
}

/// Raw schema as the engine reports it
///
/// Same shape as [`ArrayCreationRequest`] minus the path; decoded back into
/// an `ArraySchema` by `ArraySchema::from_engine_schema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineArraySchema {
    pub attribute_names: Vec<String>,
    pub cell_val_num: Vec<u32>,
    pub types: Vec<i32>,
    pub compression: Vec<i32>,
    pub dim_names: Vec<String>,
    pub domain: Vec<i64>,
    pub cell_order: i32,
    pub capacity: u64,
}

impl From<&ArrayCreationRequest> for EngineArraySchema {
    fn from(request: &ArrayCreationRequest) -> Self {
        Self {
            attribute_names: request.attribute_names.clone(),
            cell_val_num: request.cell_val_num.clone(),
            types: request.types.clone(),
            compression: request.compression.clone(),
            dim_names: request.dim_names.clone(),
            domain: request.domain.clone(),
            cell_order: request.cell_order,
            capacity: request.capacity,
        }
    }
}

/// Inclusive per-dimension coordinate range filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordRange {
    pub bounds: Vec<(i64, i64)>,
}

impl CoordRange {
    pub fn new(bounds: Vec<(i64, i64)>) -> Self {
        Self { bounds }
    }

    /// Whether `coords` falls inside this range (false on dimensionality
    /// mismatch)
    pub fn contains(&self, coords: &[i64]) -> bool {
        coords.len() == self.bounds.len()
            && coords
                .iter()
                .zip(&self.bounds)
                .all(|(c, (lo, hi))| lo <= c && c <= hi)
    }
}

/// The external storage engine collaborator
///
/// All calls are synchronous and blocking from this crate's perspective.
/// Where the classic C surface exchanges raw buffer pointer/size tables,
/// this trait exchanges a [`BufferSet`] (read path, the engine fills it per
/// step) or a resolved [`SlotBytes`] table (write path).
pub trait ArrayEngine {
    /// Opaque per-array handle
    type Handle;

    /// Opaque iteration cursor
    type Cursor;

    /// Materialize a new array from a creation request
    fn create_array(&self, request: &ArrayCreationRequest) -> Result<()>;

    /// Open the array stored at `path`
    fn open_array(&self, path: &str, mode: OpenMode) -> Result<Self::Handle>;

    /// Load the raw schema of the array stored at `path`
    fn load_schema(&self, path: &str) -> Result<EngineArraySchema>;

    /// Begin iterating `path` restricted to `range`, fetching the named
    /// attributes (coordinates are always fetched)
    fn begin_iterator(
        &self,
        path: &str,
        range: &CoordRange,
        attribute_names: &[String],
    ) -> Result<Self::Cursor>;

    /// Whether the cursor is exhausted
    fn cursor_done(&self, cursor: &Self::Cursor) -> bool;

    /// Fill `buffers` with the cursor's current cell
    fn cursor_fill(&self, cursor: &Self::Cursor, buffers: &mut BufferSet) -> Result<()>;

    /// Advance the cursor one cell; advancing past the end is an error
    fn cursor_advance(&self, cursor: &mut Self::Cursor) -> Result<()>;

    /// Write one cell from the resolved slot table
    fn write(&self, handle: &mut Self::Handle, slots: &[SlotBytes<'_>]) -> Result<()>;

    /// Release a handle's engine-side resources
    fn finalize(&self, handle: Self::Handle) -> Result<()>;
}
