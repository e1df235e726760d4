//! Schema Module
//!
//! Describes an array: ordered attributes, ordered dimensions, coordinate
//! type/compression, and cell ordering. Pure data plus type-mapping logic;
//! no I/O happens here.
//!
//! ## Responsibilities
//! - Canonical attribute order (buffer indexing and flat-record layout
//!   both depend on it)
//! - Bidirectional mapping between field types and the engine's primitive
//!   type/compression identifiers
//! - Building the engine's array-creation request and decoding the engine's
//!   raw schema back into an [`ArraySchema`]

mod types;
mod model;

pub use types::{Compression, FieldType};
pub use model::{ArraySchema, Attribute, CellOrder, Dimension, ValueCount};
