//! Cell Module
//!
//! The in-memory representations of one logical record (cell = attribute
//! values + coordinate tuple).
//!
//! ## Flat Record Format (write input)
//! ```text
//! ┌──────────────┬───────────────────────┬─────┬────────────────┐
//! │ fixed field  │ var field             │ ... │ coordinates    │
//! │ count × elem │ len (u32 LE) + bytes  │     │ dims × i64 LE  │
//! └──────────────┴───────────────────────┴─────┴────────────────┘
//! ```
//! Attribute fields appear in schema order; fixed-length fields are exactly
//! `value_count × element_size` raw bytes, variable-length fields carry a
//! little-endian u32 byte-length prefix, and the coordinate tuple closes the
//! record.

mod builder;
mod record;
mod view;

pub use builder::CellBuilder;
pub use record::RecordBuilder;
pub use view::CellView;
