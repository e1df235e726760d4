//! Buffer Module
//!
//! The ordered collection of byte buffers exchanged with the storage engine.
//!
//! ## Slot Layout
//! ```text
//! attribute walk (schema order)           slots
//! ┌─────────────────────────────┐   ┌──────────────┐
//! │ fixed-length attribute      │ → │ Value        │
//! │ variable-length attribute   │ → │ Offset,Value │
//! │ ... per chosen attribute    │   │ ...          │
//! │ (always, at the end)        │ → │ Coords       │
//! └─────────────────────────────┘   └──────────────┘
//! ```
//!
//! For `a` fixed-length and `b` variable-length attributes the set holds
//! exactly `a + 2b + 1` slots, regardless of capacity. The assignment is
//! recomputable purely from the schema and the chosen attribute ids; there is
//! no hidden state.

mod slots;

pub use slots::{BufferSet, BufferSlot, SlotBytes, SlotRole};
