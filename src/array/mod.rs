//! Array Module
//!
//! Per-array read and write state.
//!
//! ## Responsibilities
//! - [`CellIterator`]: read-side consumer — drives the engine cursor and
//!   exposes each cell as a borrowed [`CellView`](crate::cell::CellView)
//! - [`ArrayHandle`]: write-side state — owns the full-schema buffers and
//!   performs one-cell flushes through the engine
//!
//! A buffer set is exclusively owned by exactly one iterator or handle; the
//! view returned by `current()` borrows the iterator and is therefore
//! invalidated by the next advancement at compile time.

mod handle;
mod iterator;

pub use handle::ArrayHandle;
pub use iterator::CellIterator;
