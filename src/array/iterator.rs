//! Read-side cell iterator
//!
//! State machine: constructed → (has cell ⇄ advancing) → exhausted. Any
//! engine fault while initializing or advancing is fatal to the iterator;
//! there is no retry state.

use std::sync::Arc;

use crate::buffer::BufferSet;
use crate::cell::CellView;
use crate::engine::{ArrayEngine, CoordRange};
use crate::error::{CellStoreError, Result};
use crate::schema::ArraySchema;

/// Iterates the cells of one array, restricted to a coordinate range and an
/// attribute subset
pub struct CellIterator<E: ArrayEngine> {
    engine: Arc<E>,
    cursor: E::Cursor,
    buffers: BufferSet,
    queried: usize,
}

impl<E: ArrayEngine> CellIterator<E> {
    /// Build the buffers for the queried attributes plus coordinates and ask
    /// the engine to begin iterating
    pub(crate) fn new(
        engine: Arc<E>,
        schema: &ArraySchema,
        path: &str,
        range: &CoordRange,
        attribute_ids: &[usize],
        buffer_size: usize,
    ) -> Result<Self> {
        let buffers = BufferSet::build(schema, attribute_ids, buffer_size)?;
        let mut names = Vec::with_capacity(attribute_ids.len());
        for &id in attribute_ids {
            // build() above has already range-checked every id
            let attr = schema.attributes().get(id).ok_or_else(|| {
                CellStoreError::Layout(format!("attribute id {} out of range", id))
            })?;
            names.push(attr.name.clone());
        }
        let cursor = engine.begin_iterator(path, range, &names)?;
        tracing::debug!(
            "began iterating '{}' over {} attributes ({} slots)",
            path,
            attribute_ids.len(),
            buffers.slot_count()
        );

        let mut iter = Self {
            engine,
            cursor,
            buffers,
            queried: attribute_ids.len(),
        };
        if !iter.engine.cursor_done(&iter.cursor) {
            iter.engine.cursor_fill(&iter.cursor, &mut iter.buffers)?;
        }
        Ok(iter)
    }

    /// Whether the iteration is exhausted
    pub fn is_done(&self) -> bool {
        self.engine.cursor_done(&self.cursor)
    }

    /// Step to the next cell and refresh the buffers from the engine
    ///
    /// Advancing an exhausted iterator is an engine error. Any previously
    /// obtained [`CellView`] is invalidated by the borrow this takes.
    pub fn advance(&mut self) -> Result<()> {
        self.engine.cursor_advance(&mut self.cursor)?;
        if !self.engine.cursor_done(&self.cursor) {
            self.engine.cursor_fill(&self.cursor, &mut self.buffers)?;
        }
        Ok(())
    }

    /// View of the current cell, aliasing the engine-refreshed buffers
    ///
    /// Valid until the next [`advance`](Self::advance); calling this on an
    /// exhausted iterator is an error.
    pub fn current(&self) -> Result<CellView<'_>> {
        if self.is_done() {
            return Err(CellStoreError::Engine(
                "no current cell: iterator is exhausted".to_string(),
            ));
        }
        CellView::read_from(&self.buffers, self.queried)
    }
}
