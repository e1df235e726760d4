//! Write-side array handle
//!
//! Owns the per-array buffers and the engine handle for one opened array.
//! Closing (or dropping) a handle finalizes the engine side; a closed
//! handle's array name is empty, which is what marks its registry slot
//! unusable.

use std::sync::Arc;

use crate::buffer::BufferSet;
use crate::cell::CellBuilder;
use crate::config::OpenMode;
use crate::engine::ArrayEngine;
use crate::error::{CellStoreError, Result};
use crate::schema::ArraySchema;

/// State of one opened array: descriptor index, mode, schema snapshot,
/// write buffers (write mode only) and the engine handle
pub struct ArrayHandle<E: ArrayEngine> {
    index: usize,
    mode: OpenMode,
    array_name: String,
    schema: ArraySchema,
    buffers: Option<BufferSet>,
    engine_handle: Option<E::Handle>,
    engine: Arc<E>,
}

impl<E: ArrayEngine> ArrayHandle<E> {
    pub(crate) fn new(
        engine: Arc<E>,
        index: usize,
        mode: OpenMode,
        array_name: String,
        schema: ArraySchema,
        engine_handle: E::Handle,
        buffers: Option<BufferSet>,
    ) -> Self {
        Self {
            index,
            mode,
            array_name,
            schema,
            buffers,
            engine_handle: Some(engine_handle),
            engine,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn array_name(&self) -> &str {
        &self.array_name
    }

    pub fn schema(&self) -> &ArraySchema {
        &self.schema
    }

    /// An empty array name marks a closed slot
    pub fn is_open(&self) -> bool {
        !self.array_name.is_empty()
    }

    pub(crate) fn set_schema(&mut self, schema: ArraySchema) {
        self.schema = schema;
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Stage one flat record into the owned buffers and flush it through the
    /// engine
    ///
    /// Synchronous: on success the buffers may immediately be reused for the
    /// next cell.
    pub fn write_cell(&mut self, record: &[u8]) -> Result<()> {
        if !self.mode.is_write() {
            return Err(CellStoreError::Engine(format!(
                "array '{}' is open read-only",
                self.array_name
            )));
        }
        let buffers = self
            .buffers
            .as_mut()
            .ok_or_else(|| CellStoreError::Layout("write handle has no buffers".to_string()))?;
        CellBuilder::stage(&self.schema, record, buffers)?;
        let slots = buffers.resolved_slots(record)?;
        let handle = self.engine_handle.as_mut().ok_or_else(|| {
            CellStoreError::InvalidHandle(format!(
                "array '{}' has already been finalized",
                self.array_name
            ))
        })?;
        self.engine.write(handle, &slots)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Finalize the engine handle and mark this slot closed
    pub(crate) fn close(&mut self) -> Result<()> {
        if let Some(handle) = self.engine_handle.take() {
            self.engine.finalize(handle)?;
        }
        self.array_name.clear();
        self.buffers = None;
        Ok(())
    }
}

impl<E: ArrayEngine> Drop for ArrayHandle<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.engine_handle.take() {
            if let Err(e) = self.engine.finalize(handle) {
                tracing::warn!("finalize of array '{}' failed: {}", self.array_name, e);
            }
        }
    }
}
