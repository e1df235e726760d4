//! Read-side cell view
//!
//! A non-owning view over the current contents of a BufferSet. The borrow
//! ties the view to the iterator that produced it, so the compiler rejects
//! holding a view across an advancement step.

use crate::buffer::BufferSet;
use crate::error::{CellStoreError, Result};

/// Borrowed view of one cell: per-attribute field bytes plus the coordinate
/// pair
#[derive(Debug)]
pub struct CellView<'a> {
    fields: Vec<&'a [u8]>,
    coords: (i64, i64),
}

impl<'a> CellView<'a> {
    /// Refresh a view from the buffer set's current contents
    ///
    /// Aliases each queried value slot's bytes (no copies) and decodes the
    /// trailing coordinate slot, which must hold exactly two 64-bit
    /// coordinates.
    pub fn read_from(buffers: &'a BufferSet, queried: usize) -> Result<Self> {
        let mut fields = Vec::with_capacity(queried);
        for query_idx in 0..queried {
            let slot_idx = buffers.value_slot_index(query_idx).ok_or_else(|| {
                CellStoreError::Layout(format!(
                    "queried attribute {} has no value slot in a set built over {}",
                    query_idx,
                    buffers.queried_count()
                ))
            })?;
            let slot = buffers.slot(slot_idx).ok_or_else(|| {
                CellStoreError::Layout(format!("value slot index {} out of range", slot_idx))
            })?;
            fields.push(slot.bytes());
        }

        let coords_slot = buffers
            .slot(buffers.coords_slot_index())
            .ok_or_else(|| CellStoreError::Layout("buffer set has no coordinate slot".to_string()))?;
        let coord_bytes = coords_slot.bytes();
        if coord_bytes.len() != 16 {
            return Err(CellStoreError::Layout(format!(
                "coordinate slot holds {} bytes, expected 16 (two 64-bit coordinates)",
                coord_bytes.len()
            )));
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&coord_bytes[..8]);
        let first = i64::from_le_bytes(word);
        word.copy_from_slice(&coord_bytes[8..]);
        let second = i64::from_le_bytes(word);

        Ok(Self {
            fields,
            coords: (first, second),
        })
    }

    /// Field bytes for queried attribute `i`
    pub fn field(&self, i: usize) -> Option<&'a [u8]> {
        self.fields.get(i).copied()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Coordinate pair of this cell
    pub fn coords(&self) -> (i64, i64) {
        self.coords
    }
}
