//! Write-side cell staging
//!
//! Interprets one flat record (see the module docs for the format) and
//! stages it into a full-schema BufferSet: value slots point at byte ranges
//! inside the record, offset slots get the degenerate single zero, and the
//! coordinate tail is copied into the trailing slot.

use crate::buffer::BufferSet;
use crate::error::{CellStoreError, Result};
use crate::schema::ArraySchema;

/// Stages one flat record into a BufferSet ahead of an engine write
pub struct CellBuilder;

impl CellBuilder {
    /// Stage `record` into `buffers`
    ///
    /// Walks attributes in schema order with a running slot cursor. After
    /// the walk the cursor must land exactly on the coordinate slot and the
    /// record must end exactly at its coordinate tail; either mismatch is a
    /// layout violation, not a recoverable condition.
    pub fn stage(schema: &ArraySchema, record: &[u8], buffers: &mut BufferSet) -> Result<()> {
        if buffers.queried_count() != schema.attribute_num() {
            return Err(CellStoreError::Layout(format!(
                "write buffers built over {} attributes, schema has {}",
                buffers.queried_count(),
                schema.attribute_num()
            )));
        }

        let mut pos = 0usize;
        let mut slot_idx = 0usize;
        for attr in schema.attributes() {
            let field_len = match attr.fixed_len_bytes() {
                Some(len) => len,
                None => {
                    // Variable-length: u32 LE byte-length prefix
                    let prefix = record.get(pos..pos + 4).ok_or_else(|| {
                        CellStoreError::Layout(format!(
                            "record truncated reading the length prefix of field '{}'",
                            attr.name
                        ))
                    })?;
                    pos += 4;
                    u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize
                }
            };
            if record.len() < pos + field_len {
                return Err(CellStoreError::Layout(format!(
                    "record truncated inside field '{}': need {} bytes at offset {}, record is {} bytes",
                    attr.name,
                    field_len,
                    pos,
                    record.len()
                )));
            }
            if attr.is_variable_length() {
                buffers.stage_offset_zero(slot_idx)?;
                slot_idx += 1;
            }
            buffers.stage_value_range(slot_idx, pos..pos + field_len)?;
            slot_idx += 1;
            pos += field_len;
        }

        // The cursor must land exactly on the coordinate slot
        if slot_idx != buffers.coords_slot_index() {
            return Err(CellStoreError::Layout(format!(
                "staging cursor at slot {} after all attributes, coordinate slot is {}",
                slot_idx,
                buffers.coords_slot_index()
            )));
        }

        let dim_len = schema.dim_len_bytes();
        if record.len() != pos + dim_len {
            return Err(CellStoreError::Layout(format!(
                "record tail holds {} bytes, expected exactly {} coordinate bytes",
                record.len() - pos,
                dim_len
            )));
        }
        buffers.stage_coords_bytes(slot_idx, &record[pos..pos + dim_len])
    }
}
