//! BufferSet implementation
//!
//! One ordered `Vec<BufferSlot>` replaces the classic three parallel arrays
//! (buffers, pointers, sizes): each slot owns its storage and carries its own
//! used-length, so moving the set never invalidates anything. Write-side
//! staging records offset ranges into the caller's flat record instead of raw
//! pointers; [`BufferSet::resolved_slots`] is the pointer/size table the
//! engine consumes.

use std::ops::Range;

use bytes::BytesMut;

use crate::error::{CellStoreError, Result};
use crate::schema::ArraySchema;

/// Role of one buffer slot within the set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    /// Offsets of variable-length values within the paired value slot
    Offset,

    /// Value bytes of one attribute
    Value,

    /// Coordinate tuple bytes (always the trailing slot)
    Coords,
}

/// One buffer slot: role, owned storage, used byte count, and (write side
/// only) the staged range into the caller's flat record
#[derive(Debug)]
pub struct BufferSlot {
    role: SlotRole,
    storage: BytesMut,
    used: usize,
    staged: Option<Range<usize>>,
}

impl BufferSlot {
    fn new(role: SlotRole, capacity: usize) -> Self {
        Self {
            role,
            storage: BytesMut::zeroed(capacity),
            used: 0,
            staged: None,
        }
    }

    pub fn role(&self) -> SlotRole {
        self.role
    }

    /// Used byte count (set by the last fill or staging operation)
    pub fn used(&self) -> usize {
        self.used
    }

    /// Owned bytes currently held by this slot
    pub fn bytes(&self) -> &[u8] {
        &self.storage[..self.used]
    }
}

/// Resolved per-slot bytes handed to the engine on a write call
#[derive(Debug, Clone, Copy)]
pub struct SlotBytes<'a> {
    pub role: SlotRole,
    pub bytes: &'a [u8],
}

/// The ordered buffer collection mirroring the engine's buffer-based I/O
/// contract
#[derive(Debug)]
pub struct BufferSet {
    slots: Vec<BufferSlot>,
    /// Slot index of the value slot for each queried position
    value_slot_for_query: Vec<usize>,
    buffer_size: usize,
}

impl BufferSet {
    /// Build the slot layout for the chosen attribute subset
    ///
    /// Walks `attribute_ids` in the order given (all attributes in schema
    /// order for writes, the requested subset for reads): variable-length
    /// attributes get an offset slot then a value slot, fixed-length
    /// attributes a value slot, and one trailing coordinate slot closes the
    /// set. Every slot is allocated at `buffer_size` capacity.
    pub fn build(schema: &ArraySchema, attribute_ids: &[usize], buffer_size: usize) -> Result<Self> {
        let min_capacity = schema.dim_len_bytes().max(std::mem::size_of::<u64>());
        if buffer_size < min_capacity {
            return Err(CellStoreError::Config(format!(
                "buffer_size {} is below the {} bytes the coordinate and offset slots need",
                buffer_size, min_capacity
            )));
        }

        let mut slots = Vec::new();
        let mut value_slot_for_query = Vec::with_capacity(attribute_ids.len());
        for &id in attribute_ids {
            let attr = schema.attributes().get(id).ok_or_else(|| {
                CellStoreError::Layout(format!(
                    "attribute id {} out of range for schema with {} attributes",
                    id,
                    schema.attribute_num()
                ))
            })?;
            if attr.is_variable_length() {
                slots.push(BufferSlot::new(SlotRole::Offset, buffer_size));
            }
            value_slot_for_query.push(slots.len());
            slots.push(BufferSlot::new(SlotRole::Value, buffer_size));
        }
        slots.push(BufferSlot::new(SlotRole::Coords, buffer_size));

        Ok(Self {
            slots,
            value_slot_for_query,
            buffer_size,
        })
    }

    /// Build the slot layout over every schema attribute (write path)
    pub fn build_full(schema: &ArraySchema, buffer_size: usize) -> Result<Self> {
        let ids: Vec<usize> = (0..schema.attribute_num()).collect();
        Self::build(schema, &ids, buffer_size)
    }

    // =========================================================================
    // Layout Accessors
    // =========================================================================

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of attributes this set was built over
    pub fn queried_count(&self) -> usize {
        self.value_slot_for_query.len()
    }

    /// Slot index of the trailing coordinate slot
    pub fn coords_slot_index(&self) -> usize {
        self.slots.len() - 1
    }

    /// Slot index of the value slot for queried position `query_idx`
    pub fn value_slot_index(&self, query_idx: usize) -> Option<usize> {
        self.value_slot_for_query.get(query_idx).copied()
    }

    pub fn slot(&self, index: usize) -> Option<&BufferSlot> {
        self.slots.get(index)
    }

    /// Per-slot capacity this set was allocated with
    pub fn capacity(&self) -> usize {
        self.buffer_size
    }

    // =========================================================================
    // Read-side Fill (called by the engine on each iterator step)
    // =========================================================================

    /// Copy variable-length offsets into the offset slot paired with queried
    /// position `query_idx`
    pub fn fill_offsets(&mut self, query_idx: usize, offsets: &[u64]) -> Result<()> {
        let value_idx = self.value_slot_index(query_idx).ok_or_else(|| {
            CellStoreError::Layout(format!("queried position {} has no slot", query_idx))
        })?;
        if value_idx == 0 || self.slots[value_idx - 1].role != SlotRole::Offset {
            return Err(CellStoreError::Layout(format!(
                "queried position {} has no offset slot (fixed-length attribute?)",
                query_idx
            )));
        }
        let len = offsets.len() * std::mem::size_of::<u64>();
        self.check_capacity(len)?;
        let slot = &mut self.slots[value_idx - 1];
        for (i, offset) in offsets.iter().enumerate() {
            slot.storage[i * 8..(i + 1) * 8].copy_from_slice(&offset.to_le_bytes());
        }
        slot.used = len;
        slot.staged = None;
        Ok(())
    }

    /// Copy value bytes into the value slot for queried position `query_idx`
    pub fn fill_value(&mut self, query_idx: usize, bytes: &[u8]) -> Result<()> {
        let value_idx = self.value_slot_index(query_idx).ok_or_else(|| {
            CellStoreError::Layout(format!("queried position {} has no slot", query_idx))
        })?;
        self.check_capacity(bytes.len())?;
        let slot = &mut self.slots[value_idx];
        slot.storage[..bytes.len()].copy_from_slice(bytes);
        slot.used = bytes.len();
        slot.staged = None;
        Ok(())
    }

    /// Copy the coordinate tuple into the trailing coordinate slot
    pub fn fill_coords(&mut self, coords: &[i64]) -> Result<()> {
        let len = coords.len() * std::mem::size_of::<i64>();
        self.check_capacity(len)?;
        let idx = self.coords_slot_index();
        let slot = &mut self.slots[idx];
        for (i, coord) in coords.iter().enumerate() {
            slot.storage[i * 8..(i + 1) * 8].copy_from_slice(&coord.to_le_bytes());
        }
        slot.used = len;
        slot.staged = None;
        Ok(())
    }

    fn check_capacity(&self, len: usize) -> Result<()> {
        if len > self.buffer_size {
            return Err(CellStoreError::Engine(format!(
                "cell data of {} bytes exceeds the {} byte slot capacity",
                len, self.buffer_size
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Write-side Staging (called by CellBuilder)
    // =========================================================================

    /// Write the single degenerate offset word `0` into an offset slot
    ///
    /// One logical cell per write call means the engine's general multi-cell
    /// offset protocol collapses to a lone zero.
    pub(crate) fn stage_offset_zero(&mut self, slot_idx: usize) -> Result<()> {
        let slot = self.slot_for_staging(slot_idx, SlotRole::Offset)?;
        slot.storage[..8].copy_from_slice(&0u64.to_le_bytes());
        slot.used = std::mem::size_of::<u64>();
        slot.staged = None;
        Ok(())
    }

    /// Point a value slot at a byte range of the caller's flat record
    ///
    /// Nothing is copied; the record must stay untouched until the engine
    /// write call returns.
    pub(crate) fn stage_value_range(&mut self, slot_idx: usize, range: Range<usize>) -> Result<()> {
        let used = range.len();
        let slot = self.slot_for_staging(slot_idx, SlotRole::Value)?;
        slot.staged = Some(range);
        slot.used = used;
        Ok(())
    }

    /// Copy coordinate bytes from the record tail into the coordinate slot
    ///
    /// Copied, not aliased: the engine expects the coordinate slot to be
    /// engine-exchange storage owned by this set.
    pub(crate) fn stage_coords_bytes(&mut self, slot_idx: usize, bytes: &[u8]) -> Result<()> {
        self.check_capacity(bytes.len())?;
        let slot = self.slot_for_staging(slot_idx, SlotRole::Coords)?;
        slot.storage[..bytes.len()].copy_from_slice(bytes);
        slot.used = bytes.len();
        slot.staged = None;
        Ok(())
    }

    fn slot_for_staging(&mut self, slot_idx: usize, expected: SlotRole) -> Result<&mut BufferSlot> {
        let count = self.slots.len();
        let slot = self.slots.get_mut(slot_idx).ok_or_else(|| {
            CellStoreError::Layout(format!(
                "staging cursor at slot {} but the set has {} slots",
                slot_idx, count
            ))
        })?;
        if slot.role != expected {
            return Err(CellStoreError::Layout(format!(
                "staging cursor expected a {:?} slot at index {}, found {:?}",
                expected, slot_idx, slot.role
            )));
        }
        Ok(slot)
    }

    // =========================================================================
    // Write-side Resolution (the engine's pointer/size table)
    // =========================================================================

    /// Resolve every slot to its byte slice for one engine write call
    ///
    /// Staged slots resolve into `record`; owned slots (offsets, coordinates)
    /// resolve into their own storage.
    pub fn resolved_slots<'a>(&'a self, record: &'a [u8]) -> Result<Vec<SlotBytes<'a>>> {
        let mut resolved = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let bytes = match &slot.staged {
                Some(range) => record.get(range.clone()).ok_or_else(|| {
                    CellStoreError::Layout(format!(
                        "staged range {}..{} lies outside the {} byte record",
                        range.start,
                        range.end,
                        record.len()
                    ))
                })?,
                None => &slot.storage[..slot.used],
            };
            resolved.push(SlotBytes {
                role: slot.role,
                bytes,
            });
        }
        Ok(resolved)
    }
}
