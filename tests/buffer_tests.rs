//! Tests for buffer layout and cell staging
//!
//! These tests verify:
//! - Deterministic slot counts (`a + 2b + 1`) and slot role ordering
//! - Staging one flat record: zero offset word, aliased value ranges,
//!   copied coordinates
//! - Rejection of truncated/oversized records and undersized buffers

use cellstore::buffer::{BufferSet, SlotRole};
use cellstore::cell::CellBuilder;
use cellstore::{
    ArraySchema, Attribute, CellStoreError, Compression, Dimension, FieldType, RecordBuilder,
    ValueCount,
};

// =============================================================================
// Helper Functions
// =============================================================================

const BUFFER_SIZE: usize = 4096;

/// Two fixed attributes around one variable attribute
fn mixed_schema() -> ArraySchema {
    ArraySchema::new(
        "mixed",
        vec![
            Attribute::new("count", FieldType::Int32, ValueCount::Fixed(1), Compression::None),
            Attribute::new("tags", FieldType::Char, ValueCount::Variable, Compression::None),
            Attribute::new("pair", FieldType::Int64, ValueCount::Fixed(2), Compression::None),
        ],
        vec![
            Dimension::new("row", (0, 1000)),
            Dimension::new("col", (0, 1000)),
        ],
    )
}

fn sample_record() -> Vec<u8> {
    RecordBuilder::new()
        .fixed_i32(5)
        .variable(b"AB")
        .fixed(&[1i64.to_le_bytes(), 2i64.to_le_bytes()].concat())
        .finish(&[3, 7])
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_buffer_count_full_schema() {
    let schema = mixed_schema();

    // 2 fixed + 1 variable: 2 + 2*1 + 1 slots
    let buffers = BufferSet::build_full(&schema, BUFFER_SIZE).unwrap();
    assert_eq!(buffers.slot_count(), 5);
}

#[test]
fn test_buffer_count_independent_of_capacity() {
    let schema = mixed_schema();

    let small = BufferSet::build_full(&schema, 64).unwrap();
    let large = BufferSet::build_full(&schema, 1 << 20).unwrap();
    assert_eq!(small.slot_count(), large.slot_count());
}

#[test]
fn test_buffer_count_for_subset() {
    let schema = mixed_schema();

    // Only the variable attribute: offset + value + coords
    let buffers = BufferSet::build(&schema, &[1], BUFFER_SIZE).unwrap();
    assert_eq!(buffers.slot_count(), 3);
    assert_eq!(buffers.queried_count(), 1);
}

#[test]
fn test_slot_role_order() {
    let schema = mixed_schema();
    let buffers = BufferSet::build_full(&schema, BUFFER_SIZE).unwrap();

    let roles: Vec<SlotRole> = (0..buffers.slot_count())
        .map(|i| buffers.slot(i).unwrap().role())
        .collect();
    assert_eq!(
        roles,
        vec![
            SlotRole::Value,  // count
            SlotRole::Offset, // tags offsets
            SlotRole::Value,  // tags values
            SlotRole::Value,  // pair
            SlotRole::Coords,
        ]
    );
    assert_eq!(buffers.coords_slot_index(), 4);
    assert_eq!(buffers.value_slot_index(0), Some(0));
    assert_eq!(buffers.value_slot_index(1), Some(2));
    assert_eq!(buffers.value_slot_index(2), Some(3));
}

#[test]
fn test_attribute_id_out_of_range() {
    let schema = mixed_schema();

    let err = BufferSet::build(&schema, &[3], BUFFER_SIZE).unwrap_err();
    assert!(matches!(err, CellStoreError::Layout(_)));
}

#[test]
fn test_undersized_buffer_rejected() {
    let schema = mixed_schema();

    // Coordinate slot alone needs 16 bytes
    let err = BufferSet::build_full(&schema, 8).unwrap_err();
    assert!(matches!(err, CellStoreError::Config(_)));
}

// =============================================================================
// Staging Tests
// =============================================================================

#[test]
fn test_stage_offset_invariant() {
    let schema = mixed_schema();
    let mut buffers = BufferSet::build_full(&schema, BUFFER_SIZE).unwrap();
    let record = sample_record();

    CellBuilder::stage(&schema, &record, &mut buffers).unwrap();

    // Exactly one offset word, equal to zero
    let offset_slot = buffers.slot(1).unwrap();
    assert_eq!(offset_slot.used(), 8);
    assert_eq!(offset_slot.bytes(), &0u64.to_le_bytes());
}

#[test]
fn test_stage_resolves_field_ranges() {
    let schema = mixed_schema();
    let mut buffers = BufferSet::build_full(&schema, BUFFER_SIZE).unwrap();
    let record = sample_record();

    CellBuilder::stage(&schema, &record, &mut buffers).unwrap();
    let slots = buffers.resolved_slots(&record).unwrap();

    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0].bytes, &5i32.to_le_bytes());
    assert_eq!(slots[2].bytes, b"AB");
    assert_eq!(slots[3].bytes, &[1i64.to_le_bytes(), 2i64.to_le_bytes()].concat()[..]);

    // Coordinates are copied into owned storage, not aliased
    let mut coords = Vec::new();
    coords.extend_from_slice(&3i64.to_le_bytes());
    coords.extend_from_slice(&7i64.to_le_bytes());
    assert_eq!(slots[4].bytes, &coords[..]);
}

#[test]
fn test_stage_empty_variable_field() {
    let schema = mixed_schema();
    let mut buffers = BufferSet::build_full(&schema, BUFFER_SIZE).unwrap();
    let record = RecordBuilder::new()
        .fixed_i32(1)
        .variable(b"")
        .fixed(&[0u8; 16])
        .finish(&[0, 0]);

    CellBuilder::stage(&schema, &record, &mut buffers).unwrap();
    let slots = buffers.resolved_slots(&record).unwrap();

    assert_eq!(slots[2].bytes, b"");
    assert_eq!(slots[1].bytes, &0u64.to_le_bytes());
}

#[test]
fn test_stage_truncated_record() {
    let schema = mixed_schema();
    let mut buffers = BufferSet::build_full(&schema, BUFFER_SIZE).unwrap();
    let mut record = sample_record();
    record.truncate(record.len() - 20);

    let err = CellBuilder::stage(&schema, &record, &mut buffers).unwrap_err();
    assert!(matches!(err, CellStoreError::Layout(_)));
}

#[test]
fn test_stage_record_with_trailing_garbage() {
    let schema = mixed_schema();
    let mut buffers = BufferSet::build_full(&schema, BUFFER_SIZE).unwrap();
    let mut record = sample_record();
    record.push(0xAA);

    let err = CellBuilder::stage(&schema, &record, &mut buffers).unwrap_err();
    assert!(matches!(err, CellStoreError::Layout(_)));
}

#[test]
fn test_stage_requires_full_schema_buffers() {
    let schema = mixed_schema();
    let mut buffers = BufferSet::build(&schema, &[0], BUFFER_SIZE).unwrap();

    let err = CellBuilder::stage(&schema, &sample_record(), &mut buffers).unwrap_err();
    assert!(matches!(err, CellStoreError::Layout(_)));
}

// =============================================================================
// Fill Tests (read side)
// =============================================================================

#[test]
fn test_fill_value_overflow_is_engine_error() {
    let schema = mixed_schema();
    let mut buffers = BufferSet::build_full(&schema, 16).unwrap();

    let err = buffers.fill_value(0, &[0u8; 17]).unwrap_err();
    assert!(matches!(err, CellStoreError::Engine(_)));
}

#[test]
fn test_fill_offsets_requires_offset_slot() {
    let schema = mixed_schema();
    let mut buffers = BufferSet::build_full(&schema, BUFFER_SIZE).unwrap();

    // Queried position 0 ("count") is fixed-length, no offset slot
    let err = buffers.fill_offsets(0, &[0]).unwrap_err();
    assert!(matches!(err, CellStoreError::Layout(_)));
}
