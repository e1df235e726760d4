//! Tests for schema translation
//!
//! These tests verify:
//! - Round-tripping a schema through the engine request and back
//! - Variable-length sentinel handling
//! - Creation-request shape (trailing coordinate slots, flattened domain)
//! - Rejection of unmapped ids and malformed engine schemas

use cellstore::engine::{EngineArraySchema, CELL_ORDER_COL_MAJOR, VAR_CELL_VAL_NUM};
use cellstore::{
    ArraySchema, Attribute, CellStoreError, Compression, Dimension, FieldType, ValueCount,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_schema() -> ArraySchema {
    ArraySchema::new(
        "vars",
        vec![
            Attribute::new("count", FieldType::Int32, ValueCount::Fixed(1), Compression::None),
            Attribute::new("tags", FieldType::Char, ValueCount::Variable, Compression::Gzip),
            Attribute::new("scores", FieldType::Float64, ValueCount::Fixed(3), Compression::Zstd),
        ],
        vec![
            Dimension::new("row", (0, 100)),
            Dimension::new("col", (-5, 250)),
        ],
    )
}

fn raw_schema() -> EngineArraySchema {
    EngineArraySchema::from(&sample_schema().to_engine_request("/ws/vars", 1000))
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_round_trip_schema() {
    let schema = sample_schema();
    let raw = EngineArraySchema::from(&schema.to_engine_request("/ws/vars", 1000));
    let decoded = ArraySchema::from_engine_schema("vars", &raw).unwrap();

    assert_eq!(decoded, schema);
}

#[test]
fn test_round_trip_preserves_attribute_order() {
    let decoded = ArraySchema::from_engine_schema("vars", &raw_schema()).unwrap();
    let names: Vec<&str> = decoded.attributes().iter().map(|a| a.name.as_str()).collect();

    assert_eq!(names, vec!["count", "tags", "scores"]);
}

// =============================================================================
// Request Shape Tests
// =============================================================================

#[test]
fn test_request_carries_trailing_coordinate_slots() {
    let schema = sample_schema();
    let request = schema.to_engine_request("/ws/vars", 500);

    assert_eq!(request.attribute_names.len(), 3);
    assert_eq!(request.cell_val_num.len(), 3);
    // One extra type/compression slot for coordinates
    assert_eq!(request.types.len(), 4);
    assert_eq!(request.compression.len(), 4);
    assert_eq!(request.types[3], FieldType::Int64.engine_id());
    assert_eq!(request.compression[3], Compression::None.engine_id());
    assert_eq!(request.cell_order, CELL_ORDER_COL_MAJOR);
    assert_eq!(request.capacity, 500);
}

#[test]
fn test_request_flattens_domain_pairs() {
    let request = sample_schema().to_engine_request("/ws/vars", 1000);

    assert_eq!(request.dim_names, vec!["row", "col"]);
    assert_eq!(request.domain, vec![0, 100, -5, 250]);
}

#[test]
fn test_variable_length_uses_sentinel() {
    let request = sample_schema().to_engine_request("/ws/vars", 1000);

    assert_eq!(request.cell_val_num[0], 1);
    assert_eq!(request.cell_val_num[1], VAR_CELL_VAL_NUM);
    assert_eq!(request.cell_val_num[2], 3);
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_unmapped_type_id_is_config_error() {
    let mut raw = raw_schema();
    raw.types[0] = 99;

    let err = ArraySchema::from_engine_schema("vars", &raw).unwrap_err();
    assert!(matches!(err, CellStoreError::Config(_)));
}

#[test]
fn test_unmapped_compression_id_is_config_error() {
    let mut raw = raw_schema();
    raw.compression[1] = -3;

    let err = ArraySchema::from_engine_schema("vars", &raw).unwrap_err();
    assert!(matches!(err, CellStoreError::Config(_)));
}

#[test]
fn test_malformed_shape_is_rejected() {
    let mut raw = raw_schema();
    raw.types.pop();

    let err = ArraySchema::from_engine_schema("vars", &raw).unwrap_err();
    assert!(matches!(err, CellStoreError::Config(_)));
}

#[test]
fn test_foreign_cell_order_is_rejected() {
    let mut raw = raw_schema();
    raw.cell_order = 7;

    let err = ArraySchema::from_engine_schema("vars", &raw).unwrap_err();
    assert!(matches!(err, CellStoreError::Config(_)));
}

// =============================================================================
// Size Helper Tests
// =============================================================================

#[test]
fn test_fixed_field_byte_lengths() {
    let schema = sample_schema();

    assert_eq!(schema.attributes()[0].fixed_len_bytes(), Some(4));
    assert_eq!(schema.attributes()[1].fixed_len_bytes(), None);
    assert_eq!(schema.attributes()[2].fixed_len_bytes(), Some(24));
    assert_eq!(schema.dim_len_bytes(), 16);
}

#[test]
fn test_full_domain_range() {
    let range = sample_schema().full_domain();

    assert_eq!(range.bounds, vec![(0, 100), (-5, 250)]);
    assert!(range.contains(&[0, 250]));
    assert!(!range.contains(&[101, 0]));
    assert!(!range.contains(&[0, 0, 0]));
}
