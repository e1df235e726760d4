//! Field type and compression identifiers
//!
//! The engine speaks small integer ids for primitive types and compression
//! codecs; this module owns the bidirectional mapping. An id the mapping does
//! not know means corrupted or foreign schema data and is a fatal
//! configuration error.

use crate::error::{CellStoreError, Result};

/// Logical element type of an attribute (or of the coordinate tuple)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int32,
    Int64,
    Float32,
    Float64,
    Char,
    UInt8,
}

impl FieldType {
    /// Size of one element of this type, in bytes
    pub fn element_len(self) -> usize {
        match self {
            FieldType::Int32 => 4,
            FieldType::Int64 => 8,
            FieldType::Float32 => 4,
            FieldType::Float64 => 8,
            FieldType::Char => 1,
            FieldType::UInt8 => 1,
        }
    }

    /// Engine primitive-type id for this type
    pub fn engine_id(self) -> i32 {
        match self {
            FieldType::Int32 => 0,
            FieldType::Int64 => 1,
            FieldType::Float32 => 2,
            FieldType::Float64 => 3,
            FieldType::Char => 4,
            FieldType::UInt8 => 5,
        }
    }

    /// Decode an engine primitive-type id
    pub fn from_engine_id(id: i32) -> Result<Self> {
        match id {
            0 => Ok(FieldType::Int32),
            1 => Ok(FieldType::Int64),
            2 => Ok(FieldType::Float32),
            3 => Ok(FieldType::Float64),
            4 => Ok(FieldType::Char),
            5 => Ok(FieldType::UInt8),
            other => Err(CellStoreError::Config(format!(
                "unmapped engine type id {}",
                other
            ))),
        }
    }
}

/// Compression codec applied by the engine to one attribute's storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zstd,
}

impl Compression {
    /// Engine compression id for this codec
    pub fn engine_id(self) -> i32 {
        match self {
            Compression::None => 0,
            Compression::Gzip => 1,
            Compression::Zstd => 2,
        }
    }

    /// Decode an engine compression id
    pub fn from_engine_id(id: i32) -> Result<Self> {
        match id {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Gzip),
            2 => Ok(Compression::Zstd),
            other => Err(CellStoreError::Config(format!(
                "unmapped engine compression id {}",
                other
            ))),
        }
    }
}
