//! ArraySchema model and engine translation
//!
//! The ordered attribute list is the canonical field order: buffer slot
//! indexing and the flat-record layout on the write path both derive from it,
//! so both translation directions must preserve it exactly.

use crate::engine::{
    ArrayCreationRequest, CoordRange, EngineArraySchema, CELL_ORDER_COL_MAJOR, VAR_CELL_VAL_NUM,
};
use crate::error::{CellStoreError, Result};

use super::{Compression, FieldType};

/// Number of values a cell holds for one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCount {
    /// Exactly this many elements per cell
    Fixed(u32),

    /// Variable-length attribute; needs an offset buffer alongside its
    /// value buffer
    Variable,
}

impl ValueCount {
    /// Engine-side cell value count (variable length uses a reserved sentinel)
    pub fn engine_value(self) -> u32 {
        match self {
            ValueCount::Fixed(n) => n,
            ValueCount::Variable => VAR_CELL_VAL_NUM,
        }
    }

    /// Decode the engine-side cell value count
    pub fn from_engine_value(v: u32) -> Self {
        if v == VAR_CELL_VAL_NUM {
            ValueCount::Variable
        } else {
            ValueCount::Fixed(v)
        }
    }
}

/// A named, typed field of a logical record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub field_type: FieldType,
    pub value_count: ValueCount,
    pub compression: Compression,
}

impl Attribute {
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        value_count: ValueCount,
        compression: Compression,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            value_count,
            compression,
        }
    }

    /// Whether this attribute is variable-length
    pub fn is_variable_length(&self) -> bool {
        matches!(self.value_count, ValueCount::Variable)
    }

    /// Byte length of this field in a flat record, if fixed-length
    pub fn fixed_len_bytes(&self) -> Option<usize> {
        match self.value_count {
            ValueCount::Fixed(n) => Some(n as usize * self.field_type.element_len()),
            ValueCount::Variable => None,
        }
    }
}

/// One axis of the array's addressing space, with an inclusive domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub domain: (i64, i64),
}

impl Dimension {
    pub fn new(name: impl Into<String>, domain: (i64, i64)) -> Self {
        Self {
            name: name.into(),
            domain,
        }
    }
}

/// Global cell ordering of an array
///
/// Fixed to column-major for this system; kept as an enum so the engine
/// request carries an explicit order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOrder {
    ColumnMajor,
}

impl CellOrder {
    pub fn engine_id(self) -> i32 {
        match self {
            CellOrder::ColumnMajor => CELL_ORDER_COL_MAJOR,
        }
    }
}

/// Schema of one array: ordered attributes, ordered dimensions, coordinate
/// type/compression, cell ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySchema {
    array_name: String,
    attributes: Vec<Attribute>,
    dimensions: Vec<Dimension>,
    dim_type: FieldType,
    dim_compression: Compression,
    cell_order: CellOrder,
}

impl ArraySchema {
    /// Create a schema with 64-bit integer coordinates and uncompressed
    /// coordinate storage
    pub fn new(
        array_name: impl Into<String>,
        attributes: Vec<Attribute>,
        dimensions: Vec<Dimension>,
    ) -> Self {
        Self {
            array_name: array_name.into(),
            attributes,
            dimensions,
            dim_type: FieldType::Int64,
            dim_compression: Compression::None,
            cell_order: CellOrder::ColumnMajor,
        }
    }

    /// Set the compression applied to coordinate storage
    pub fn with_dim_compression(mut self, compression: Compression) -> Self {
        self.dim_compression = compression;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn array_name(&self) -> &str {
        &self.array_name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute_num(&self) -> usize {
        self.attributes.len()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dim_type(&self) -> FieldType {
        self.dim_type
    }

    pub fn dim_compression(&self) -> Compression {
        self.dim_compression
    }

    pub fn cell_order(&self) -> CellOrder {
        self.cell_order
    }

    /// Byte width of one coordinate tuple
    pub fn dim_len_bytes(&self) -> usize {
        self.dimensions.len() * self.dim_type.element_len()
    }

    /// Coordinate range covering the whole domain
    pub fn full_domain(&self) -> CoordRange {
        CoordRange::new(self.dimensions.iter().map(|d| d.domain).collect())
    }

    // =========================================================================
    // Engine Translation
    // =========================================================================

    /// Build the engine's array-creation request
    ///
    /// Emits, in attribute order: names, cell value counts (variable length
    /// as the reserved sentinel), mapped type and compression ids with one
    /// extra trailing slot each for coordinates; then dimension names and the
    /// flattened domain `[lo0, hi0, lo1, hi1, ...]`. Cell order is
    /// column-major, no regular tiling, capacity as given.
    pub fn to_engine_request(&self, path: impl Into<String>, capacity: u64) -> ArrayCreationRequest {
        let n = self.attributes.len();
        let mut attribute_names = Vec::with_capacity(n);
        let mut cell_val_num = Vec::with_capacity(n);
        let mut types = Vec::with_capacity(n + 1);
        let mut compression = Vec::with_capacity(n + 1);
        for attr in &self.attributes {
            attribute_names.push(attr.name.clone());
            cell_val_num.push(attr.value_count.engine_value());
            types.push(attr.field_type.engine_id());
            compression.push(attr.compression.engine_id());
        }
        // Trailing slots describe coordinate storage
        types.push(self.dim_type.engine_id());
        compression.push(self.dim_compression.engine_id());

        let mut dim_names = Vec::with_capacity(self.dimensions.len());
        let mut domain = Vec::with_capacity(2 * self.dimensions.len());
        for dim in &self.dimensions {
            dim_names.push(dim.name.clone());
            domain.push(dim.domain.0);
            domain.push(dim.domain.1);
        }

        ArrayCreationRequest {
            path: path.into(),
            attribute_names,
            cell_val_num,
            types,
            compression,
            dim_names,
            domain,
            cell_order: self.cell_order.engine_id(),
            capacity,
        }
    }

    /// Decode an engine-reported schema
    ///
    /// Exact inverse of [`to_engine_request`](Self::to_engine_request): the
    /// attribute order the engine reports is reproduced as-is, the trailing
    /// type/compression slots become the coordinate type/compression, and the
    /// flattened domain pairs rebuild the dimension list.
    pub fn from_engine_schema(array_name: impl Into<String>, raw: &EngineArraySchema) -> Result<Self> {
        let n = raw.attribute_names.len();
        if raw.cell_val_num.len() != n || raw.types.len() != n + 1 || raw.compression.len() != n + 1 {
            return Err(CellStoreError::Config(format!(
                "malformed engine schema: {} attributes but {} value counts, {} types, {} compression ids",
                n,
                raw.cell_val_num.len(),
                raw.types.len(),
                raw.compression.len()
            )));
        }
        if raw.domain.len() != 2 * raw.dim_names.len() {
            return Err(CellStoreError::Config(format!(
                "malformed engine schema: {} dimensions but {} domain bounds",
                raw.dim_names.len(),
                raw.domain.len()
            )));
        }
        if raw.cell_order != CELL_ORDER_COL_MAJOR {
            return Err(CellStoreError::Config(format!(
                "unsupported cell order id {} (only column-major is supported)",
                raw.cell_order
            )));
        }

        let mut attributes = Vec::with_capacity(n);
        for i in 0..n {
            attributes.push(Attribute {
                name: raw.attribute_names[i].clone(),
                field_type: FieldType::from_engine_id(raw.types[i])?,
                value_count: ValueCount::from_engine_value(raw.cell_val_num[i]),
                compression: Compression::from_engine_id(raw.compression[i])?,
            });
        }

        let dimensions = raw
            .dim_names
            .iter()
            .enumerate()
            .map(|(i, name)| Dimension::new(name.clone(), (raw.domain[2 * i], raw.domain[2 * i + 1])))
            .collect();

        Ok(Self {
            array_name: array_name.into(),
            attributes,
            dimensions,
            dim_type: FieldType::from_engine_id(raw.types[n])?,
            dim_compression: Compression::from_engine_id(raw.compression[n])?,
            cell_order: CellOrder::ColumnMajor,
        })
    }
}
