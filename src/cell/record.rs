//! Flat record construction helper
//!
//! Builds the self-describing flat byte record `write_cell` consumes, in the
//! same schema order the staging walk expects.

/// Builder for one flat cell record
///
/// Push fields in schema attribute order, then finish with the coordinate
/// tuple.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    buf: Vec<u8>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fixed-length field's raw bytes (exactly
    /// `value_count × element_size` of them)
    pub fn fixed(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Append a single fixed `i32` field
    pub fn fixed_i32(self, value: i32) -> Self {
        self.fixed(&value.to_le_bytes())
    }

    /// Append a single fixed `i64` field
    pub fn fixed_i64(self, value: i64) -> Self {
        self.fixed(&value.to_le_bytes())
    }

    /// Append a variable-length field (u32 LE byte-length prefix + bytes)
    pub fn variable(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Close the record with its coordinate tuple
    pub fn finish(mut self, coords: &[i64]) -> Vec<u8> {
        for coord in coords {
            self.buf.extend_from_slice(&coord.to_le_bytes());
        }
        self.buf
    }
}
