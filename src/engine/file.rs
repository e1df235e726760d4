//! File-backed reference engine
//!
//! One snapshot file per array:
//!
//! ```text
//! ┌──────────┬───────────┬─────────────┬─────────────────┬──────────┐
//! │ Magic(4) │Version(2) │ PayloadLen(8)│ bincode payload │ CRC32(4) │
//! └──────────┴───────────┴─────────────┴─────────────────┴──────────┘
//! ```
//!
//! Cells are kept in a `BTreeMap` keyed by the reversed coordinate tuple,
//! which makes map order the array's column-major cell order. Writes are
//! eager: every cell insert rewrites the snapshot. That is fine for a
//! reference collaborator; a production engine would batch and tile.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::buffer::{BufferSet, SlotBytes, SlotRole};
use crate::config::OpenMode;
use crate::error::{CellStoreError, Result};

use super::{ArrayCreationRequest, ArrayEngine, CoordRange, EngineArraySchema, VAR_CELL_VAL_NUM};

/// Snapshot file magic
const MAGIC: &[u8; 4] = b"CSA1";

/// Snapshot format version
const VERSION: u16 = 1;

/// Magic + version + payload length
const HEADER_LEN: usize = 4 + 2 + 8;

/// One stored cell: coordinate tuple plus one byte vector per attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCell {
    coords: Vec<i64>,
    fields: Vec<Vec<u8>>,
}

/// Full array state held in one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredArray {
    schema: EngineArraySchema,
    /// Keyed by the reversed coordinate tuple: column-major order
    cells: BTreeMap<Vec<i64>, StoredCell>,
}

/// Column-major sort key for a coordinate tuple
fn cell_key(coords: &[i64]) -> Vec<i64> {
    coords.iter().rev().copied().collect()
}

fn write_snapshot(path: &Path, array: &StoredArray) -> Result<()> {
    let payload = bincode::serialize(array)
        .map_err(|e| CellStoreError::Serialization(format!("snapshot encode failed: {}", e)))?;
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&payload);
    let crc = hasher.finalize();

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len() + 4);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&VERSION.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(&payload);
    buf.extend_from_slice(&crc.to_le_bytes());
    fs::write(path, buf)?;
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<StoredArray> {
    let buf = fs::read(path)?;
    if buf.len() < HEADER_LEN + 4 || &buf[..4] != MAGIC {
        return Err(CellStoreError::Engine(format!(
            "'{}' is not an array snapshot",
            path.display()
        )));
    }
    let version = u16::from_le_bytes([buf[4], buf[5]]);
    if version != VERSION {
        return Err(CellStoreError::Engine(format!(
            "unsupported snapshot version {} in '{}'",
            version,
            path.display()
        )));
    }
    let payload_len = u64::from_le_bytes(buf[6..14].try_into().unwrap_or_default()) as usize;
    if buf.len() != HEADER_LEN + payload_len + 4 {
        return Err(CellStoreError::Engine(format!(
            "truncated array snapshot '{}'",
            path.display()
        )));
    }
    let payload = &buf[HEADER_LEN..HEADER_LEN + payload_len];
    let stored_crc = u32::from_le_bytes(
        buf[HEADER_LEN + payload_len..]
            .try_into()
            .unwrap_or_default(),
    );
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(payload);
    if hasher.finalize() != stored_crc {
        return Err(CellStoreError::Engine(format!(
            "checksum mismatch in array snapshot '{}'",
            path.display()
        )));
    }
    bincode::deserialize(payload)
        .map_err(|e| CellStoreError::Serialization(format!("snapshot decode failed: {}", e)))
}

/// Handle to one opened array file
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    mode: OpenMode,
    state: StoredArray,
}

/// Cursor over the cells of one range-restricted scan
#[derive(Debug)]
pub struct FileCursor {
    schema: EngineArraySchema,
    /// Schema attribute index per queried position
    queried: Vec<usize>,
    cells: Vec<StoredCell>,
    pos: usize,
}

/// Reference engine storing each array as one checksummed snapshot file
///
/// A write handle has exclusive use of its array within one engine instance;
/// a second write open of the same path fails until the first handle is
/// finalized.
#[derive(Debug, Default)]
pub struct FileEngine {
    open_writers: RwLock<HashSet<PathBuf>>,
}

impl FileEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArrayEngine for FileEngine {
    type Handle = FileHandle;
    type Cursor = FileCursor;

    fn create_array(&self, request: &ArrayCreationRequest) -> Result<()> {
        let n = request.attribute_names.len();
        if request.cell_val_num.len() != n
            || request.types.len() != n + 1
            || request.compression.len() != n + 1
            || request.domain.len() != 2 * request.dim_names.len()
        {
            return Err(CellStoreError::Engine(format!(
                "malformed creation request for '{}'",
                request.path
            )));
        }
        let path = PathBuf::from(&request.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let array = StoredArray {
            schema: EngineArraySchema::from(request),
            cells: BTreeMap::new(),
        };
        write_snapshot(&path, &array)?;
        tracing::debug!("created array snapshot at '{}'", path.display());
        Ok(())
    }

    fn open_array(&self, path: &str, mode: OpenMode) -> Result<FileHandle> {
        let path = PathBuf::from(path);
        let state = read_snapshot(&path)?;
        if mode.is_write() {
            let mut writers = self.open_writers.write();
            if !writers.insert(path.clone()) {
                return Err(CellStoreError::Engine(format!(
                    "array '{}' is already open for writing",
                    path.display()
                )));
            }
        }
        Ok(FileHandle { path, mode, state })
    }

    fn load_schema(&self, path: &str) -> Result<EngineArraySchema> {
        Ok(read_snapshot(Path::new(path))?.schema)
    }

    fn begin_iterator(
        &self,
        path: &str,
        range: &CoordRange,
        attribute_names: &[String],
    ) -> Result<FileCursor> {
        let array = read_snapshot(Path::new(path))?;
        let schema = array.schema;
        if range.bounds.len() != schema.dim_names.len() {
            return Err(CellStoreError::Engine(format!(
                "range has {} bounds, array '{}' has {} dimensions",
                range.bounds.len(),
                path,
                schema.dim_names.len()
            )));
        }
        let mut queried = Vec::with_capacity(attribute_names.len());
        for name in attribute_names {
            let idx = schema
                .attribute_names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| {
                    CellStoreError::Engine(format!(
                        "array '{}' has no attribute named '{}'",
                        path, name
                    ))
                })?;
            queried.push(idx);
        }
        // BTreeMap order is the column-major cell order
        let cells = array
            .cells
            .into_values()
            .filter(|c| range.contains(&c.coords))
            .collect();
        Ok(FileCursor {
            schema,
            queried,
            cells,
            pos: 0,
        })
    }

    fn cursor_done(&self, cursor: &FileCursor) -> bool {
        cursor.pos >= cursor.cells.len()
    }

    fn cursor_fill(&self, cursor: &FileCursor, buffers: &mut BufferSet) -> Result<()> {
        let cell = cursor
            .cells
            .get(cursor.pos)
            .ok_or_else(|| CellStoreError::Engine("cursor is exhausted".to_string()))?;
        if cell.fields.len() != cursor.schema.attribute_names.len() {
            return Err(CellStoreError::Engine(format!(
                "stored cell has {} fields, schema has {} attributes",
                cell.fields.len(),
                cursor.schema.attribute_names.len()
            )));
        }
        for (query_idx, &attr_idx) in cursor.queried.iter().enumerate() {
            if cursor.schema.cell_val_num[attr_idx] == VAR_CELL_VAL_NUM {
                // One cell per step, so a lone zero offset
                buffers.fill_offsets(query_idx, &[0])?;
            }
            buffers.fill_value(query_idx, &cell.fields[attr_idx])?;
        }
        buffers.fill_coords(&cell.coords)
    }

    fn cursor_advance(&self, cursor: &mut FileCursor) -> Result<()> {
        if cursor.pos >= cursor.cells.len() {
            return Err(CellStoreError::Engine(
                "advance past the end of the iteration".to_string(),
            ));
        }
        cursor.pos += 1;
        Ok(())
    }

    fn write(&self, handle: &mut FileHandle, slots: &[SlotBytes<'_>]) -> Result<()> {
        if !handle.mode.is_write() {
            return Err(CellStoreError::Engine(format!(
                "array '{}' was opened read-only",
                handle.path.display()
            )));
        }
        let schema = &handle.state.schema;
        let mut slot_idx = 0usize;
        let mut fields = Vec::with_capacity(schema.attribute_names.len());
        for (attr_idx, name) in schema.attribute_names.iter().enumerate() {
            if schema.cell_val_num[attr_idx] == VAR_CELL_VAL_NUM {
                let offset_slot = slots.get(slot_idx).ok_or_else(|| {
                    CellStoreError::Engine(format!("missing offset slot for attribute '{}'", name))
                })?;
                if offset_slot.role != SlotRole::Offset {
                    return Err(CellStoreError::Engine(format!(
                        "expected offset slot for attribute '{}', found {:?}",
                        name, offset_slot.role
                    )));
                }
                slot_idx += 1;
            }
            let value_slot = slots.get(slot_idx).ok_or_else(|| {
                CellStoreError::Engine(format!("missing value slot for attribute '{}'", name))
            })?;
            if value_slot.role != SlotRole::Value {
                return Err(CellStoreError::Engine(format!(
                    "expected value slot for attribute '{}', found {:?}",
                    name, value_slot.role
                )));
            }
            fields.push(value_slot.bytes.to_vec());
            slot_idx += 1;
        }

        let coords_slot = slots
            .get(slot_idx)
            .ok_or_else(|| CellStoreError::Engine("missing coordinate slot".to_string()))?;
        if coords_slot.role != SlotRole::Coords || slot_idx + 1 != slots.len() {
            return Err(CellStoreError::Engine(format!(
                "slot table does not end with the coordinate slot ({} of {} slots consumed)",
                slot_idx + 1,
                slots.len()
            )));
        }
        let dim_num = schema.dim_names.len();
        if coords_slot.bytes.len() != dim_num * 8 {
            return Err(CellStoreError::Engine(format!(
                "coordinate slot holds {} bytes, array has {} dimensions",
                coords_slot.bytes.len(),
                dim_num
            )));
        }
        let coords: Vec<i64> = coords_slot
            .bytes
            .chunks_exact(8)
            .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect();
        for (d, coord) in coords.iter().enumerate() {
            let (lo, hi) = (schema.domain[2 * d], schema.domain[2 * d + 1]);
            if *coord < lo || *coord > hi {
                return Err(CellStoreError::Engine(format!(
                    "coordinate {} of dimension '{}' outside domain [{}, {}]",
                    coord, schema.dim_names[d], lo, hi
                )));
            }
        }

        handle
            .state
            .cells
            .insert(cell_key(&coords), StoredCell { coords, fields });
        write_snapshot(&handle.path, &handle.state)
    }

    fn finalize(&self, handle: FileHandle) -> Result<()> {
        if handle.mode.is_write() {
            self.open_writers.write().remove(&handle.path);
        }
        Ok(())
    }
}
