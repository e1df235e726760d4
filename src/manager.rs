//! Storage Manager
//!
//! Workspace-scoped registry of open arrays.
//!
//! ## Responsibilities
//! - Open/close arrays at `workspace/array_name` and hand out descriptors
//! - Translate schemas in both directions (define/retrieve)
//! - Produce read iterators and forward one-cell writes
//!
//! Every descriptor-taking operation first checks the descriptor is in range
//! and its slot still open; failing that check is an invalid-handle error.
//! The one deliberately soft failure is [`StorageManager::open`] returning
//! `Ok(None)`: probing for an array's existence is normal control flow.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::array::{ArrayHandle, CellIterator};
use crate::buffer::BufferSet;
use crate::config::{Config, OpenMode};
use crate::engine::{ArrayEngine, CoordRange, FileEngine};
use crate::error::{CellStoreError, Result};
use crate::schema::ArraySchema;

/// Coordinates schema translation, descriptor registry and handle/iterator
/// creation over one engine instance
pub struct StorageManager<E: ArrayEngine = FileEngine> {
    workspace: PathBuf,
    buffer_size: usize,
    capacity: u64,
    engine: Arc<E>,
    open_arrays: Vec<ArrayHandle<E>>,
}

impl StorageManager<FileEngine> {
    /// Manager over the bundled file-backed reference engine
    ///
    /// Creates the workspace directory if needed.
    pub fn with_file_engine(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.workspace)?;
        Ok(Self::new(config, FileEngine::new()))
    }
}

impl<E: ArrayEngine> StorageManager<E> {
    /// Manager over an arbitrary engine collaborator
    pub fn new(config: Config, engine: E) -> Self {
        Self {
            workspace: config.workspace,
            buffer_size: config.buffer_size,
            capacity: config.capacity,
            engine: Arc::new(engine),
            open_arrays: Vec::new(),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Number of registry slots handed out so far (closed slots included)
    pub fn open_count(&self) -> usize {
        self.open_arrays.len()
    }

    fn array_path(&self, array_name: &str) -> String {
        self.workspace.join(array_name).to_string_lossy().into_owned()
    }

    // =========================================================================
    // Descriptor Validation
    // =========================================================================

    fn handle(&self, ad: usize) -> Result<&ArrayHandle<E>> {
        match self.open_arrays.get(ad) {
            Some(handle) if handle.is_open() => Ok(handle),
            Some(_) => Err(CellStoreError::InvalidHandle(format!(
                "descriptor {} refers to a closed array",
                ad
            ))),
            None => Err(CellStoreError::InvalidHandle(format!(
                "descriptor {} out of range ({} slots)",
                ad,
                self.open_arrays.len()
            ))),
        }
    }

    fn handle_mut(&mut self, ad: usize) -> Result<&mut ArrayHandle<E>> {
        let count = self.open_arrays.len();
        match self.open_arrays.get_mut(ad) {
            Some(handle) if handle.is_open() => Ok(handle),
            Some(_) => Err(CellStoreError::InvalidHandle(format!(
                "descriptor {} refers to a closed array",
                ad
            ))),
            None => Err(CellStoreError::InvalidHandle(format!(
                "descriptor {} out of range ({} slots)",
                ad, count
            ))),
        }
    }

    // =========================================================================
    // Open / Close
    // =========================================================================

    /// Open `array_name` in mode `"r"` or `"w"` and return its descriptor
    ///
    /// Unknown mode strings are a configuration error. An engine-side open
    /// failure returns `Ok(None)` instead — callers routinely probe for
    /// array existence. Any failure after the engine open releases the
    /// partially-opened engine resource.
    pub fn open(&mut self, array_name: &str, mode: &str) -> Result<Option<usize>> {
        let mode = OpenMode::parse(mode)?;
        let path = self.array_path(array_name);
        let engine_handle = match self.engine.open_array(&path, mode) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::debug!("open of array '{}' failed: {}", array_name, e);
                return Ok(None);
            }
        };

        let schema = match self.load_array_schema(array_name) {
            Ok(schema) => schema,
            Err(e) => {
                let _ = self.engine.finalize(engine_handle);
                return Err(e);
            }
        };
        // Write mode pre-allocates the full-schema buffers
        let buffers = if mode.is_write() {
            match BufferSet::build_full(&schema, self.buffer_size) {
                Ok(buffers) => Some(buffers),
                Err(e) => {
                    let _ = self.engine.finalize(engine_handle);
                    return Err(e);
                }
            }
        } else {
            None
        };

        let ad = self.open_arrays.len();
        self.open_arrays.push(ArrayHandle::new(
            Arc::clone(&self.engine),
            ad,
            mode,
            array_name.to_string(),
            schema,
            engine_handle,
            buffers,
        ));
        tracing::info!("opened array '{}' ({:?}) as descriptor {}", array_name, mode, ad);
        Ok(Some(ad))
    }

    /// Finalize the engine handle behind `ad` and mark its slot closed
    pub fn close(&mut self, ad: usize) -> Result<()> {
        self.handle_mut(ad)?.close()?;
        tracing::info!("closed descriptor {}", ad);
        Ok(())
    }

    // =========================================================================
    // Schema Definition / Retrieval
    // =========================================================================

    /// Translate `schema` into a creation request and ask the engine to
    /// materialize it
    pub fn define_array(&self, schema: &ArraySchema) -> Result<()> {
        let request = schema.to_engine_request(self.array_path(schema.array_name()), self.capacity);
        self.engine.create_array(&request)?;
        tracing::info!("defined array '{}'", schema.array_name());
        Ok(())
    }

    /// Load and decode the engine's current schema for `array_name`
    pub fn load_array_schema(&self, array_name: &str) -> Result<ArraySchema> {
        let raw = self.engine.load_schema(&self.array_path(array_name))?;
        ArraySchema::from_engine_schema(array_name, &raw)
    }

    /// Load the schema for an open descriptor, refreshing the handle's
    /// cached copy
    pub fn get_array_schema(&mut self, ad: usize) -> Result<ArraySchema> {
        let array_name = self.handle(ad)?.array_name().to_string();
        let schema = self.load_array_schema(&array_name)?;
        self.handle_mut(ad)?.set_schema(schema.clone());
        Ok(schema)
    }

    // =========================================================================
    // Read / Write
    // =========================================================================

    /// Begin iterating the array behind `ad`, restricted to `range`,
    /// fetching `attribute_ids`
    pub fn begin(
        &self,
        ad: usize,
        range: &CoordRange,
        attribute_ids: &[usize],
    ) -> Result<CellIterator<E>> {
        let handle = self.handle(ad)?;
        CellIterator::new(
            Arc::clone(&self.engine),
            handle.schema(),
            &self.array_path(handle.array_name()),
            range,
            attribute_ids,
            self.buffer_size,
        )
    }

    /// Write one flat record (cells must arrive in the array's cell order)
    pub fn write_cell_sorted(&mut self, ad: usize, record: &[u8]) -> Result<()> {
        self.handle_mut(ad)?.write_cell(record)
    }
}
