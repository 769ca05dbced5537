//! Row Store Adapter: the only place where entities meet sheet row numbers.
//!
//! Row 1 of every sheet is the header, so a data row's `row_index` is simply its
//! sheet row number. Positions are not stable keys: deleting a row shifts every
//! later row up by one, and new rows are only ever appended at the end.

use crate::domain::model::{ColumnSpec, SheetEntity};
use crate::error::{StoreError, StoreResult};
use crate::infra::sheets::{Row, SheetBackend};
use serde_json::Value as JsonValue;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const HEADER_ROWS: u32 = 1;

fn next_row_after(rows: usize) -> StoreResult<u32> {
    u32::try_from(rows + 1).map_err(|_| StoreError::Protocol("sheet is full".to_string()))
}

/// A data row and its current position.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub row_index: u32,
    pub cells: Row,
}

/// Generic adapter for one sheet, parameterized by its column schema.
pub struct RowStoreAdapter {
    backend: Arc<dyn SheetBackend>,
    sheet: String,
    columns: &'static [ColumnSpec],
    /// Serializes mutations of this table (bounds read + write) within the process.
    write_lock: Mutex<()>,
}

impl RowStoreAdapter {
    pub fn new(backend: Arc<dyn SheetBackend>, sheet: impl Into<String>, columns: &'static [ColumnSpec]) -> Self {
        Self {
            backend,
            sheet: sheet.into(),
            columns,
            write_lock: Mutex::new(()),
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    fn header(&self) -> Row {
        self.columns
            .iter()
            .map(|c| JsonValue::from(c.header))
            .collect()
    }

    /// Data rows top to bottom. Rows with fewer cells than the schema are skipped
    /// but keep their position.
    pub async fn list_all(&self) -> StoreResult<Vec<StoredRow>> {
        let rows = self.backend.read_rows(&self.sheet).await?;
        let width = self.columns.len();
        Ok(rows
            .into_iter()
            .enumerate()
            .skip(HEADER_ROWS as usize)
            .filter(|(_, cells)| cells.len() >= width)
            .map(|(i, cells)| StoredRow {
                row_index: i as u32 + 1,
                cells,
            })
            .collect())
    }

    /// Appends `cells` after the last row and returns the new position.
    ///
    /// The target row is chosen here, under the write lock, as the row just past
    /// the last one the store returned, so existing rows never move. An empty
    /// sheet gets its header row first.
    pub async fn append(&self, cells: Row) -> StoreResult<u32> {
        self.check_width(&cells)?;
        let _guard = self.write_lock.lock().await;
        let existing = self.backend.read_rows(&self.sheet).await?;
        let mut next_row = next_row_after(existing.len())?;
        if existing.is_empty() {
            self.write_new_row(next_row, self.header()).await?;
            next_row += 1;
        }
        let row_index = self.write_new_row(next_row, cells).await?;
        tracing::info!(sheet = %self.sheet, row_index, "Row appended");
        Ok(row_index)
    }

    async fn write_new_row(&self, next_row: u32, cells: Row) -> StoreResult<u32> {
        let written = self.backend.append_row(&self.sheet, next_row, cells).await?;
        if written != next_row {
            tracing::error!(sheet = %self.sheet, expected = next_row, written, "Append landed off the end of the sheet");
            return Err(StoreError::Protocol(format!(
                "append to '{}' landed on row {}, expected row {}",
                self.sheet, written, next_row
            )));
        }
        Ok(written)
    }

    /// Overwrites the whole row at `row_index`.
    pub async fn replace_at(&self, row_index: u32, cells: Row) -> StoreResult<()> {
        self.check_width(&cells)?;
        let _guard = self.write_lock.lock().await;
        self.ensure_exists(row_index).await?;
        self.backend.update_row(&self.sheet, row_index, cells).await?;
        tracing::info!(sheet = %self.sheet, row_index, "Row replaced");
        Ok(())
    }

    /// Removes the row at `row_index`; every later row moves up by one.
    pub async fn delete_at(&self, row_index: u32) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.ensure_exists(row_index).await?;
        self.backend.delete_row(&self.sheet, row_index).await?;
        tracing::info!(sheet = %self.sheet, row_index, "Row deleted, later positions shifted");
        Ok(())
    }

    /// Writes the header row into an empty sheet. Returns whether it wrote one.
    pub async fn ensure_header(&self) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let existing = self.backend.read_rows(&self.sheet).await?;
        if !existing.is_empty() {
            return Ok(false);
        }
        self.write_new_row(HEADER_ROWS, self.header()).await?;
        Ok(true)
    }

    async fn ensure_exists(&self, row_index: u32) -> StoreResult<()> {
        let rows = self.backend.read_rows(&self.sheet).await?;
        if row_index <= HEADER_ROWS || row_index as usize > rows.len() {
            tracing::debug!(sheet = %self.sheet, row_index, rows = rows.len(), "Position out of range");
            return Err(StoreError::NotFound { row_index });
        }
        Ok(())
    }

    fn check_width(&self, cells: &Row) -> StoreResult<()> {
        if cells.len() != self.columns.len() {
            return Err(StoreError::Protocol(format!(
                "row for '{}' needs {} cells, got {}",
                self.sheet,
                self.columns.len(),
                cells.len()
            )));
        }
        Ok(())
    }
}

/// Typed view over a [`RowStoreAdapter`] for one entity type.
pub struct EntityTable<E: SheetEntity> {
    adapter: RowStoreAdapter,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SheetEntity> EntityTable<E> {
    pub fn new(backend: Arc<dyn SheetBackend>, sheet: impl Into<String>) -> Self {
        Self {
            adapter: RowStoreAdapter::new(backend, sheet, E::columns()),
            _entity: PhantomData,
        }
    }

    pub async fn list_all(&self) -> StoreResult<Vec<E>> {
        Ok(self
            .adapter
            .list_all()
            .await?
            .into_iter()
            .map(|row| E::from_cells(row.row_index, &row.cells))
            .collect())
    }

    pub async fn append(&self, entity: &E) -> StoreResult<u32> {
        self.adapter.append(entity.to_cells()).await
    }

    pub async fn replace_at(&self, row_index: u32, entity: &E) -> StoreResult<()> {
        self.adapter.replace_at(row_index, entity.to_cells()).await
    }

    pub async fn delete_at(&self, row_index: u32) -> StoreResult<()> {
        self.adapter.delete_at(row_index).await
    }
}
