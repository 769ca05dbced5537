//! In-process sheet store for development mode and tests.

use super::{BackendMode, Row, SheetBackend};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

pub struct MemorySheetBackend {
    sheets: RwLock<HashMap<String, Vec<Row>>>,
    reachable: AtomicBool,
}

impl MemorySheetBackend {
    pub fn new() -> Self {
        Self {
            sheets: RwLock::new(HashMap::new()),
            reachable: AtomicBool::new(true),
        }
    }

    /// Simulates an outage: while unreachable every call fails with `Unavailable`.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Replaces the whole content of `sheet`.
    pub async fn seed(&self, sheet: &str, rows: Vec<Row>) {
        self.sheets.write().await.insert(sheet.to_string(), rows);
    }

    fn check_reachable(&self) -> StoreResult<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "in-memory store switched off".to_string(),
            ))
        }
    }
}

impl Default for MemorySheetBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn slot(rows_len: usize, row: u32) -> StoreResult<usize> {
    let idx = (row as usize).wrapping_sub(1);
    if row == 0 || idx >= rows_len {
        return Err(StoreError::NotFound { row_index: row });
    }
    Ok(idx)
}

#[async_trait]
impl SheetBackend for MemorySheetBackend {
    async fn read_rows(&self, sheet: &str) -> StoreResult<Vec<Row>> {
        self.check_reachable()?;
        let sheets = self.sheets.read().await;
        Ok(sheets.get(sheet).cloned().unwrap_or_default())
    }

    async fn append_row(&self, sheet: &str, next_row: u32, cells: Row) -> StoreResult<u32> {
        self.check_reachable()?;
        let mut sheets = self.sheets.write().await;
        let rows = sheets.entry(sheet.to_string()).or_default();
        let target = next_row as usize;
        if target == 0 || target <= rows.len() {
            return Err(StoreError::Protocol(format!(
                "row {} of '{}' is not past the last row",
                next_row, sheet
            )));
        }
        rows.resize(target - 1, Row::new());
        rows.push(cells);
        Ok(next_row)
    }

    async fn update_row(&self, sheet: &str, row: u32, cells: Row) -> StoreResult<()> {
        self.check_reachable()?;
        let mut sheets = self.sheets.write().await;
        let rows = sheets.entry(sheet.to_string()).or_default();
        let idx = slot(rows.len(), row)?;
        rows[idx] = cells;
        Ok(())
    }

    async fn delete_row(&self, sheet: &str, row: u32) -> StoreResult<()> {
        self.check_reachable()?;
        let mut sheets = self.sheets.write().await;
        let rows = sheets.entry(sheet.to_string()).or_default();
        let idx = slot(rows.len(), row)?;
        rows.remove(idx);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_reachable()
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn delete_shifts_following_rows() {
        let backend = MemorySheetBackend::new();
        for (i, v) in ["a", "b", "c"].into_iter().enumerate() {
            backend.append_row("S", i as u32 + 1, vec![json!(v)]).await.unwrap();
        }
        backend.delete_row("S", 1).await.unwrap();
        let rows = backend.read_rows("S").await.unwrap();
        assert_eq!(rows, vec![vec![json!("b")], vec![json!("c")]]);
        assert_eq!(
            backend.delete_row("S", 3).await,
            Err(StoreError::NotFound { row_index: 3 })
        );
    }

    #[tokio::test]
    async fn unreachable_store_fails_every_call() {
        let backend = MemorySheetBackend::new();
        backend.set_reachable(false);
        assert!(matches!(backend.ping().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            backend.read_rows("S").await,
            Err(StoreError::Unavailable(_))
        ));
        backend.set_reachable(true);
        assert_eq!(backend.read_rows("S").await.unwrap(), Vec::<Row>::new());
    }

    #[tokio::test]
    async fn append_never_lands_inside_the_sheet() {
        let backend = MemorySheetBackend::new();
        backend
            .seed("S", vec![vec![json!("hdr")], vec![json!("a")]])
            .await;
        assert!(matches!(
            backend.append_row("S", 2, vec![json!("b")]).await,
            Err(StoreError::Protocol(_))
        ));
        assert_eq!(backend.append_row("S", 4, vec![json!("b")]).await.unwrap(), 4);
        let rows = backend.read_rows("S").await.unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows[2].is_empty());
        assert_eq!(rows[3], vec![json!("b")]);
    }
}
