//! Backing store: the spreadsheet service, addressed only by sheet row number.

use crate::error::StoreResult;
use crate::infra::config::AppConfig;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub mod google;
pub mod memory;

pub use google::GoogleSheetsBackend;
pub use memory::MemorySheetBackend;

/// One row of cells, leftmost column first.
pub type Row = Vec<JsonValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// In-process sheets, nothing persisted.
    Development,
    /// Google Sheets.
    Production,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Development => "development",
            BackendMode::Production => "production",
        }
    }
}

/// Minimal tabular interface of the spreadsheet service.
///
/// Row numbers are 1-based sheet rows. Deleting a row moves every later row up by one.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// Every row of `sheet` top to bottom; element `i` is sheet row `i + 1`.
    async fn read_rows(&self, sheet: &str) -> StoreResult<Vec<Row>>;

    /// Writes `cells` as a new row at `next_row`, the row just past the last one,
    /// without shifting any existing row. Returns the row number the store reports
    /// as written; callers must check it against `next_row`.
    async fn append_row(&self, sheet: &str, next_row: u32, cells: Row) -> StoreResult<u32>;

    /// Overwrites row `row` with `cells`.
    async fn update_row(&self, sheet: &str, row: u32, cells: Row) -> StoreResult<()>;

    /// Removes row `row`.
    async fn delete_row(&self, sheet: &str, row: u32) -> StoreResult<()>;

    /// Succeeds when the store is reachable and the credentials are accepted.
    async fn ping(&self) -> StoreResult<()>;

    fn mode(&self) -> BackendMode;
}

/// Picks the backend described by `config`: Google Sheets when a spreadsheet is
/// configured, the in-memory store otherwise.
pub fn connect(config: &AppConfig) -> StoreResult<Arc<dyn SheetBackend>> {
    match &config.sheets {
        Some(sheets) => {
            tracing::info!(
                spreadsheet_id = %sheets.spreadsheet_id,
                has_token = sheets.access_token.is_some(),
                "Using Google Sheets backend"
            );
            Ok(Arc::new(GoogleSheetsBackend::new(sheets.clone())?))
        }
        None => {
            tracing::info!("No spreadsheet configured, using in-memory development backend");
            Ok(Arc::new(MemorySheetBackend::new()))
        }
    }
}
