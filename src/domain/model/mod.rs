//! Entity definitions for the sheet-backed tables.

use crate::domain::validate::ValidationErrors;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub mod person;
pub mod product;

pub use person::{Person, PersonInput};
pub use product::{Product, ProductInput};

/// How a column is written into its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

/// One column of a sheet, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Text written into the header row.
    pub header: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn text(header: &'static str) -> Self {
        Self {
            header,
            kind: ColumnKind::Text,
        }
    }

    pub const fn number(header: &'static str) -> Self {
        Self {
            header,
            kind: ColumnKind::Number,
        }
    }
}

/// Contract between a typed entity and the generic row store.
///
/// An implementation provides:
/// - the ordered column schema of its sheet
/// - validation of raw client input into canonical fields
/// - conversion between the entity and its row cells
pub trait SheetEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Fields as submitted by a client.
    type Input: Serialize + DeserializeOwned + Send + Sync;

    /// Singular label used in messages and logs (e.g. `user`).
    const LABEL: &'static str;

    /// Ordered sheet columns.
    fn columns() -> &'static [ColumnSpec];

    /// Validates every field of `input` independently. The returned entity has no
    /// `row_index`; the store assigns it.
    fn from_input(input: &Self::Input) -> Result<Self, ValidationErrors>;

    /// Canonical fields in column order.
    fn to_cells(&self) -> Vec<JsonValue>;

    /// Rebuilds an entity from a stored row.
    fn from_cells(row_index: u32, cells: &[JsonValue]) -> Self;

    fn row_index(&self) -> Option<u32>;

    fn with_row_index(self, row_index: u32) -> Self;
}

/// Cell content as text. Numbers are rendered without a trailing `.0`.
pub fn cell_text(cells: &[JsonValue], idx: usize) -> String {
    match cells.get(idx) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        },
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Cell content as a number; text accepts a decimal comma. Anything else reads as zero.
pub fn cell_number(cells: &[JsonValue], idx: usize) -> f64 {
    match cells.get(idx) {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JsonValue::String(s)) => s.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}
