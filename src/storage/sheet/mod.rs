pub mod adapter;

pub use adapter::{EntityTable, RowStoreAdapter, StoredRow, HEADER_ROWS};
