pub mod app;
pub mod client;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::entity_service::{EntityService, PersonService, ProductService};
pub use domain::model::{Person, PersonInput, Product, ProductInput, SheetEntity};
pub use error::{ServiceError, StoreError};
pub use infra::config::AppConfig;
pub use infra::sheets::{GoogleSheetsBackend, MemorySheetBackend, SheetBackend};
pub use storage::sheet::RowStoreAdapter;
