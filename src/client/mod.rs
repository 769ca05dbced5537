//! Client Data Layer: typed calls to the gateway, one error shape, reload-after-write.

pub mod api;
pub mod collection;
pub mod error;

pub use api::{ApiClient, Resource, REQUEST_TIMEOUT};
pub use collection::Collection;
pub use error::ClientError;
