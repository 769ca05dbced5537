use crate::app::entity_service::{PersonService, ProductService};
use crate::domain::validate::FieldError;
use crate::infra::sheets::SheetBackend;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<PersonService>,
    pub products: Arc<ProductService>,
    pub backend: Arc<dyn SheetBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn SheetBackend>, user_sheet: &str, product_sheet: &str) -> Self {
        Self {
            users: Arc::new(PersonService::new(backend.clone(), user_sheet)),
            products: Arc::new(ProductService::new(backend.clone(), product_sheet)),
            backend,
        }
    }
}

/// Machine-readable failure class, so a client can tell bad input from a broken system.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    InvalidBody,
    NotFound,
    StoreUnavailable,
    StoreError,
}

#[derive(Serialize, Deserialize, Debug, Default, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    /// Per-field messages of a rejected submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl ApiResponse {
    pub fn failure(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            code: Some(code),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// Whether the backing store answered the probe just now.
    pub sheets_connected: bool,
    pub dev_mode: bool,
    /// `development` or `production`.
    pub mode: String,
    /// RFC 3339 time of the probe.
    pub checked_at: String,
}
