//! Shared CRUD plumbing: delegate to an entity service and map the outcome to HTTP.

use crate::app::entity_service::EntityService;
use crate::domain::model::SheetEntity;
use crate::error::{ServiceError, StoreError};
use crate::transport::http::types::{ApiResponse, ErrorCode};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

pub fn service_error_response(label: &str, err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(v) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse {
                fields: Some(v.fields().to_vec()),
                ..ApiResponse::failure(ErrorCode::ValidationFailed, v.to_string())
            }),
        )
            .into_response(),
        ServiceError::Store(StoreError::NotFound { row_index }) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(
                ErrorCode::NotFound,
                format!("{} at row {} not found", capitalized(label), row_index),
            )),
        )
            .into_response(),
        ServiceError::Store(e @ StoreError::Unavailable(_)) => {
            tracing::error!(entity = label, error = %e, "Backing store unreachable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(ErrorCode::StoreUnavailable, e.to_string())),
            )
                .into_response()
        }
        ServiceError::Store(e @ StoreError::Protocol(_)) => {
            tracing::error!(entity = label, error = %e, "Backing store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(ErrorCode::StoreError, e.to_string())),
            )
                .into_response()
        }
    }
}

pub fn invalid_body(err: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::failure(
            ErrorCode::InvalidBody,
            format!("Invalid JSON body: {}", err),
        )),
    )
        .into_response()
}

/// Resolves the `{row_index}` segment. A segment that is not a position cannot
/// address a row, so it is reported as not found.
pub fn row_position(path: Result<Path<u32>, PathRejection>) -> Result<u32, Response> {
    path.map(|Path(row)| row).map_err(|e| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(
                ErrorCode::NotFound,
                format!("Invalid row position: {}", e),
            )),
        )
            .into_response()
    })
}

pub async fn list_entities<E: SheetEntity>(service: &EntityService<E>) -> Response {
    match service.list().await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                count: Some(items.len()),
                data: Some(to_json(&items)),
                ..Default::default()
            }),
        )
            .into_response(),
        Err(e) => service_error_response(E::LABEL, e),
    }
}

pub async fn create_entity<E: SheetEntity>(
    service: &EntityService<E>,
    request: Result<Json<E::Input>, JsonRejection>,
) -> Response {
    let Json(input) = match request {
        Ok(v) => v,
        Err(e) => return invalid_body(e),
    };
    match service.create(&input).await {
        Ok(entity) => (
            StatusCode::CREATED,
            Json(ApiResponse {
                success: true,
                message: Some(format!("{} created successfully", capitalized(E::LABEL))),
                data: Some(to_json(&entity)),
                ..Default::default()
            }),
        )
            .into_response(),
        Err(e) => service_error_response(E::LABEL, e),
    }
}

pub async fn update_entity<E: SheetEntity>(
    service: &EntityService<E>,
    path: Result<Path<u32>, PathRejection>,
    request: Result<Json<E::Input>, JsonRejection>,
) -> Response {
    let row_index = match row_position(path) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let Json(input) = match request {
        Ok(v) => v,
        Err(e) => return invalid_body(e),
    };
    match service.update(row_index, &input).await {
        Ok(entity) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                message: Some(format!("{} updated successfully", capitalized(E::LABEL))),
                data: Some(to_json(&entity)),
                ..Default::default()
            }),
        )
            .into_response(),
        Err(e) => service_error_response(E::LABEL, e),
    }
}

pub async fn delete_entity<E: SheetEntity>(
    service: &EntityService<E>,
    path: Result<Path<u32>, PathRejection>,
) -> Response {
    let row_index = match row_position(path) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    match service.delete(row_index).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                message: Some(format!("{} removed successfully", capitalized(E::LABEL))),
                ..Default::default()
            }),
        )
            .into_response(),
        Err(e) => service_error_response(E::LABEL, e),
    }
}
