use crate::domain::model::ProductInput;
use crate::transport::http::handlers::common::{
    create_entity, delete_entity, list_entities, update_entity,
};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products in sheet order (`data` holds [Product])", body = ApiResponse),
        (status = 500, description = "Backing store unreachable or failing", body = ApiResponse)
    )
)]
pub async fn list_products_handler(State(state): State<AppState>) -> impl IntoResponse {
    list_entities(&state.products).await
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product appended; `data` holds the Product with its row_index", body = ApiResponse),
        (status = 400, description = "Validation failed or malformed body", body = ApiResponse),
        (status = 500, description = "Backing store unreachable or failing", body = ApiResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    request: Result<Json<ProductInput>, JsonRejection>,
) -> impl IntoResponse {
    create_entity(&state.products, request).await
}

#[utoipa::path(
    put,
    path = "/api/products/{row_index}",
    params(
        ("row_index" = u32, Path, description = "Current sheet row of the product")
    ),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product row replaced", body = ApiResponse),
        (status = 400, description = "Validation failed or malformed body", body = ApiResponse),
        (status = 404, description = "No product at that position", body = ApiResponse),
        (status = 500, description = "Backing store unreachable or failing", body = ApiResponse)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    request: Result<Json<ProductInput>, JsonRejection>,
) -> impl IntoResponse {
    update_entity(&state.products, path, request).await
}

#[utoipa::path(
    delete,
    path = "/api/products/{row_index}",
    params(
        ("row_index" = u32, Path, description = "Current sheet row of the product")
    ),
    responses(
        (status = 200, description = "Product removed; later rows moved up by one", body = ApiResponse),
        (status = 404, description = "No product at that position", body = ApiResponse),
        (status = 500, description = "Backing store unreachable or failing", body = ApiResponse)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
) -> impl IntoResponse {
    delete_entity(&state.products, path).await
}
