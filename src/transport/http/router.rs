use crate::domain::model::{Person, PersonInput, Product, ProductInput};
use crate::domain::validate::FieldError;
use crate::transport::http::handlers::{health, products, users};
use crate::transport::http::types::{ApiResponse, AppState, ErrorCode, HealthResponse};
use axum::routing::{get, put};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        users::list_users_handler,
        users::create_user_handler,
        users::update_user_handler,
        users::delete_user_handler,
        products::list_products_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::delete_product_handler
    ),
    components(schemas(
        ApiResponse,
        ErrorCode,
        FieldError,
        HealthResponse,
        Person,
        PersonInput,
        Product,
        ProductInput
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::healthcheck_handler))
        .route(
            "/api/users",
            get(users::list_users_handler).post(users::create_user_handler),
        )
        .route(
            "/api/users/:row_index",
            put(users::update_user_handler).delete(users::delete_user_handler),
        )
        .route(
            "/api/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/api/products/:row_index",
            put(products::update_product_handler).delete(products::delete_product_handler),
        )
        .with_state(app_state)
}
