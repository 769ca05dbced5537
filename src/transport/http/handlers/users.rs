use crate::domain::model::PersonInput;
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
    path = "/api/users",
    responses(
        (status = 200, description = "All users in sheet order (`data` holds [Person])", body = ApiResponse),
        (status = 500, description = "Backing store unreachable or failing", body = ApiResponse)
    )
)]
pub async fn list_users_handler(State(state): State<AppState>) -> impl IntoResponse {
    list_entities(&state.users).await
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = PersonInput,
    responses(
        (status = 201, description = "User appended; `data` holds the Person with its row_index", body = ApiResponse),
        (status = 400, description = "Validation failed or malformed body", body = ApiResponse),
        (status = 500, description = "Backing store unreachable or failing", body = ApiResponse)
    )
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    request: Result<Json<PersonInput>, JsonRejection>,
) -> impl IntoResponse {
    create_entity(&state.users, request).await
}

#[utoipa::path(
    put,
    path = "/api/users/{row_index}",
    params(
        ("row_index" = u32, Path, description = "Current sheet row of the user")
    ),
    request_body = PersonInput,
    responses(
        (status = 200, description = "User row replaced", body = ApiResponse),
        (status = 400, description = "Validation failed or malformed body", body = ApiResponse),
        (status = 404, description = "No user at that position", body = ApiResponse),
        (status = 500, description = "Backing store unreachable or failing", body = ApiResponse)
    )
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    request: Result<Json<PersonInput>, JsonRejection>,
) -> impl IntoResponse {
    update_entity(&state.users, path, request).await
}

#[utoipa::path(
    delete,
    path = "/api/users/{row_index}",
    params(
        ("row_index" = u32, Path, description = "Current sheet row of the user")
    ),
    responses(
        (status = 200, description = "User removed; later rows moved up by one", body = ApiResponse),
        (status = 404, description = "No user at that position", body = ApiResponse),
        (status = 500, description = "Backing store unreachable or failing", body = ApiResponse)
    )
)]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
) -> impl IntoResponse {
    delete_entity(&state.users, path).await
}
