//! User handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::dto::{ListParams, UserRequest, UserResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::require_permission;
use crate::api::AppState;
use crate::config::permissions::users as perms;
use crate::domain::Principal;
use crate::errors::AppResult;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/name/:name", get(get_user_by_name))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Create a user, reactivating a deleted one with the same name
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "User already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_permission(&principal, perms::CREATE)?;
    let user = state
        .execute(|services| async move { services.users().create_user(payload.into()).await })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_users(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let users = state
        .execute(|services| async move {
            services.users().list_users(params.include_deleted).await
        })
        .await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let user = state
        .execute(|services| async move { services.users().get_user(id).await })
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Get user by name
#[utoipa::path(
    get,
    path = "/api/v1/users/name/{name}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_name(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<UserResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let user = state
        .execute(|services| async move { services.users().get_user_by_name(&name).await })
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Update user
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Name taken by another user"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_permission(&principal, perms::UPDATE)?;
    let user = state
        .execute(|services| async move { services.users().update_user(id, payload.into()).await })
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Delete user under the configured delete policy
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&principal, perms::DELETE)?;
    state
        .execute(|services| async move { services.users().delete_user(id).await })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
