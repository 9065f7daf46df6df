//! Role handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::dto::{ListParams, RoleRequest, RoleResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::require_permission;
use crate::api::AppState;
use crate::config::permissions::roles as perms;
use crate::domain::Principal;
use crate::errors::AppResult;

/// Create role routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/name/:name", get(get_role_by_name))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
}

/// Create a role, reactivating a deleted one with the same name
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    tag = "Roles",
    security(("bearer_auth" = [])),
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Role already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_role(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RoleRequest>,
) -> AppResult<(StatusCode, Json<RoleResponse>)> {
    require_permission(&principal, perms::CREATE)?;
    let role = state
        .execute(|services| async move { services.roles().create_role(payload.into()).await })
        .await?;
    Ok((StatusCode::CREATED, Json(RoleResponse::from(&role))))
}

/// List roles
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "List of roles", body = Vec<RoleResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_roles(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<RoleResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let roles = state
        .execute(|services| async move {
            services.roles().list_roles(params.include_deleted).await
        })
        .await?;
    Ok(Json(roles.iter().map(RoleResponse::from).collect()))
}

/// Get role by ID
#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role found", body = RoleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_role(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RoleResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let role = state
        .execute(|services| async move { services.roles().get_role(id).await })
        .await?;
    Ok(Json(RoleResponse::from(&role)))
}

/// Get role by name
#[utoipa::path(
    get,
    path = "/api/v1/roles/name/{name}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Role name")),
    responses(
        (status = 200, description = "Role found", body = RoleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_role_by_name(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<RoleResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let role = state
        .execute(|services| async move { services.roles().get_role_by_name(&name).await })
        .await?;
    Ok(Json(RoleResponse::from(&role)))
}

/// Update role
#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Role ID")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Name taken by another role"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_role(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RoleRequest>,
) -> AppResult<Json<RoleResponse>> {
    require_permission(&principal, perms::UPDATE)?;
    let role = state
        .execute(|services| async move { services.roles().update_role(id, payload.into()).await })
        .await?;
    Ok(Json(RoleResponse::from(&role)))
}

/// Delete role under the configured delete policy
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn delete_role(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&principal, perms::DELETE)?;
    state
        .execute(|services| async move { services.roles().delete_role(id).await })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
