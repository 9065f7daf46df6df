//! Permission handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::dto::{ListParams, PermissionRequest, PermissionResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::require_permission;
use crate::api::AppState;
use crate::config::permissions::permissions as perms;
use crate::domain::Principal;
use crate::errors::AppResult;

/// Create permission routes
pub fn permission_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_permissions).post(create_permission))
        .route("/name/:name", get(get_permission_by_name))
        .route("/:id", get(get_permission).put(update_permission).delete(delete_permission))
}

/// Create a permission, reactivating a deleted one with the same name
#[utoipa::path(
    post,
    path = "/api/v1/permissions",
    tag = "Permissions",
    security(("bearer_auth" = [])),
    request_body = PermissionRequest,
    responses(
        (status = 201, description = "Permission created", body = PermissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Permission already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_permission(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PermissionRequest>,
) -> AppResult<(StatusCode, Json<PermissionResponse>)> {
    require_permission(&principal, perms::CREATE)?;
    let permission = state
        .execute(|services| async move { services.permissions().create_permission(payload.into()).await })
        .await?;
    Ok((StatusCode::CREATED, Json(PermissionResponse::from(&permission))))
}

/// List permissions
#[utoipa::path(
    get,
    path = "/api/v1/permissions",
    tag = "Permissions",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "List of permissions", body = Vec<PermissionResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_permissions(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<PermissionResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let permissions = state
        .execute(|services| async move {
            services.permissions().list_permissions(params.include_deleted).await
        })
        .await?;
    Ok(Json(permissions.iter().map(PermissionResponse::from).collect()))
}

/// Get permission by ID
#[utoipa::path(
    get,
    path = "/api/v1/permissions/{id}",
    tag = "Permissions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Permission found", body = PermissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Permission not found")
    )
)]
pub async fn get_permission(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PermissionResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let permission = state
        .execute(|services| async move { services.permissions().get_permission(id).await })
        .await?;
    Ok(Json(PermissionResponse::from(&permission)))
}

/// Get permission by name
#[utoipa::path(
    get,
    path = "/api/v1/permissions/name/{name}",
    tag = "Permissions",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Permission name")),
    responses(
        (status = 200, description = "Permission found", body = PermissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Permission not found")
    )
)]
pub async fn get_permission_by_name(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<PermissionResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let permission = state
        .execute(|services| async move { services.permissions().get_permission_by_name(&name).await })
        .await?;
    Ok(Json(PermissionResponse::from(&permission)))
}

/// Update permission
#[utoipa::path(
    put,
    path = "/api/v1/permissions/{id}",
    tag = "Permissions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Permission ID")),
    request_body = PermissionRequest,
    responses(
        (status = 200, description = "Permission updated", body = PermissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Permission not found"),
        (status = 409, description = "Name taken by another permission"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_permission(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PermissionRequest>,
) -> AppResult<Json<PermissionResponse>> {
    require_permission(&principal, perms::UPDATE)?;
    let permission = state
        .execute(|services| async move { services.permissions().update_permission(id, payload.into()).await })
        .await?;
    Ok(Json(PermissionResponse::from(&permission)))
}

/// Delete permission under the configured delete policy
#[utoipa::path(
    delete,
    path = "/api/v1/permissions/{id}",
    tag = "Permissions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Permission ID")),
    responses(
        (status = 204, description = "Permission deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Permission not found")
    )
)]
pub async fn delete_permission(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&principal, perms::DELETE)?;
    state
        .execute(|services| async move { services.permissions().delete_permission(id).await })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
