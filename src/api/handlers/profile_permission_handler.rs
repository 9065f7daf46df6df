//! Profile permission handlers - granting permissions to profiles.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::dto::{ListParams, ProfilePermissionRequest, ProfilePermissionResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::require_permission;
use crate::api::AppState;
use crate::config::permissions::profile_permissions as perms;
use crate::domain::Principal;
use crate::errors::AppResult;

/// Create profile permission routes
pub fn profile_permission_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_profile_permissions).post(create_profile_permission),
        )
        .route("/profile/:profile_id", get(get_by_profile_id))
        .route("/permission/:permission_id", get(get_by_permission_id))
        .route(
            "/:id",
            get(get_profile_permission)
                .put(update_profile_permission)
                .delete(delete_profile_permission),
        )
}

/// Grant a permission to a profile
#[utoipa::path(
    post,
    path = "/api/v1/profile-permissions",
    tag = "Profile permissions",
    security(("bearer_auth" = [])),
    request_body = ProfilePermissionRequest,
    responses(
        (status = 201, description = "Permission granted", body = ProfilePermissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Profile or permission not found"),
        (status = 409, description = "Permission already granted")
    )
)]
pub async fn create_profile_permission(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProfilePermissionRequest>,
) -> AppResult<(StatusCode, Json<ProfilePermissionResponse>)> {
    require_permission(&principal, perms::CREATE)?;
    let link = state
        .execute(|services| async move {
            services
                .profile_permissions()
                .create_profile_permission(payload.profile_id, payload.permission_id)
                .await
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ProfilePermissionResponse::from(&link))))
}

/// List profile permissions
#[utoipa::path(
    get,
    path = "/api/v1/profile-permissions",
    tag = "Profile permissions",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "List of grants", body = Vec<ProfilePermissionResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_profile_permissions(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<ProfilePermissionResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let links = state
        .execute(|services| async move {
            services
                .profile_permissions()
                .list_profile_permissions(params.include_deleted)
                .await
        })
        .await?;
    Ok(Json(links.iter().map(ProfilePermissionResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile-permissions/{id}",
    tag = "Profile permissions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Grant ID")),
    responses(
        (status = 200, description = "Grant found", body = ProfilePermissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Grant not found")
    )
)]
pub async fn get_profile_permission(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProfilePermissionResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let link = state
        .execute(|services| async move {
            services.profile_permissions().get_profile_permission(id).await
        })
        .await?;
    Ok(Json(ProfilePermissionResponse::from(&link)))
}

/// Grants of one profile
#[utoipa::path(
    get,
    path = "/api/v1/profile-permissions/profile/{profile_id}",
    tag = "Profile permissions",
    security(("bearer_auth" = [])),
    params(("profile_id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Grants of the profile", body = Vec<ProfilePermissionResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn get_by_profile_id(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProfilePermissionResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let links = state
        .execute(|services| async move {
            services
                .profile_permissions()
                .get_profile_permissions_by_profile_id(profile_id)
                .await
        })
        .await?;
    Ok(Json(links.iter().map(ProfilePermissionResponse::from).collect()))
}

/// Profiles holding one permission
#[utoipa::path(
    get,
    path = "/api/v1/profile-permissions/permission/{permission_id}",
    tag = "Profile permissions",
    security(("bearer_auth" = [])),
    params(("permission_id" = Uuid, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Grants of the permission", body = Vec<ProfilePermissionResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn get_by_permission_id(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(permission_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProfilePermissionResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let links = state
        .execute(|services| async move {
            services
                .profile_permissions()
                .get_profile_permissions_by_permission_id(permission_id)
                .await
        })
        .await?;
    Ok(Json(links.iter().map(ProfilePermissionResponse::from).collect()))
}

/// Point a grant at another profile or permission
#[utoipa::path(
    put,
    path = "/api/v1/profile-permissions/{id}",
    tag = "Profile permissions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Grant ID")),
    request_body = ProfilePermissionRequest,
    responses(
        (status = 200, description = "Grant updated", body = ProfilePermissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Grant, profile or permission not found"),
        (status = 409, description = "Permission already granted")
    )
)]
pub async fn update_profile_permission(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ProfilePermissionRequest>,
) -> AppResult<Json<ProfilePermissionResponse>> {
    require_permission(&principal, perms::UPDATE)?;
    let link = state
        .execute(|services| async move {
            services
                .profile_permissions()
                .update_profile_permission(id, payload.profile_id, payload.permission_id)
                .await
        })
        .await?;
    Ok(Json(ProfilePermissionResponse::from(&link)))
}

/// Revoke a grant
#[utoipa::path(
    delete,
    path = "/api/v1/profile-permissions/{id}",
    tag = "Profile permissions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Grant ID")),
    responses(
        (status = 204, description = "Grant revoked"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Grant not found")
    )
)]
pub async fn delete_profile_permission(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&principal, perms::DELETE)?;
    state
        .execute(|services| async move {
            services.profile_permissions().delete_profile_permission(id).await
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
