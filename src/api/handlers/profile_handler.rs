//! Profile handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::dto::{ListParams, ProfileRequest, ProfileResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::require_permission;
use crate::api::AppState;
use crate::config::permissions::profiles as perms;
use crate::domain::Principal;
use crate::errors::AppResult;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route("/name/:name", get(get_profile_by_name))
        .route("/:id", get(get_profile).put(update_profile).delete(delete_profile))
}

/// Create a profile, reactivating a deleted one with the same name
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    request_body = ProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Profile already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_profile(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProfileRequest>,
) -> AppResult<(StatusCode, Json<ProfileResponse>)> {
    require_permission(&principal, perms::CREATE)?;
    let profile = state
        .execute(|services| async move { services.profiles().create_profile(payload.into()).await })
        .await?;
    Ok((StatusCode::CREATED, Json(ProfileResponse::from(&profile))))
}

/// List profiles
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "List of profiles", body = Vec<ProfileResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_profiles(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<ProfileResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let profiles = state
        .execute(|services| async move {
            services.profiles().list_profiles(params.include_deleted).await
        })
        .await?;
    Ok(Json(profiles.iter().map(ProfileResponse::from).collect()))
}

/// Get profile by ID
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProfileResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let profile = state
        .execute(|services| async move { services.profiles().get_profile(id).await })
        .await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// Get profile by name
#[utoipa::path(
    get,
    path = "/api/v1/profiles/name/{name}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Profile name")),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile_by_name(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let profile = state
        .execute(|services| async move { services.profiles().get_profile_by_name(&name).await })
        .await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// Update profile
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Profile not found"),
        (status = 409, description = "Name taken by another profile"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_profile(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    require_permission(&principal, perms::UPDATE)?;
    let profile = state
        .execute(|services| async move { services.profiles().update_profile(id, payload.into()).await })
        .await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// Delete profile under the configured delete policy
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{id}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn delete_profile(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&principal, perms::DELETE)?;
    state
        .execute(|services| async move { services.profiles().delete_profile(id).await })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
