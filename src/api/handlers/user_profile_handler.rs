//! User profile handlers - assigning profiles to users.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::dto::{ListParams, UserProfileRequest, UserProfileResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::require_permission;
use crate::api::AppState;
use crate::config::permissions::user_profiles as perms;
use crate::domain::Principal;
use crate::errors::AppResult;

/// Create user profile routes
pub fn user_profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_user_profiles).post(create_user_profile))
        .route("/user/:user_id", get(get_by_user_id))
        .route(
            "/user/:user_id/profile/:profile_id",
            get(get_by_user_id_and_profile_id),
        )
        .route(
            "/:id",
            get(get_user_profile)
                .put(update_user_profile)
                .delete(delete_user_profile),
        )
}

/// Assign a profile to a user
#[utoipa::path(
    post,
    path = "/api/v1/user-profiles",
    tag = "User profiles",
    security(("bearer_auth" = [])),
    request_body = UserProfileRequest,
    responses(
        (status = 201, description = "Profile assigned", body = UserProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User or profile not found"),
        (status = 409, description = "Profile already assigned")
    )
)]
pub async fn create_user_profile(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserProfileRequest>,
) -> AppResult<(StatusCode, Json<UserProfileResponse>)> {
    require_permission(&principal, perms::CREATE)?;
    let link = state
        .execute(|services| async move {
            services
                .user_profiles()
                .create_user_profile(payload.user_id, payload.profile_id)
                .await
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserProfileResponse::from(&link))))
}

#[utoipa::path(
    get,
    path = "/api/v1/user-profiles",
    tag = "User profiles",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "List of assignments", body = Vec<UserProfileResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_user_profiles(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<UserProfileResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let links = state
        .execute(|services| async move {
            services
                .user_profiles()
                .list_user_profiles(params.include_deleted)
                .await
        })
        .await?;
    Ok(Json(links.iter().map(UserProfileResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/user-profiles/{id}",
    tag = "User profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment found", body = UserProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn get_user_profile(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserProfileResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let link = state
        .execute(|services| async move { services.user_profiles().get_user_profile(id).await })
        .await?;
    Ok(Json(UserProfileResponse::from(&link)))
}

/// Profiles assigned to a user
#[utoipa::path(
    get,
    path = "/api/v1/user-profiles/user/{user_id}",
    tag = "User profiles",
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Assignments of the user", body = Vec<UserProfileResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn get_by_user_id(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<UserProfileResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let links = state
        .execute(|services| async move {
            services
                .user_profiles()
                .get_user_profiles_by_user_id(user_id)
                .await
        })
        .await?;
    Ok(Json(links.iter().map(UserProfileResponse::from).collect()))
}

/// Assignment of one profile to one user
#[utoipa::path(
    get,
    path = "/api/v1/user-profiles/user/{user_id}/profile/{profile_id}",
    tag = "User profiles",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("profile_id" = Uuid, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Assignment found", body = UserProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn get_by_user_id_and_profile_id(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path((user_id, profile_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<UserProfileResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let link = state
        .execute(|services| async move {
            services
                .user_profiles()
                .get_user_profile_by_user_id_and_profile_id(user_id, profile_id)
                .await
        })
        .await?;
    Ok(Json(UserProfileResponse::from(&link)))
}

#[utoipa::path(
    put,
    path = "/api/v1/user-profiles/{id}",
    tag = "User profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = UserProfileRequest,
    responses(
        (status = 200, description = "Assignment updated", body = UserProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Assignment, user or profile not found"),
        (status = 409, description = "Profile already assigned")
    )
)]
pub async fn update_user_profile(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UserProfileRequest>,
) -> AppResult<Json<UserProfileResponse>> {
    require_permission(&principal, perms::UPDATE)?;
    let link = state
        .execute(|services| async move {
            services
                .user_profiles()
                .update_user_profile(id, payload.user_id, payload.profile_id)
                .await
        })
        .await?;
    Ok(Json(UserProfileResponse::from(&link)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/user-profiles/{id}",
    tag = "User profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 204, description = "Assignment removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn delete_user_profile(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&principal, perms::DELETE)?;
    state
        .execute(|services| async move { services.user_profiles().delete_user_profile(id).await })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
