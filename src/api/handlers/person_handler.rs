//! Person handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::dto::{ListParams, PersonRequest, PersonResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::require_permission;
use crate::api::AppState;
use crate::config::permissions::persons as perms;
use crate::domain::Principal;
use crate::errors::AppResult;

/// Create person routes
pub fn person_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_persons).post(create_person))
        .route("/cpf/:cpf", get(get_person_by_cpf))
        .route("/:id", get(get_person).put(update_person).delete(delete_person))
}

/// Create a person, reactivating a deleted one with the same CPF
#[utoipa::path(
    post,
    path = "/api/v1/persons",
    tag = "Persons",
    security(("bearer_auth" = [])),
    request_body = PersonRequest,
    responses(
        (status = 201, description = "Person created", body = PersonResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "CPF or email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_person(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PersonRequest>,
) -> AppResult<(StatusCode, Json<PersonResponse>)> {
    require_permission(&principal, perms::CREATE)?;
    let person = state
        .execute(|services| async move { services.persons().create_person(payload.into()).await })
        .await?;
    Ok((StatusCode::CREATED, Json(PersonResponse::from(&person))))
}

/// List persons
#[utoipa::path(
    get,
    path = "/api/v1/persons",
    tag = "Persons",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "List of persons", body = Vec<PersonResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_persons(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<PersonResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let persons = state
        .execute(|services| async move {
            services.persons().list_persons(params.include_deleted).await
        })
        .await?;
    Ok(Json(persons.iter().map(PersonResponse::from).collect()))
}

/// Get person by ID
#[utoipa::path(
    get,
    path = "/api/v1/persons/{id}",
    tag = "Persons",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Person found", body = PersonResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Person not found")
    )
)]
pub async fn get_person(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PersonResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let person = state
        .execute(|services| async move { services.persons().get_person(id).await })
        .await?;
    Ok(Json(PersonResponse::from(&person)))
}

/// Get person by CPF (digits only)
#[utoipa::path(
    get,
    path = "/api/v1/persons/cpf/{cpf}",
    tag = "Persons",
    security(("bearer_auth" = [])),
    params(("cpf" = String, Path, description = "Eleven digit CPF")),
    responses(
        (status = 200, description = "Person found", body = PersonResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Person not found")
    )
)]
pub async fn get_person_by_cpf(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> AppResult<Json<PersonResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let person = state
        .execute(|services| async move { services.persons().get_person_by_cpf(&cpf).await })
        .await?;
    Ok(Json(PersonResponse::from(&person)))
}

/// Update person
#[utoipa::path(
    put,
    path = "/api/v1/persons/{id}",
    tag = "Persons",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Person ID")),
    request_body = PersonRequest,
    responses(
        (status = 200, description = "Person updated", body = PersonResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Person not found"),
        (status = 409, description = "CPF or email taken by another person"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_person(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PersonRequest>,
) -> AppResult<Json<PersonResponse>> {
    require_permission(&principal, perms::UPDATE)?;
    let person = state
        .execute(|services| async move { services.persons().update_person(id, payload.into()).await })
        .await?;
    Ok(Json(PersonResponse::from(&person)))
}

/// Delete person
#[utoipa::path(
    delete,
    path = "/api/v1/persons/{id}",
    tag = "Persons",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Person not found")
    )
)]
pub async fn delete_person(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&principal, perms::DELETE)?;
    state
        .execute(|services| async move { services.persons().delete_person(id).await })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
