//! Employee handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::dto::{EmployeeRequest, EmployeeResponse, EmployeeUpdateRequest, ListParams};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::require_permission;
use crate::api::AppState;
use crate::config::permissions::employees as perms;
use crate::domain::Principal;
use crate::errors::AppResult;

/// Create employee routes
pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/person/:person_id", get(get_employee_by_person_id))
        .route("/user/:user_id", get(get_employee_by_user_id))
        .route("/role/:role_id", get(list_employees_by_role_id))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

/// Hire an employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    tag = "Employees",
    security(("bearer_auth" = [])),
    request_body = EmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Role or user not found"),
        (status = 409, description = "Employee already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_employee(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmployeeRequest>,
) -> AppResult<(StatusCode, Json<EmployeeResponse>)> {
    require_permission(&principal, perms::CREATE)?;
    let employee = state
        .execute(|services| async move { services.employees().create_employee(payload.into()).await })
        .await?;
    Ok((StatusCode::CREATED, Json(EmployeeResponse::from(&employee))))
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "List of employees", body = Vec<EmployeeResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_employees(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<EmployeeResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let employees = state
        .execute(|services| async move {
            services.employees().list_employees(params.include_deleted).await
        })
        .await?;
    Ok(Json(employees.iter().map(EmployeeResponse::from).collect()))
}

/// Active employees holding a role
#[utoipa::path(
    get,
    path = "/api/v1/employees/role/{role_id}",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(("role_id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Employees with the role", body = Vec<EmployeeResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_employees_by_role_id(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> AppResult<Json<Vec<EmployeeResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let employees = state
        .execute(|services| async move {
            services.employees().list_employees_by_role_id(role_id).await
        })
        .await?;
    Ok(Json(employees.iter().map(EmployeeResponse::from).collect()))
}

/// Get employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EmployeeResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let employee = state
        .execute(|services| async move { services.employees().get_employee(id).await })
        .await?;
    Ok(Json(EmployeeResponse::from(&employee)))
}

/// Get employee by person ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/person/{person_id}",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(("person_id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee_by_person_id(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
) -> AppResult<Json<EmployeeResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let employee = state
        .execute(|services| async move {
            services.employees().get_employee_by_person_id(person_id).await
        })
        .await?;
    Ok(Json(EmployeeResponse::from(&employee)))
}

/// Get employee by user ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/user/{user_id}",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee_by_user_id(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<EmployeeResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let employee = state
        .execute(|services| async move {
            services.employees().get_employee_by_user_id(user_id).await
        })
        .await?;
    Ok(Json(EmployeeResponse::from(&employee)))
}

/// Re-point an employee at another person, role or user
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = EmployeeUpdateRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee, person, role or user not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_employee(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<EmployeeUpdateRequest>,
) -> AppResult<Json<EmployeeResponse>> {
    require_permission(&principal, perms::UPDATE)?;
    let employee = state
        .execute(|services| async move {
            services.employees().update_employee(id, payload.into()).await
        })
        .await?;
    Ok(Json(EmployeeResponse::from(&employee)))
}

/// Delete employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    tag = "Employees",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn delete_employee(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&principal, perms::DELETE)?;
    state
        .execute(|services| async move { services.employees().delete_employee(id).await })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
