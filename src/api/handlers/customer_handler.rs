//! Customer handlers.
//!
//! Sign-up is public; every other route needs a bearer token. Customers
//! calling these routes only ever see their own record.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::dto::{CustomerRequest, CustomerResponse, ListParams};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::require_permission;
use crate::api::AppState;
use crate::config::permissions::customers as perms;
use crate::domain::Principal;
use crate::errors::AppResult;

/// Create customer routes (bearer token required)
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers))
        .route("/person/:person_id", get(get_customer_by_person_id))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Sign up a customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "Customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 409, description = "Customer already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CustomerRequest>,
) -> AppResult<(StatusCode, Json<CustomerResponse>)> {
    let customer = state.sign_up_customer(payload.person.into()).await?;
    Ok((StatusCode::CREATED, Json(CustomerResponse::from(&customer))))
}

/// List customers
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "List of customers", body = Vec<CustomerResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_customers(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<CustomerResponse>>> {
    require_permission(&principal, perms::VIEW)?;
    let customers = state
        .execute(|services| async move {
            services
                .customers()
                .list_customers(&principal, params.include_deleted)
                .await
        })
        .await?;
    Ok(Json(customers.iter().map(CustomerResponse::from).collect()))
}

/// Get customer by ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CustomerResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let customer = state
        .execute(|services| async move { services.customers().get_customer(&principal, id).await })
        .await?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// Get customer by person ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/person/{person_id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("person_id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer_by_person_id(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
) -> AppResult<Json<CustomerResponse>> {
    require_permission(&principal, perms::VIEW)?;
    let customer = state
        .execute(|services| async move {
            services
                .customers()
                .get_customer_by_person_id(&principal, person_id)
                .await
        })
        .await?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// Update customer details (the CPF cannot change)
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Customer or person not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_customer(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CustomerRequest>,
) -> AppResult<Json<CustomerResponse>> {
    require_permission(&principal, perms::UPDATE)?;
    let customer = state
        .execute(|services| async move {
            services
                .customers()
                .update_customer(&principal, id, payload.person.into())
                .await
        })
        .await?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// Delete customer
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn delete_customer(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&principal, perms::DELETE)?;
    state
        .execute(|services| async move { services.customers().delete_customer(&principal, id).await })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
