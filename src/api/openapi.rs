//! OpenAPI documentation configuration.
//!
//! Served by Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    CustomerRequest, CustomerResponse, EmployeeRequest, EmployeeResponse, EmployeeUpdateRequest,
    NamedRef, PermissionRequest, PermissionResponse, PersonRequest, PersonResponse,
    ProfilePermissionRequest, ProfilePermissionResponse, ProfileRequest, ProfileResponse,
    RoleRequest, RoleResponse, UserProfileRequest, UserProfileResponse, UserRequest, UserResponse,
};
use crate::api::handlers::{
    auth_handler, customer_handler, employee_handler, permission_handler, person_handler,
    profile_handler, profile_permission_handler, role_handler, user_handler,
    user_profile_handler,
};
use crate::errors::ErrorResponse;
use crate::services::TokenResponse;

/// OpenAPI documentation for the identity service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Identity Service",
        version = "0.1.0",
        description = "People, customers, employees and the profile/permission model behind bearer tokens",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::token,
        permission_handler::create_permission,
        permission_handler::list_permissions,
        permission_handler::get_permission,
        permission_handler::get_permission_by_name,
        permission_handler::update_permission,
        permission_handler::delete_permission,
        profile_handler::create_profile,
        profile_handler::list_profiles,
        profile_handler::get_profile,
        profile_handler::get_profile_by_name,
        profile_handler::update_profile,
        profile_handler::delete_profile,
        profile_permission_handler::create_profile_permission,
        profile_permission_handler::list_profile_permissions,
        profile_permission_handler::get_profile_permission,
        profile_permission_handler::get_by_profile_id,
        profile_permission_handler::get_by_permission_id,
        profile_permission_handler::update_profile_permission,
        profile_permission_handler::delete_profile_permission,
        role_handler::create_role,
        role_handler::list_roles,
        role_handler::get_role,
        role_handler::get_role_by_name,
        role_handler::update_role,
        role_handler::delete_role,
        user_handler::create_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::get_user_by_name,
        user_handler::update_user,
        user_handler::delete_user,
        user_profile_handler::create_user_profile,
        user_profile_handler::list_user_profiles,
        user_profile_handler::get_user_profile,
        user_profile_handler::get_by_user_id,
        user_profile_handler::get_by_user_id_and_profile_id,
        user_profile_handler::update_user_profile,
        user_profile_handler::delete_user_profile,
        person_handler::create_person,
        person_handler::list_persons,
        person_handler::get_person,
        person_handler::get_person_by_cpf,
        person_handler::update_person,
        person_handler::delete_person,
        customer_handler::create_customer,
        customer_handler::list_customers,
        customer_handler::get_customer,
        customer_handler::get_customer_by_person_id,
        customer_handler::update_customer,
        customer_handler::delete_customer,
        employee_handler::create_employee,
        employee_handler::list_employees,
        employee_handler::list_employees_by_role_id,
        employee_handler::get_employee,
        employee_handler::get_employee_by_person_id,
        employee_handler::get_employee_by_user_id,
        employee_handler::update_employee,
        employee_handler::delete_employee,
    ),
    components(
        schemas(
            auth_handler::TokenForm,
            TokenResponse,
            ErrorResponse,
            NamedRef,
            PermissionRequest,
            PermissionResponse,
            ProfileRequest,
            ProfileResponse,
            ProfilePermissionRequest,
            ProfilePermissionResponse,
            RoleRequest,
            RoleResponse,
            UserRequest,
            UserResponse,
            UserProfileRequest,
            UserProfileResponse,
            PersonRequest,
            PersonResponse,
            CustomerRequest,
            CustomerResponse,
            EmployeeRequest,
            EmployeeUpdateRequest,
            EmployeeResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token issuing for customers and employees"),
        (name = "Permissions", description = "Permission catalogue"),
        (name = "Profiles", description = "Profiles granted to tokens"),
        (name = "Profile permissions", description = "Permissions granted to profiles"),
        (name = "Roles", description = "Employee roles"),
        (name = "Users", description = "Employee login accounts"),
        (name = "User profiles", description = "Profiles assigned to users"),
        (name = "Persons", description = "People records"),
        (name = "Customers", description = "Customer sign-up and management"),
        (name = "Employees", description = "Employee management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /api/v1/auth/token"))
                        .build(),
                ),
            );
        }
    }
}
