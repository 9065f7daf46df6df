//! People resources: persons, customers and employees.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::access::{RoleResponse, UserResponse};
use crate::domain::cpf::validate_cpf;
use crate::domain::{Customer, Employee, EmploymentDates, Entity, Person, PersonData};
use crate::services::{EmployeeAssignment, NewEmployee};

/// Person details as submitted by callers
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PersonRequest {
    /// Eleven digits, mask optional
    #[validate(custom(function = "validate_cpf"))]
    #[schema(example = "03619966087")]
    pub cpf: String,
    #[validate(length(min = 3, max = 200, message = "Name must be between 3 and 200 characters"))]
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 150, message = "Email must be at most 150 characters")
    )]
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[schema(example = "1990-05-17")]
    pub birth_date: NaiveDate,
}

impl From<PersonRequest> for PersonData {
    fn from(request: PersonRequest) -> Self {
        Self {
            name: request.name,
            cpf: Some(request.cpf),
            email: Some(request.email),
            birth_date: Some(request.birth_date),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonResponse {
    pub id: Uuid,
    pub name: String,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inactivated_at: Option<DateTime<Utc>>,
}

impl From<&Person> for PersonResponse {
    fn from(person: &Person) -> Self {
        let lifecycle = person.lifecycle();
        Self {
            id: person.id(),
            name: person.name().to_string(),
            cpf: person.cpf().map(str::to_string),
            email: person.email().map(str::to_string),
            birth_date: person.birth_date(),
            created_at: lifecycle.created_at(),
            updated_at: lifecycle.updated_at(),
            inactivated_at: lifecycle.inactivated_at(),
        }
    }
}

/// Customer sign-up or update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerRequest {
    #[validate(nested)]
    pub person: PersonRequest,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub person: PersonResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inactivated_at: Option<DateTime<Utc>>,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        let lifecycle = customer.lifecycle();
        Self {
            id: customer.id(),
            person: PersonResponse::from(customer.person()),
            created_at: lifecycle.created_at(),
            updated_at: lifecycle.updated_at(),
            inactivated_at: lifecycle.inactivated_at(),
        }
    }
}

/// Hire an employee
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EmployeeRequest {
    #[validate(nested)]
    pub person: PersonRequest,
    pub role_id: Uuid,
    pub user_id: Uuid,
    pub admission_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
}

impl From<EmployeeRequest> for NewEmployee {
    fn from(request: EmployeeRequest) -> Self {
        Self {
            person: request.person.into(),
            role_id: request.role_id,
            user_id: request.user_id,
            dates: EmploymentDates {
                admission_date: request.admission_date,
                termination_date: request.termination_date,
            },
        }
    }
}

/// Re-point an employee at other records
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EmployeeUpdateRequest {
    pub person_id: Uuid,
    pub role_id: Uuid,
    pub user_id: Uuid,
    pub admission_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
}

impl From<EmployeeUpdateRequest> for EmployeeAssignment {
    fn from(request: EmployeeUpdateRequest) -> Self {
        Self {
            person_id: request.person_id,
            role_id: request.role_id,
            user_id: request.user_id,
            dates: EmploymentDates {
                admission_date: request.admission_date,
                termination_date: request.termination_date,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: Uuid,
    pub person: PersonResponse,
    pub role: RoleResponse,
    pub user: UserResponse,
    pub admission_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inactivated_at: Option<DateTime<Utc>>,
}

impl From<&Employee> for EmployeeResponse {
    fn from(employee: &Employee) -> Self {
        let lifecycle = employee.lifecycle();
        let dates = employee.dates();
        Self {
            id: employee.id(),
            person: PersonResponse::from(employee.person()),
            role: RoleResponse::from(employee.role()),
            user: UserResponse::from(employee.user()),
            admission_date: dates.admission_date,
            termination_date: dates.termination_date,
            created_at: lifecycle.created_at(),
            updated_at: lifecycle.updated_at(),
            inactivated_at: lifecycle.inactivated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> PersonRequest {
        PersonRequest {
            cpf: "03619966087".to_string(),
            name: "Maria Silva".to_string(),
            email: "maria@example.com".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        }
    }

    #[test]
    fn test_valid_person_request() {
        assert!(person().validate().is_ok());
    }

    #[test]
    fn test_bad_checksum_is_rejected() {
        let request = PersonRequest {
            cpf: "03619966088".to_string(),
            ..person()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("cpf"));
    }

    #[test]
    fn test_nested_person_is_validated() {
        let request = CustomerRequest {
            person: PersonRequest {
                name: "Al".to_string(),
                ..person()
            },
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_person_request_into_data() {
        let data = PersonData::from(person());
        assert_eq!(data.cpf.as_deref(), Some("03619966087"));
        assert_eq!(data.birth_date, NaiveDate::from_ymd_opt(1990, 5, 17));
    }
}
