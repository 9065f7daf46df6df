//! Employee service - staff records binding a person, a role and a user.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::person_service::upsert_person;
use super::removal::{plan_removal, Removal};
use crate::domain::{
    DeletePolicy, Employee, EmploymentDates, Entity, Person, PersonData, Role, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Input for hiring an employee
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub person: PersonData,
    pub role_id: Uuid,
    pub user_id: Uuid,
    pub dates: EmploymentDates,
}

/// Input for re-pointing an employee record
#[derive(Debug, Clone)]
pub struct EmployeeAssignment {
    pub person_id: Uuid,
    pub role_id: Uuid,
    pub user_id: Uuid,
    pub dates: EmploymentDates,
}

/// Employee service trait for dependency injection.
#[async_trait]
pub trait EmployeeService: Send + Sync {
    /// Hire an employee. A soft-deleted employee holding the same user or
    /// person is reactivated instead of duplicated.
    async fn create_employee(&self, input: NewEmployee) -> AppResult<Employee>;

    async fn get_employee(&self, id: Uuid) -> AppResult<Employee>;

    async fn get_employee_by_person_id(&self, person_id: Uuid) -> AppResult<Employee>;

    async fn get_employee_by_user_id(&self, user_id: Uuid) -> AppResult<Employee>;

    /// Active employees holding a role
    async fn list_employees_by_role_id(&self, role_id: Uuid) -> AppResult<Vec<Employee>>;

    async fn list_employees(&self, include_deleted: bool) -> AppResult<Vec<Employee>>;

    /// Re-point an active employee. A person or user already held by
    /// another employee record, retired or not, is a conflict.
    async fn update_employee(&self, id: Uuid, input: EmployeeAssignment) -> AppResult<Employee>;

    async fn delete_employee(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of EmployeeService using Unit of Work.
pub struct EmployeeManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: DeletePolicy,
}

impl<U: UnitOfWork> EmployeeManager<U> {
    pub fn new(uow: Arc<U>, policy: DeletePolicy) -> Self {
        Self { uow, policy }
    }

    async fn role(&self, id: Uuid) -> AppResult<Role> {
        self.uow.roles().find_by_id(id).await?.ok_or_not_found(Role::NAME)
    }

    async fn user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found(User::NAME)
    }
}

#[async_trait]
impl<U: UnitOfWork> EmployeeService for EmployeeManager<U> {
    async fn create_employee(&self, input: NewEmployee) -> AppResult<Employee> {
        let person = upsert_person(self.uow.persons().as_ref(), input.person, Person::NAME).await?;
        let role = self.role(input.role_id).await?;
        let user = self.user(input.user_id).await?;

        let employees = self.uow.employees();
        let by_user = employees.find_by_username(user.name()).await?;
        let by_person = employees.find_by_person_id(person.id()).await?;

        if by_user.iter().chain(by_person.iter()).any(|e| !e.is_deleted()) {
            return Err(AppError::conflict(Employee::NAME));
        }
        // Two retired records: reviving either would collide with the other
        if let (Some(a), Some(b)) = (&by_user, &by_person) {
            if a.id() != b.id() {
                return Err(AppError::conflict(Employee::NAME));
            }
        }

        match by_user.or(by_person) {
            Some(existing) => {
                let mut employee = existing.reassign(person, role, user, input.dates);
                employee.reactivate();
                let employee = employees.update(&employee).await?;
                tracing::info!(id = %employee.id(), "Employee reactivated");
                Ok(employee)
            }
            None => {
                let employee = employees
                    .create(&Employee::new(person, role, user, input.dates))
                    .await?;
                tracing::info!(id = %employee.id(), role = %employee.role().name(), "Employee created");
                Ok(employee)
            }
        }
    }

    async fn get_employee(&self, id: Uuid) -> AppResult<Employee> {
        self.uow
            .employees()
            .find_by_id(id)
            .await?
            .ok_or_not_found(Employee::NAME)
    }

    async fn get_employee_by_person_id(&self, person_id: Uuid) -> AppResult<Employee> {
        self.uow
            .employees()
            .find_by_person_id(person_id)
            .await?
            .ok_or_not_found(Employee::NAME)
    }

    async fn get_employee_by_user_id(&self, user_id: Uuid) -> AppResult<Employee> {
        self.uow
            .employees()
            .find_by_user_id(user_id)
            .await?
            .ok_or_not_found(Employee::NAME)
    }

    async fn list_employees_by_role_id(&self, role_id: Uuid) -> AppResult<Vec<Employee>> {
        self.uow.employees().find_by_role_id(role_id).await
    }

    async fn list_employees(&self, include_deleted: bool) -> AppResult<Vec<Employee>> {
        self.uow.employees().list(include_deleted).await
    }

    async fn update_employee(&self, id: Uuid, input: EmployeeAssignment) -> AppResult<Employee> {
        let employees = self.uow.employees();
        let employee = employees
            .find_by_id(id)
            .await?
            .filter(|employee| !employee.is_deleted())
            .ok_or_not_found(Employee::NAME)?;

        let person = self
            .uow
            .persons()
            .find_by_id(input.person_id)
            .await?
            .ok_or_not_found(Person::NAME)?;
        let role = self.role(input.role_id).await?;
        let user = self.user(input.user_id).await?;

        let holders = [
            employees.find_by_person_id(person.id()).await?,
            employees.find_by_user_id(user.id()).await?,
        ];
        if holders.iter().flatten().any(|holder| holder.id() != id) {
            return Err(AppError::conflict(Employee::NAME));
        }

        let employee = employees
            .update(&employee.reassign(person, role, user, input.dates))
            .await?;
        tracing::info!(id = %employee.id(), "Employee updated");
        Ok(employee)
    }

    async fn delete_employee(&self, id: Uuid) -> AppResult<()> {
        let employees = self.uow.employees();
        match plan_removal(self.policy, employees.find_by_id(id).await?)? {
            Removal::Soft(employee) => {
                employees.update(&employee).await?;
            }
            Removal::Hard(id) => employees.delete(id).await?,
        }
        tracing::info!(id = %id, policy = %self.policy, "Employee deleted");
        Ok(())
    }
}
