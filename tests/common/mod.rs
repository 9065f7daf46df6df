//! Shared fixtures for the integration tests.
//!
//! Services run over a [`TestUnitOfWork`] whose repositories are mockall
//! mocks; no database is involved.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use jsonwebtoken::Algorithm;

use identity_service::domain::{
    Customer, Employee, EmploymentDates, Lifecycle, Permission, PermissionData, Person,
    PersonData, Profile, Role, RoleData, User, UserData,
};
use identity_service::errors::{AppError, AppResult};
use identity_service::infra::{
    CustomerRepository, EmployeeRepository, MockCustomerRepository, MockEmployeeRepository,
    MockPermissionRepository, MockPersonRepository, MockProfilePermissionRepository,
    MockProfileRepository, MockRoleRepository, MockUserProfileRepository, MockUserRepository,
    PermissionRepository, PersonRepository, ProfilePermissionRepository, ProfileRepository,
    RoleRepository, UnitOfWork, UserProfileRepository, UserRepository,
};
use identity_service::services::TokenIssuer;

pub const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

/// Valid CPFs
pub const CPF: &str = "03619966087";
pub const OTHER_CPF: &str = "52998224725";

pub const PASSWORD: &str = "SecurePass123!";

/// Repository mocks to be wired into a [`TestUnitOfWork`]
#[derive(Default)]
pub struct Repos {
    pub persons: MockPersonRepository,
    pub users: MockUserRepository,
    pub roles: MockRoleRepository,
    pub permissions: MockPermissionRepository,
    pub profiles: MockProfileRepository,
    pub profile_permissions: MockProfilePermissionRepository,
    pub user_profiles: MockUserProfileRepository,
    pub customers: MockCustomerRepository,
    pub employees: MockEmployeeRepository,
}

/// Unit of work over repository mocks. Commit and rollback only count
/// their calls; commit can be made to fail.
pub struct TestUnitOfWork {
    persons: Arc<MockPersonRepository>,
    users: Arc<MockUserRepository>,
    roles: Arc<MockRoleRepository>,
    permissions: Arc<MockPermissionRepository>,
    profiles: Arc<MockProfileRepository>,
    profile_permissions: Arc<MockProfilePermissionRepository>,
    user_profiles: Arc<MockUserProfileRepository>,
    customers: Arc<MockCustomerRepository>,
    employees: Arc<MockEmployeeRepository>,
    commit_fails: bool,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl TestUnitOfWork {
    pub fn new(repos: Repos) -> Arc<Self> {
        Self::build(repos, false)
    }

    /// Unit whose commit fails as the database would on a lost connection
    pub fn failing_commit(repos: Repos) -> Arc<Self> {
        Self::build(repos, true)
    }

    fn build(repos: Repos, commit_fails: bool) -> Arc<Self> {
        Arc::new(Self {
            persons: Arc::new(repos.persons),
            users: Arc::new(repos.users),
            roles: Arc::new(repos.roles),
            permissions: Arc::new(repos.permissions),
            profiles: Arc::new(repos.profiles),
            profile_permissions: Arc::new(repos.profile_permissions),
            user_profiles: Arc::new(repos.user_profiles),
            customers: Arc::new(repos.customers),
            employees: Arc::new(repos.employees),
            commit_fails,
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
        })
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn persons(&self) -> Arc<dyn PersonRepository> {
        self.persons.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    fn permissions(&self) -> Arc<dyn PermissionRepository> {
        self.permissions.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    fn profile_permissions(&self) -> Arc<dyn ProfilePermissionRepository> {
        self.profile_permissions.clone()
    }

    fn user_profiles(&self) -> Arc<dyn UserProfileRepository> {
        self.user_profiles.clone()
    }

    fn customers(&self) -> Arc<dyn CustomerRepository> {
        self.customers.clone()
    }

    fn employees(&self) -> Arc<dyn EmployeeRepository> {
        self.employees.clone()
    }

    async fn commit(&self) -> AppResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self.commit_fails {
            return Err(AppError::Internal("commit failed".to_string()));
        }
        Ok(())
    }

    async fn rollback(&self) -> AppResult<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn tokens() -> TokenIssuer {
    TokenIssuer::new(SECRET, Algorithm::HS256, None)
}

pub fn person_data(cpf: &str, email: &str) -> PersonData {
    PersonData {
        name: "Ana Souza".to_string(),
        cpf: Some(cpf.to_string()),
        email: Some(email.to_string()),
        birth_date: NaiveDate::from_ymd_opt(1990, 5, 1),
    }
}

pub fn person(cpf: &str, email: &str) -> Person {
    Person::new(person_data(cpf, email)).unwrap()
}

pub fn permission(name: &str) -> Permission {
    Permission::new(PermissionData {
        name: name.to_string(),
        description: format!("Allows {}", name),
    })
    .unwrap()
}

/// Active profile granting `permissions` in the given order
pub fn profile(name: &str, permissions: &[&str]) -> Profile {
    Profile::restore(
        Lifecycle::new(),
        name.to_string(),
        format!("{} profile", name),
        permissions.iter().map(|p| permission(p)).collect(),
        Vec::new(),
    )
}

pub fn role(name: &str) -> Role {
    Role::new(RoleData {
        name: name.to_string(),
        description: format!("{} role", name),
    })
    .unwrap()
}

pub fn user(name: &str) -> User {
    User::new(UserData {
        name: name.to_string(),
        password: PASSWORD.to_string(),
    })
    .unwrap()
}

pub fn customer(cpf: &str) -> Customer {
    Customer::new(person(cpf, "ana@example.com"))
}

pub fn employee(role_name: &str, username: &str) -> Employee {
    Employee::new(
        person(OTHER_CPF, "joao@example.com"),
        role(role_name),
        user(username),
        EmploymentDates::default(),
    )
}
