//! Unit of Work pattern implementation.
//!
//! One unit of work per request: it owns the request's [`Session`] and hands
//! out repositories bound to it. Nothing is visible to other requests until
//! [`UnitOfWork::commit`]; [`UnitOfWork::rollback`] discards every write.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::repositories::{
    CustomerRepository, CustomerStore, EmployeeRepository, EmployeeStore, PermissionRepository,
    PermissionStore, PersonRepository, PersonStore, ProfilePermissionRepository,
    ProfilePermissionStore, ProfileRepository, ProfileStore, RoleRepository, RoleStore,
    UserProfileRepository, UserProfileStore, UserRepository, UserStore,
};
use super::session::Session;
use crate::errors::AppResult;

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction
/// management. Tests implement it over repository mocks.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn persons(&self) -> Arc<dyn PersonRepository>;

    fn users(&self) -> Arc<dyn UserRepository>;

    fn roles(&self) -> Arc<dyn RoleRepository>;

    fn permissions(&self) -> Arc<dyn PermissionRepository>;

    fn profiles(&self) -> Arc<dyn ProfileRepository>;

    fn profile_permissions(&self) -> Arc<dyn ProfilePermissionRepository>;

    fn user_profiles(&self) -> Arc<dyn UserProfileRepository>;

    fn customers(&self) -> Arc<dyn CustomerRepository>;

    fn employees(&self) -> Arc<dyn EmployeeRepository>;

    /// Make every write of this unit visible and close it
    async fn commit(&self) -> AppResult<()>;

    /// Discard every write of this unit and close it
    async fn rollback(&self) -> AppResult<()>;
}

/// Concrete implementation of UnitOfWork over one database transaction
pub struct Persistence {
    session: Arc<Session>,
    persons: Arc<PersonStore>,
    users: Arc<UserStore>,
    roles: Arc<RoleStore>,
    permissions: Arc<PermissionStore>,
    profiles: Arc<ProfileStore>,
    profile_permissions: Arc<ProfilePermissionStore>,
    user_profiles: Arc<UserProfileStore>,
    customers: Arc<CustomerStore>,
    employees: Arc<EmployeeStore>,
}

impl Persistence {
    /// Open a new session on `db` and bind every repository to it.
    pub async fn begin(db: &DatabaseConnection) -> AppResult<Self> {
        let session = Arc::new(Session::begin(db).await?);

        Ok(Self {
            persons: Arc::new(PersonStore::new(session.clone())),
            users: Arc::new(UserStore::new(session.clone())),
            roles: Arc::new(RoleStore::new(session.clone())),
            permissions: Arc::new(PermissionStore::new(session.clone())),
            profiles: Arc::new(ProfileStore::new(session.clone())),
            profile_permissions: Arc::new(ProfilePermissionStore::new(session.clone())),
            user_profiles: Arc::new(UserProfileStore::new(session.clone())),
            customers: Arc::new(CustomerStore::new(session.clone())),
            employees: Arc::new(EmployeeStore::new(session.clone())),
            session,
        })
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
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
        self.session.commit().await
    }

    async fn rollback(&self) -> AppResult<()> {
        if let Err(e) = self.session.rollback().await {
            tracing::error!("Transaction rollback failed: {}", e);
            return Err(e);
        }
        Ok(())
    }
}
