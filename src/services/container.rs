//! Service Container - every use case bound to one unit of work.
//!
//! A container is built per request around that request's unit of work,
//! so all services of one request share its transaction and identity map.

use std::future::Future;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, CustomerManager, CustomerService, EmployeeManager,
    EmployeeService, PermissionManager, PermissionService, PersonManager, PersonService,
    ProfileManager, ProfilePermissionManager, ProfilePermissionService, ProfileService,
    RoleManager, RoleService, TokenIssuer, UserManager, UserProfileManager, UserProfileService,
    UserService,
};
use crate::config::Config;
use crate::domain::{Customer, DeletePolicy, PersonData};
use crate::errors::AppResult;
use crate::infra::{provider_from_config, IdentityProvider, UnitOfWork};

/// Process-wide collaborators injected into every service.
#[derive(Clone)]
pub struct ServiceContext {
    pub policy: DeletePolicy,
    pub tokens: TokenIssuer,
    pub provider: Arc<dyn IdentityProvider>,
    pub verify_cpf: bool,
}

impl ServiceContext {
    pub fn new(
        policy: DeletePolicy,
        tokens: TokenIssuer,
        provider: Arc<dyn IdentityProvider>,
        verify_cpf: bool,
    ) -> Self {
        Self {
            policy,
            tokens,
            provider,
            verify_cpf,
        }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self::new(
            config.delete_policy,
            TokenIssuer::from_config(config),
            provider_from_config(config)?,
            config.auth_provider_verify_cpf,
        ))
    }
}

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn persons(&self) -> Arc<dyn PersonService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn roles(&self) -> Arc<dyn RoleService>;

    fn permissions(&self) -> Arc<dyn PermissionService>;

    fn profiles(&self) -> Arc<dyn ProfileService>;

    fn profile_permissions(&self) -> Arc<dyn ProfilePermissionService>;

    fn user_profiles(&self) -> Arc<dyn UserProfileService>;

    fn customers(&self) -> Arc<dyn CustomerService>;

    fn employees(&self) -> Arc<dyn EmployeeService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth: Arc<dyn AuthService>,
    persons: Arc<dyn PersonService>,
    users: Arc<dyn UserService>,
    roles: Arc<dyn RoleService>,
    permissions: Arc<dyn PermissionService>,
    profiles: Arc<dyn ProfileService>,
    profile_permissions: Arc<dyn ProfilePermissionService>,
    user_profiles: Arc<dyn UserProfileService>,
    customers: Arc<dyn CustomerService>,
    employees: Arc<dyn EmployeeService>,
}

impl Services {
    /// Bind every service to `uow`.
    pub fn new<U: UnitOfWork + 'static>(uow: Arc<U>, context: &ServiceContext) -> Self {
        let policy = context.policy;

        Self {
            auth: Arc::new(Authenticator::new(
                uow.clone(),
                context.tokens.clone(),
                context.provider.clone(),
                context.verify_cpf,
            )),
            persons: Arc::new(PersonManager::new(uow.clone(), policy)),
            users: Arc::new(UserManager::new(uow.clone(), policy)),
            roles: Arc::new(RoleManager::new(uow.clone(), policy)),
            permissions: Arc::new(PermissionManager::new(uow.clone(), policy)),
            profiles: Arc::new(ProfileManager::new(uow.clone(), policy)),
            profile_permissions: Arc::new(ProfilePermissionManager::new(uow.clone(), policy)),
            user_profiles: Arc::new(UserProfileManager::new(uow.clone(), policy)),
            customers: Arc::new(CustomerManager::new(uow.clone(), policy)),
            employees: Arc::new(EmployeeManager::new(uow, policy)),
        }
    }
}

impl Services {
    /// Run `work` on services bound to `uow`.
    ///
    /// The unit commits when `work` succeeds and rolls back otherwise, so
    /// multi-step use cases are all-or-nothing.
    pub async fn run<U, T, F, Fut>(uow: Arc<U>, context: &ServiceContext, work: F) -> AppResult<T>
    where
        U: UnitOfWork + 'static,
        F: FnOnce(Arc<dyn ServiceContainer>) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let services: Arc<dyn ServiceContainer> = Arc::new(Services::new(uow.clone(), context));

        match work(services).await {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(e) => {
                // Already logged by the unit of work
                let _ = uow.rollback().await;
                Err(e)
            }
        }
    }

    /// Sign a customer up in `uow`, then push it to the identity provider.
    ///
    /// The provider only hears about customers that were committed.
    pub async fn sign_up_customer<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        context: &ServiceContext,
        data: PersonData,
    ) -> AppResult<Customer> {
        let customer = Self::run(uow, context, |services| async move {
            services.customers().create_customer(data).await
        })
        .await?;

        context.provider.sync_user(customer.person()).await;
        Ok(customer)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn persons(&self) -> Arc<dyn PersonService> {
        self.persons.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleService> {
        self.roles.clone()
    }

    fn permissions(&self) -> Arc<dyn PermissionService> {
        self.permissions.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profiles.clone()
    }

    fn profile_permissions(&self) -> Arc<dyn ProfilePermissionService> {
        self.profile_permissions.clone()
    }

    fn user_profiles(&self) -> Arc<dyn UserProfileService> {
        self.user_profiles.clone()
    }

    fn customers(&self) -> Arc<dyn CustomerService> {
        self.customers.clone()
    }

    fn employees(&self) -> Arc<dyn EmployeeService> {
        self.employees.clone()
    }
}
