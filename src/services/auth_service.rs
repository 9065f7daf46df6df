//! Authentication service - the three login flows.
//!
//! Every flow ends the same way: resolve a profile, resolve its permission
//! names and sign a token carrying both plus the caller's person details.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::token::{PersonClaims, ProfileClaims, TokenIssuer};
use crate::config::{PROFILE_CUSTOMER, PROFILE_EMPLOYEE, PROFILE_MANAGER, TOKEN_TYPE_BEARER};
use crate::domain::{Cpf, Customer, Entity, Password, Person, Profile};
use crate::errors::{AppError, AppResult};
use crate::infra::{IdentityProvider, UnitOfWork};

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Token type (always "bearer")
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Signed access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            token_type: TOKEN_TYPE_BEARER.to_string(),
            access_token,
        }
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Log a registered customer in by CPF alone
    async fn login_customer_by_cpf(&self, cpf: &str) -> AppResult<TokenResponse>;

    /// Log an employee in by username and password
    async fn login_employee(&self, username: &str, password: &str) -> AppResult<TokenResponse>;

    /// Mint a throw-away customer and log it in
    async fn login_customer_anonymous(&self) -> AppResult<TokenResponse>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: TokenIssuer,
    provider: Arc<dyn IdentityProvider>,
    verify_cpf: bool,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// With `verify_cpf`, CPF logins must also be accepted by `provider`.
    pub fn new(
        uow: Arc<U>,
        tokens: TokenIssuer,
        provider: Arc<dyn IdentityProvider>,
        verify_cpf: bool,
    ) -> Self {
        Self {
            uow,
            tokens,
            provider,
            verify_cpf,
        }
    }

    /// Profile `name`, failing as `NotFound("<label> profile")`.
    async fn login_profile(&self, name: &str, label: &str) -> AppResult<Profile> {
        self.uow
            .profiles()
            .find_by_name(name)
            .await?
            .filter(|profile| !profile.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("{} profile", label)))
    }

    /// Permission names of `profile`; an empty grant is `NotFound`.
    fn required_permissions(profile: &Profile, label: &str) -> AppResult<Vec<String>> {
        let permissions = profile.permission_names();
        if permissions.is_empty() {
            return Err(AppError::not_found(format!("{} permissions", label)));
        }
        Ok(permissions)
    }

    fn issue(
        &self,
        id: Uuid,
        person: &Person,
        profile: &Profile,
        permissions: Vec<String>,
    ) -> AppResult<TokenResponse> {
        let token = self.tokens.issue(
            PersonClaims::new(id, person),
            ProfileClaims::new(profile, permissions),
        )?;
        Ok(TokenResponse::bearer(token))
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login_customer_by_cpf(&self, cpf: &str) -> AppResult<TokenResponse> {
        let cpf = Cpf::parse(cpf)
            .map(Cpf::into_string)
            .unwrap_or_else(|_| cpf.trim().to_string());

        if self.verify_cpf && !self.provider.authenticate(&cpf).await {
            tracing::warn!("CPF login rejected by identity provider");
            return Err(AppError::InvalidCredentials);
        }

        let customer = self
            .uow
            .customers()
            .find_by_cpf(&cpf)
            .await?
            .ok_or_else(|| AppError::not_found(Customer::NAME))?;
        if customer.is_deleted() {
            tracing::warn!(id = %customer.id(), "Login attempt for inactive customer");
            return Err(AppError::InvalidCredentials);
        }

        let profile = self.login_profile(PROFILE_CUSTOMER, "Customer").await?;
        let permissions = Self::required_permissions(&profile, "Customer")?;

        tracing::info!(id = %customer.id(), "Customer logged in by CPF");
        self.issue(customer.id(), customer.person(), &profile, permissions)
    }

    async fn login_employee(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        let employee = self.uow.employees().find_by_username(username).await?;

        // Unknown usernames still pay for one hash verification
        let verified = match &employee {
            Some(employee) => employee.user().verify_password(password),
            None => {
                Password::dummy().verify(password);
                false
            }
        };

        let employee = match employee {
            Some(employee) if verified && !employee.is_deleted() => employee,
            _ => {
                tracing::warn!("Employee login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let profile_name = if employee.role().is_manager() {
            PROFILE_MANAGER
        } else {
            PROFILE_EMPLOYEE
        };
        let profile = self.login_profile(profile_name, "Employee").await?;
        let permissions = Self::required_permissions(&profile, "Employee")?;

        tracing::info!(id = %employee.id(), profile = %profile.name(), "Employee logged in");
        self.issue(employee.id(), employee.person(), &profile, permissions)
    }

    async fn login_customer_anonymous(&self) -> AppResult<TokenResponse> {
        let profile = self.login_profile(PROFILE_CUSTOMER, "Customer").await?;

        let person = self.uow.persons().create(&Person::anonymous()).await?;
        let customer = self.uow.customers().create(&Customer::new(person)).await?;

        let permissions = profile.permission_names();
        if permissions.is_empty() {
            tracing::warn!("Customer profile grants no permissions; issuing anonymous token anyway");
        }

        tracing::info!(id = %customer.id(), "Anonymous customer logged in");
        self.issue(customer.id(), customer.person(), &profile, permissions)
    }
}
