//! Application state - Dependency injection container.
//!
//! Every request runs inside its own unit of work: [`AppState::execute`]
//! opens a session and hands it to [`Services::run`], which commits or
//! rolls back depending on the outcome.

use std::future::Future;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Customer, PersonData};
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{ServiceContainer, ServiceContext, Services, TokenIssuer};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection
    pub database: Arc<Database>,
    /// Collaborators injected into every service
    context: ServiceContext,
}

impl AppState {
    pub fn new(database: Arc<Database>, context: ServiceContext) -> Self {
        Self { database, context }
    }

    /// Build the state from configuration, selecting the identity provider.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        Ok(Self::new(database, ServiceContext::from_config(config)?))
    }

    /// Token issuer used by the bearer middleware
    pub fn tokens(&self) -> &TokenIssuer {
        &self.context.tokens
    }

    /// Run `work` in a fresh unit of work, committed on success.
    pub async fn execute<T, F, Fut>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(Arc<dyn ServiceContainer>) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let uow = Arc::new(Persistence::begin(self.database.connection()).await?);
        Services::run(uow, &self.context, work).await
    }

    /// Customer sign-up in a fresh unit of work, synced to the identity
    /// provider after the commit.
    pub async fn sign_up_customer(&self, data: PersonData) -> AppResult<Customer> {
        let uow = Arc::new(Persistence::begin(self.database.connection()).await?);
        Services::sign_up_customer(uow, &self.context, data).await
    }
}
