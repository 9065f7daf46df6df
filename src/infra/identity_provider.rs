//! External identity-provider gateway.
//!
//! The provider exposes one login endpoint. `authenticate` asks whether a
//! CPF is known; `sync_user` pushes a person's details after sign-up and is
//! best effort: failures are logged and swallowed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::config::{Config, PROVIDER_LOGIN_PATH};
use crate::domain::Person;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Tracing target for identity-provider calls.
const TRACING_TARGET: &str = "identity_service::provider";

/// Identity-provider trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Whether the provider accepts this CPF. Transport errors count as
    /// a rejection.
    async fn authenticate(&self, cpf: &str) -> bool;

    /// Push `person` to the provider. Never fails.
    async fn sync_user(&self, person: &Person);
}

#[derive(Serialize)]
struct AuthenticateRequest<'a> {
    cpf: &'a str,
}

#[derive(Serialize)]
struct SyncUserRequest<'a> {
    cpf: Option<&'a str>,
    email: Option<&'a str>,
    name: &'a str,
    birthdate: Option<NaiveDate>,
}

/// HTTP client for the provider's login endpoint
#[derive(Clone, Debug)]
pub struct HttpIdentityProvider {
    http: Client,
    login_url: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Identity provider client: {}", e)))?;

        Ok(Self {
            http,
            login_url: format!("{}{}", base_url.trim_end_matches('/'), PROVIDER_LOGIN_PATH),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn authenticate(&self, cpf: &str) -> bool {
        let response = self
            .http
            .post(&self.login_url)
            .json(&AuthenticateRequest { cpf })
            .send()
            .await;

        match response {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    status = %response.status(),
                    "Identity provider rejected CPF"
                );
                false
            }
            Err(e) => {
                tracing::warn!(target: TRACING_TARGET, error = %e, "Identity provider unreachable");
                false
            }
        }
    }

    async fn sync_user(&self, person: &Person) {
        let body = SyncUserRequest {
            cpf: person.cpf(),
            email: person.email(),
            name: person.name(),
            birthdate: person.birth_date(),
        };

        match self.http.post(&self.login_url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(target: TRACING_TARGET, "User synced with identity provider");
            }
            Ok(response) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    status = %response.status(),
                    "Identity provider refused user sync"
                );
            }
            Err(e) => {
                tracing::error!(target: TRACING_TARGET, error = %e, "User sync failed");
            }
        }
    }
}

/// Provider used when no provider URL is configured.
///
/// Accepts every CPF and ignores syncs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopIdentityProvider;

#[async_trait]
impl IdentityProvider for NoopIdentityProvider {
    async fn authenticate(&self, _cpf: &str) -> bool {
        true
    }

    async fn sync_user(&self, _person: &Person) {}
}

/// Provider selected by `AUTH_PROVIDER_URL`.
pub fn provider_from_config(config: &Config) -> AppResult<Arc<dyn IdentityProvider>> {
    match &config.auth_provider_url {
        Some(url) => {
            tracing::info!(target: TRACING_TARGET, url = %url, "Using HTTP identity provider");
            let timeout = Duration::from_secs(config.auth_provider_timeout_seconds);
            Ok(Arc::new(HttpIdentityProvider::new(url, timeout)?))
        }
        None => {
            tracing::info!(target: TRACING_TARGET, "No identity provider configured");
            Ok(Arc::new(NoopIdentityProvider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_joins_base() {
        let provider =
            HttpIdentityProvider::new("http://auth.local/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.login_url, "http://auth.local/login");
    }

    #[tokio::test]
    async fn test_unreachable_provider_rejects() {
        // Port 9 (discard) on localhost is closed in test environments.
        let provider =
            HttpIdentityProvider::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        assert!(!provider.authenticate("52998224725").await);
    }

    #[tokio::test]
    async fn test_noop_provider_accepts() {
        assert!(NoopIdentityProvider.authenticate("52998224725").await);
        NoopIdentityProvider.sync_user(&Person::anonymous()).await;
    }

    #[test]
    fn test_sync_body_shape() {
        let body = SyncUserRequest {
            cpf: Some("52998224725"),
            email: None,
            name: "Ana Souza",
            birthdate: NaiveDate::from_ymd_opt(1990, 5, 1),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["cpf"], "52998224725");
        assert!(json["email"].is_null());
        assert_eq!(json["birthdate"], "1990-05-01");
    }
}
