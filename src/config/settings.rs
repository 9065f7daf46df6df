//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_DELETE_MODE, DEFAULT_JWT_ALGORITHM,
    DEFAULT_PROVIDER_TIMEOUT_SECONDS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_JWT_SECRET_LENGTH,
};
use crate::domain::DeletePolicy;

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    /// Token lifetime; `None` issues tokens without `iat`/`exp`
    pub jwt_expiration_minutes: Option<i64>,
    pub delete_policy: DeletePolicy,
    pub auth_provider_url: Option<String>,
    pub auth_provider_verify_cpf: bool,
    pub auth_provider_timeout_seconds: u64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("delete_policy", &self.delete_policy)
            .field("auth_provider_url", &self.auth_provider_url)
            .field("auth_provider_verify_cpf", &self.auth_provider_verify_cpf)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short, if JWT_ALGORITHM
    /// names a non-HMAC algorithm, or if DELETE_MODE is neither `soft` nor
    /// `hard`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let algorithm_name =
            env::var("JWT_ALGORITHM").unwrap_or_else(|_| DEFAULT_JWT_ALGORITHM.to_string());
        let jwt_algorithm = match Algorithm::from_str(&algorithm_name) {
            Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => alg,
            _ => panic!("JWT_ALGORITHM must be one of HS256, HS384, HS512"),
        };

        let delete_policy = parse_delete_policy(
            &env::var("DELETE_MODE").unwrap_or_else(|_| DEFAULT_DELETE_MODE.to_string()),
        );

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_algorithm,
            jwt_expiration_minutes: env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|minutes: &i64| *minutes > 0),
            delete_policy,
            auth_provider_url: env::var("AUTH_PROVIDER_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            auth_provider_verify_cpf: env::var("AUTH_PROVIDER_VERIFY_CPF")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            auth_provider_timeout_seconds: env::var("AUTH_PROVIDER_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_delete_policy(mode: &str) -> DeletePolicy {
    match DeletePolicy::from_str(mode) {
        Ok(policy) => policy,
        Err(_) => panic!("DELETE_MODE must be either soft or hard, got {:?}", mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_mode_accepts_both_policies() {
        assert_eq!(parse_delete_policy("soft"), DeletePolicy::Soft);
        assert_eq!(parse_delete_policy(" HARD "), DeletePolicy::Hard);
    }

    #[test]
    #[should_panic(expected = "DELETE_MODE must be either soft or hard")]
    fn test_unknown_delete_mode_fails_startup() {
        parse_delete_policy("hrad");
    }
}
