//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Form, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::TokenResponse;

/// Token request, sent as `application/x-www-form-urlencoded`.
///
/// `username` + `password` logs an employee in, `username` alone is taken as
/// a customer CPF, and an empty form mints an anonymous customer.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenForm {
    /// Employee username or customer CPF
    #[schema(example = "52998224725")]
    pub username: Option<String>,
    /// Employee password
    #[schema(example = "SecurePass123!")]
    pub password: Option<String>,
}

/// Which login flow a form selects
#[derive(Debug, PartialEq, Eq)]
enum LoginMode {
    Employee { username: String, password: String },
    Cpf(String),
    Anonymous,
}

impl From<TokenForm> for LoginMode {
    fn from(form: TokenForm) -> Self {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        match (present(form.username), present(form.password)) {
            (Some(username), Some(password)) => LoginMode::Employee { username, password },
            (Some(cpf), None) => LoginMode::Cpf(cpf),
            _ => LoginMode::Anonymous,
        }
    }
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/token", post(token))
}

/// Obtain a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/token",
    tag = "Authentication",
    request_body(content = TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Customer or profile not found")
    )
)]
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> AppResult<Json<TokenResponse>> {
    let mode = LoginMode::from(form);
    let response = state
        .execute(|services| async move {
            let auth = services.auth();
            match mode {
                LoginMode::Employee { username, password } => {
                    auth.login_employee(&username, &password).await
                }
                LoginMode::Cpf(cpf) => auth.login_customer_by_cpf(&cpf).await,
                LoginMode::Anonymous => auth.login_customer_anonymous().await,
            }
        })
        .await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: Option<&str>, password: Option<&str>) -> TokenForm {
        TokenForm {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_login_mode_selection() {
        assert_eq!(
            LoginMode::from(form(Some("maria"), Some("secret123"))),
            LoginMode::Employee {
                username: "maria".to_string(),
                password: "secret123".to_string(),
            }
        );
        assert_eq!(
            LoginMode::from(form(Some("52998224725"), None)),
            LoginMode::Cpf("52998224725".to_string())
        );
        assert_eq!(LoginMode::from(form(None, None)), LoginMode::Anonymous);
    }

    #[test]
    fn test_blank_fields_count_as_missing() {
        assert_eq!(
            LoginMode::from(form(Some("52998224725"), Some(""))),
            LoginMode::Cpf("52998224725".to_string())
        );
        assert_eq!(LoginMode::from(form(Some("  "), None)), LoginMode::Anonymous);
    }
}
