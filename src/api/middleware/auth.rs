//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Principal;
use crate::errors::AppError;

/// Bearer authentication middleware.
///
/// Decodes the token from the Authorization header and injects the
/// caller's [`Principal`] into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or(AppError::Unauthorized)?;

    let claims = state.tokens().decode_token(token)?;
    request.extensions_mut().insert(Principal::from(claims));

    Ok(next.run(request).await)
}

/// Fail with `Forbidden` unless the caller's profile grants `permission`.
pub fn require_permission(principal: &Principal, permission: &str) -> Result<(), AppError> {
    if principal.has_permission(permission) {
        Ok(())
    } else {
        tracing::debug!(caller = %principal.id, permission, "Permission denied");
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_require_permission() {
        let principal = Principal {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            profile: "employee".to_string(),
            permissions: vec!["can_view_roles".to_string()],
        };

        assert!(require_permission(&principal, "can_view_roles").is_ok());
        assert!(matches!(
            require_permission(&principal, "can_delete_role"),
            Err(AppError::Forbidden)
        ));
    }
}
