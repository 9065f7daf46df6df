//! HTTP surface tests.
//!
//! The router runs over a disconnected database, so only requests that are
//! answered before a unit of work opens are exercised here: bearer
//! authentication, permission checks, body validation and the OpenAPI
//! document.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use identity_service::api::{create_router, AppState};
use identity_service::config::permissions;
use identity_service::domain::DeletePolicy;
use identity_service::infra::{Database, NoopIdentityProvider};
use identity_service::services::{PersonClaims, ProfileClaims, ServiceContext};

use common::*;

fn app() -> Router {
    let database = Arc::new(Database::from_connection(DatabaseConnection::Disconnected));
    let context = ServiceContext::new(
        DeletePolicy::Soft,
        tokens(),
        Arc::new(NoopIdentityProvider),
        false,
    );
    create_router(AppState::new(database, context))
}

fn bearer(profile: &str, granted: &[&str]) -> String {
    let token = tokens()
        .issue(
            PersonClaims {
                id: Uuid::new_v4(),
                name: "Maria Lima".to_string(),
                cpf: Some(OTHER_CPF.to_string()),
                email: None,
            },
            ProfileClaims {
                name: profile.to_string(),
                permissions: granted.iter().map(|p| p.to_string()).collect(),
            },
        )
        .unwrap();
    format!("Bearer {}", token)
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: Method, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    for uri in ["/api/v1/roles", "/api/v1/customers", "/api/v1/employees/role/x"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let request = Request::builder()
        .uri("/api/v1/permissions")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_missing_permission_is_forbidden() {
    let auth = bearer("customer", &[permissions::customers::VIEW]);
    let request = Request::builder()
        .uri("/api/v1/roles")
        .header(header::AUTHORIZATION, auth)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_invalid_body_is_unprocessable() {
    let auth = bearer("manager", &[permissions::roles::CREATE]);
    let request = json_request(
        Method::POST,
        "/api/v1/roles",
        Some(&auth),
        json!({ "name": "", "description": "Front desk" }),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["name"].is_array());
}

#[tokio::test]
async fn test_customer_sign_up_is_public() {
    // Rejected by validation rather than by the bearer middleware
    let request = json_request(
        Method::POST,
        "/api/v1/customers",
        None,
        json!({
            "person": {
                "cpf": "03619966088",
                "name": "Ana Souza",
                "email": "ana@example.com",
                "birth_date": "1990-05-01"
            }
        }),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["person.cpf"].is_array());
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    for path in [
        "/api/v1/auth/token",
        "/api/v1/customers",
        "/api/v1/customers/{id}",
        "/api/v1/profile-permissions/permission/{permission_id}",
        "/api/v1/user-profiles/user/{user_id}/profile/{profile_id}",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}
