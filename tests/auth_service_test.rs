//! Login flow tests.

mod common;

use std::sync::{Arc, Mutex};

use identity_service::domain::{Entity, Person};
use identity_service::errors::AppError;
use identity_service::infra::{IdentityProvider, MockIdentityProvider, NoopIdentityProvider};
use identity_service::services::{AuthService, Authenticator, TokenClaims};

use common::*;

fn authenticator(
    repos: Repos,
    provider: Arc<dyn IdentityProvider>,
    verify_cpf: bool,
) -> Authenticator<TestUnitOfWork> {
    Authenticator::new(TestUnitOfWork::new(repos), tokens(), provider, verify_cpf)
}

fn noop() -> Arc<dyn IdentityProvider> {
    Arc::new(NoopIdentityProvider)
}

fn decode(access_token: &str) -> TokenClaims {
    tokens().decode_token(access_token).unwrap()
}

fn expect_profile(repos: &mut Repos, name: &'static str, permissions: &[&str]) {
    let profile = profile(name, permissions);
    repos
        .profiles
        .expect_find_by_name()
        .withf(move |n| n == name)
        .times(1)
        .returning(move |_| Ok(Some(profile.clone())));
}

#[tokio::test]
async fn test_cpf_login_issues_customer_token() {
    let customer = customer(CPF);
    let customer_id = customer.id();

    let mut repos = Repos::default();
    repos
        .customers
        .expect_find_by_cpf()
        .withf(|cpf| cpf == CPF)
        .times(1)
        .returning(move |_| Ok(Some(customer.clone())));
    expect_profile(&mut repos, "customer", &["can_view_orders", "can_view_customers"]);

    // Masked input is normalised before the lookup
    let response = authenticator(repos, noop(), false)
        .login_customer_by_cpf("036.199.660-87")
        .await
        .unwrap();

    assert_eq!(response.token_type, "bearer");
    let claims = decode(&response.access_token);
    assert_eq!(claims.person.id, customer_id);
    assert_eq!(claims.person.cpf.as_deref(), Some(CPF));
    assert_eq!(claims.profile.name, "customer");
    assert_eq!(
        claims.profile.permissions,
        vec!["can_view_orders".to_string(), "can_view_customers".to_string()]
    );
}

#[tokio::test]
async fn test_cpf_login_unknown_customer() {
    let mut repos = Repos::default();
    repos.customers.expect_find_by_cpf().returning(|_| Ok(None));

    let result = authenticator(repos, noop(), false)
        .login_customer_by_cpf(CPF)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Customer"));
}

#[tokio::test]
async fn test_cpf_login_rejects_inactive_customer() {
    let mut customer = customer(CPF);
    customer.soft_delete().unwrap();

    let mut repos = Repos::default();
    repos
        .customers
        .expect_find_by_cpf()
        .returning(move |_| Ok(Some(customer.clone())));

    let result = authenticator(repos, noop(), false)
        .login_customer_by_cpf(CPF)
        .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_cpf_login_requires_profile_permissions() {
    let customer = customer(CPF);

    let mut repos = Repos::default();
    repos
        .customers
        .expect_find_by_cpf()
        .returning(move |_| Ok(Some(customer.clone())));
    expect_profile(&mut repos, "customer", &[]);

    let result = authenticator(repos, noop(), false)
        .login_customer_by_cpf(CPF)
        .await;

    assert!(
        matches!(result, Err(AppError::NotFound(entity)) if entity == "Customer permissions")
    );
}

#[tokio::test]
async fn test_cpf_login_checks_provider_first() {
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_authenticate()
        .withf(|cpf| cpf == CPF)
        .times(1)
        .returning(|_| false);

    // No repository expectations: the provider's refusal ends the flow
    let result = authenticator(Repos::default(), Arc::new(provider), true)
        .login_customer_by_cpf(CPF)
        .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_employee_login_profile_follows_role() {
    for (role_name, profile_name) in [("manager", "manager"), ("employee", "employee")] {
        let employee = employee(role_name, "joao.silva");
        let employee_id = employee.id();

        let mut repos = Repos::default();
        repos
            .employees
            .expect_find_by_username()
            .withf(|name| name == "joao.silva")
            .returning(move |_| Ok(Some(employee.clone())));
        expect_profile(&mut repos, profile_name, &["can_view_customers"]);

        let response = authenticator(repos, noop(), false)
            .login_employee("joao.silva", PASSWORD)
            .await
            .unwrap();

        let claims = decode(&response.access_token);
        assert_eq!(claims.person.id, employee_id);
        assert_eq!(claims.profile.name, profile_name);
    }
}

#[tokio::test]
async fn test_employee_login_failures_are_indistinguishable() {
    let employee = employee("employee", "joao.silva");
    let mut inactive = employee.clone();
    inactive.soft_delete().unwrap();

    let cases = [
        (Some(employee.clone()), "wrong-password"),
        (None, PASSWORD),
        (Some(inactive), PASSWORD),
    ];

    for (found, password) in cases {
        let mut repos = Repos::default();
        repos
            .employees
            .expect_find_by_username()
            .returning(move |_| Ok(found.clone()));

        let error = authenticator(repos, noop(), false)
            .login_employee("joao.silva", password)
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::InvalidCredentials));
        assert_eq!(error.to_string(), "invalid username or password");
    }
}

#[tokio::test]
async fn test_anonymous_logins_mint_distinct_customers() {
    let names = Arc::new(Mutex::new(Vec::new()));

    let mut repos = Repos::default();
    let profile = profile("customer", &["can_view_customers"]);
    repos
        .profiles
        .expect_find_by_name()
        .times(2)
        .returning(move |_| Ok(Some(profile.clone())));
    let seen = names.clone();
    repos
        .persons
        .expect_create()
        .times(2)
        .returning(move |person: &Person| {
            seen.lock().unwrap().push(person.name().to_string());
            Ok(person.clone())
        });
    repos
        .customers
        .expect_create()
        .times(2)
        .returning(|customer| Ok(customer.clone()));

    let auth = authenticator(repos, noop(), false);
    let first = decode(&auth.login_customer_anonymous().await.unwrap().access_token);
    let second = decode(&auth.login_customer_anonymous().await.unwrap().access_token);

    assert_ne!(first.person.id, second.person.id);
    assert_eq!(first.profile, second.profile);
    assert!(first.person.cpf.is_none());
    assert!(first.person.email.is_none());

    let names = names.lock().unwrap();
    assert_eq!(names.len(), 2);
    assert_ne!(names[0], names[1]);
    assert!(names.iter().all(|name| name.starts_with("Anonymous User - ")));
}

#[tokio::test]
async fn test_anonymous_login_tolerates_empty_profile() {
    let mut repos = Repos::default();
    expect_profile(&mut repos, "customer", &[]);
    repos.persons.expect_create().returning(|person| Ok(person.clone()));
    repos
        .customers
        .expect_create()
        .returning(|customer| Ok(customer.clone()));

    let response = authenticator(repos, noop(), false)
        .login_customer_anonymous()
        .await
        .unwrap();

    assert!(decode(&response.access_token).profile.permissions.is_empty());
}

#[tokio::test]
async fn test_anonymous_login_requires_customer_profile() {
    let mut repos = Repos::default();
    repos.profiles.expect_find_by_name().returning(|_| Ok(None));

    let result = authenticator(repos, noop(), false)
        .login_customer_anonymous()
        .await;

    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Customer profile"));
}
