//! Person, customer and employee service tests.

mod common;

use std::sync::Arc;

use mockall::predicate::eq;
use uuid::Uuid;

use identity_service::domain::{DeletePolicy, Employee, EmploymentDates, Entity, Principal};
use identity_service::errors::AppError;
use identity_service::infra::{IdentityProvider, MockIdentityProvider};
use identity_service::services::{
    CustomerManager, CustomerService, EmployeeAssignment, EmployeeManager, EmployeeService,
    NewEmployee, PersonManager, PersonService, ServiceContext, Services,
};

use common::*;

fn caller(profile: &str, id: Uuid) -> Principal {
    Principal {
        id,
        name: "Caller".to_string(),
        profile: profile.to_string(),
        permissions: vec!["can_view_customers".to_string()],
    }
}

fn customers(repos: Repos) -> CustomerManager<TestUnitOfWork> {
    CustomerManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
}

fn employees(repos: Repos, policy: DeletePolicy) -> EmployeeManager<TestUnitOfWork> {
    EmployeeManager::new(TestUnitOfWork::new(repos), policy)
}

fn context(provider: MockIdentityProvider) -> ServiceContext {
    let provider: Arc<dyn IdentityProvider> = Arc::new(provider);
    ServiceContext::new(DeletePolicy::Soft, tokens(), provider, false)
}

/// Repositories accepting a brand new customer for `CPF`
fn fresh_sign_up() -> Repos {
    let mut repos = Repos::default();
    repos.persons.expect_find_by_cpf().returning(|_| Ok(None));
    repos.persons.expect_exists_by_email().returning(|_| Ok(false));
    repos
        .persons
        .expect_create()
        .times(1)
        .returning(|person| Ok(person.clone()));
    repos
        .customers
        .expect_find_by_person_id()
        .returning(|_| Ok(None));
    repos
        .customers
        .expect_create()
        .times(1)
        .returning(|customer| Ok(customer.clone()));
    repos
}

#[tokio::test]
async fn test_create_person_reactivates_by_cpf() {
    let mut deleted = person(CPF, "old@example.com");
    deleted.soft_delete().unwrap();
    let id = deleted.id();

    let mut repos = Repos::default();
    repos
        .persons
        .expect_find_by_cpf()
        .withf(|cpf| cpf == CPF)
        .returning(move |_| Ok(Some(deleted.clone())));
    repos
        .persons
        .expect_exists_by_email()
        .withf(|email| email == "ana@example.com")
        .returning(|_| Ok(false));
    repos
        .persons
        .expect_update()
        .times(1)
        .returning(|person| Ok(person.clone()));
    repos.persons.expect_create().never();

    let person = PersonManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .create_person(person_data("036.199.660-87", "ana@example.com"))
        .await
        .unwrap();

    assert_eq!(person.id(), id);
    assert!(!person.is_deleted());
    assert_eq!(person.email(), Some("ana@example.com"));
}

#[tokio::test]
async fn test_sign_up_syncs_after_commit() {
    let uow = TestUnitOfWork::new(fresh_sign_up());

    let mut provider = MockIdentityProvider::new();
    provider
        .expect_sync_user()
        .withf(|person| person.cpf() == Some(CPF))
        .times(1)
        .returning(|_| ());

    let customer = Services::sign_up_customer(
        uow.clone(),
        &context(provider),
        person_data(CPF, "ana@example.com"),
    )
    .await
    .unwrap();

    assert_eq!(customer.person().name(), "Ana Souza");
    assert!(!customer.is_deleted());
    assert_eq!(uow.commits(), 1);
}

#[tokio::test]
async fn test_sign_up_skips_sync_when_commit_fails() {
    let uow = TestUnitOfWork::failing_commit(fresh_sign_up());

    let mut provider = MockIdentityProvider::new();
    provider.expect_sync_user().never();

    let result = Services::sign_up_customer(
        uow.clone(),
        &context(provider),
        person_data(CPF, "ana@example.com"),
    )
    .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert_eq!(uow.commits(), 1);
}

#[tokio::test]
async fn test_rejected_sign_up_rolls_back_without_sync() {
    let mut repos = Repos::default();
    repos.persons.expect_find_by_cpf().returning(|_| Ok(None));
    repos.persons.expect_exists_by_email().returning(|_| Ok(true));
    let uow = TestUnitOfWork::new(repos);

    let mut provider = MockIdentityProvider::new();
    provider.expect_sync_user().never();

    let result = Services::sign_up_customer(
        uow.clone(),
        &context(provider),
        person_data(CPF, "taken@example.com"),
    )
    .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!((uow.commits(), uow.rollbacks()), (0, 1));
}

#[tokio::test]
async fn test_employee_can_sign_up_as_customer() {
    let staff = employee("employee", "joao.silva");
    let person = staff.person().clone();
    let person_id = person.id();

    let mut repos = Repos::default();
    repos
        .persons
        .expect_find_by_cpf()
        .withf(|cpf| cpf == OTHER_CPF)
        .returning(move |_| Ok(Some(person.clone())));
    repos
        .persons
        .expect_update()
        .times(1)
        .returning(|person| Ok(person.clone()));
    repos.persons.expect_create().never();
    repos
        .customers
        .expect_find_by_person_id()
        .with(eq(person_id))
        .returning(|_| Ok(None));
    repos
        .customers
        .expect_create()
        .times(1)
        .returning(|customer| Ok(customer.clone()));

    let customer = customers(repos)
        .create_customer(person_data(OTHER_CPF, "joao@example.com"))
        .await
        .unwrap();

    assert_eq!(customer.person().id(), person_id);
    assert!(!customer.is_deleted());
}

#[tokio::test]
async fn test_create_customer_rejects_taken_email() {
    let mut repos = Repos::default();
    repos.persons.expect_find_by_cpf().returning(|_| Ok(None));
    repos
        .persons
        .expect_exists_by_email()
        .withf(|email| email == "taken@example.com")
        .returning(|_| Ok(true));
    repos.persons.expect_create().never();
    repos.customers.expect_create().never();

    let result = customers(repos)
        .create_customer(person_data(CPF, "taken@example.com"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "Customer"));
}

#[tokio::test]
async fn test_create_customer_rejects_active_customer() {
    let existing = customer(CPF);
    let person = existing.person().clone();

    let mut repos = Repos::default();
    repos
        .persons
        .expect_find_by_cpf()
        .returning(move |_| Ok(Some(person.clone())));
    repos
        .persons
        .expect_update()
        .returning(|person| Ok(person.clone()));
    repos
        .customers
        .expect_find_by_person_id()
        .returning(move |_| Ok(Some(existing.clone())));
    repos.customers.expect_create().never();

    let result = customers(repos)
        .create_customer(person_data(CPF, "ana@example.com"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "Customer"));
}

#[tokio::test]
async fn test_customer_callers_only_reach_their_own_record() {
    let own = customer(CPF);
    let own_id = own.id();
    let other_id = Uuid::new_v4();

    // Another customer's record is reported as missing without a lookup
    let result = customers(Repos::default())
        .get_customer(&caller("customer", own_id), other_id)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Customer"));

    let mut repos = Repos::default();
    repos
        .customers
        .expect_find_by_id()
        .with(eq(own_id))
        .times(2)
        .returning(move |_| Ok(Some(own.clone())));
    let service = customers(repos);

    assert!(service
        .get_customer(&caller("customer", own_id), own_id)
        .await
        .is_ok());
    // Staff profiles are not restricted
    assert!(service
        .get_customer(&caller("employee", Uuid::new_v4()), own_id)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_list_customers_is_filtered_for_customers() {
    let (first, second) = (customer(CPF), customer(OTHER_CPF));
    let first_id = first.id();

    let mut repos = Repos::default();
    repos
        .customers
        .expect_list()
        .with(eq(false))
        .times(2)
        .returning(move |_| Ok(vec![first.clone(), second.clone()]));
    let service = customers(repos);

    let own = service
        .list_customers(&caller("customer", first_id), false)
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id(), first_id);

    let all = service
        .list_customers(&caller("manager", Uuid::new_v4()), false)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_update_customer_keeps_cpf() {
    let existing = customer(CPF);
    let id = existing.id();

    let mut repos = Repos::default();
    repos
        .customers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(existing.clone())));
    repos.customers.expect_update().never();
    repos.persons.expect_update().never();

    let result = customers(repos)
        .update_customer(
            &caller("customer", id),
            id,
            person_data(OTHER_CPF, "ana@example.com"),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Person"));
}

#[tokio::test]
async fn test_update_customer_rewrites_person() {
    let existing = customer(CPF);
    let id = existing.id();
    let person = existing.person().clone();

    let mut repos = Repos::default();
    repos
        .customers
        .expect_find_by_id()
        .returning(move |_| Ok(Some(existing.clone())));
    repos
        .persons
        .expect_find_by_id()
        .returning(move |_| Ok(Some(person.clone())));
    repos
        .persons
        .expect_exists_by_email()
        .withf(|email| email == "ana.souza@example.com")
        .returning(|_| Ok(false));
    repos
        .persons
        .expect_update()
        .times(1)
        .returning(|person| Ok(person.clone()));
    repos
        .customers
        .expect_update()
        .times(1)
        .returning(|customer| Ok(customer.clone()));

    let mut data = person_data(CPF, "ana.souza@example.com");
    data.name = "Ana Maria Souza".to_string();

    let updated = customers(repos)
        .update_customer(&caller("customer", id), id, data)
        .await
        .unwrap();

    assert_eq!(updated.id(), id);
    assert_eq!(updated.person().name(), "Ana Maria Souza");
    assert_eq!(updated.person().email(), Some("ana.souza@example.com"));
}

#[tokio::test]
async fn test_create_employee_requires_role() {
    let role_id = Uuid::new_v4();

    let mut repos = Repos::default();
    repos.persons.expect_find_by_cpf().returning(|_| Ok(None));
    repos.persons.expect_exists_by_email().returning(|_| Ok(false));
    repos.persons.expect_create().returning(|person| Ok(person.clone()));
    repos
        .roles
        .expect_find_by_id()
        .with(eq(role_id))
        .returning(|_| Ok(None));
    repos.employees.expect_create().never();

    let result = EmployeeManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .create_employee(NewEmployee {
            person: person_data(OTHER_CPF, "joao@example.com"),
            role_id,
            user_id: Uuid::new_v4(),
            dates: EmploymentDates::default(),
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Role"));
}

#[tokio::test]
async fn test_create_employee_reactivates_by_username() {
    let mut previous = employee("employee", "joao.silva");
    previous.soft_delete().unwrap();
    let previous_id = previous.id();
    let person = previous.person().clone();
    let role = role("manager");
    let user = previous.user().clone();
    let (role_id, user_id) = (role.id(), user.id());

    let mut repos = Repos::default();
    repos
        .persons
        .expect_find_by_cpf()
        .returning(move |_| Ok(Some(person.clone())));
    repos
        .persons
        .expect_update()
        .returning(|person| Ok(person.clone()));
    repos
        .roles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(role.clone())));
    repos
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    repos
        .employees
        .expect_find_by_username()
        .withf(|name| name == "joao.silva")
        .returning(move |_| Ok(Some(previous.clone())));
    repos
        .employees
        .expect_find_by_person_id()
        .returning(|_| Ok(None));
    repos
        .employees
        .expect_update()
        .withf(move |employee: &Employee| employee.id() == previous_id && !employee.is_deleted())
        .times(1)
        .returning(|employee| Ok(employee.clone()));
    repos.employees.expect_create().never();

    let employee = EmployeeManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .create_employee(NewEmployee {
            person: person_data(OTHER_CPF, "joao@example.com"),
            role_id,
            user_id,
            dates: EmploymentDates::default(),
        })
        .await
        .unwrap();

    assert_eq!(employee.id(), previous_id);
    assert!(employee.role().is_manager());
}

#[tokio::test]
async fn test_create_employee_rejects_active_match() {
    let active = employee("employee", "joao.silva");
    let person = active.person().clone();
    let role = active.role().clone();
    let user = active.user().clone();
    let (role_id, user_id) = (role.id(), user.id());

    let mut repos = Repos::default();
    repos
        .persons
        .expect_find_by_cpf()
        .returning(move |_| Ok(Some(person.clone())));
    repos
        .persons
        .expect_update()
        .returning(|person| Ok(person.clone()));
    repos
        .roles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(role.clone())));
    repos
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    repos.employees.expect_find_by_username().returning(|_| Ok(None));
    repos
        .employees
        .expect_find_by_person_id()
        .returning(move |_| Ok(Some(active.clone())));
    repos.employees.expect_create().never();
    repos.employees.expect_update().never();

    let result = EmployeeManager::new(TestUnitOfWork::new(repos), DeletePolicy::Soft)
        .create_employee(NewEmployee {
            person: person_data(OTHER_CPF, "joao@example.com"),
            role_id,
            user_id,
            dates: EmploymentDates::default(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "Employee"));
}

#[tokio::test]
async fn test_update_customer_rejects_inactive_customer() {
    let mut retired = customer(CPF);
    retired.soft_delete().unwrap();
    let id = retired.id();

    let mut repos = Repos::default();
    repos
        .customers
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(retired.clone())));
    repos.customers.expect_update().never();
    repos.persons.expect_update().never();

    let result = customers(repos)
        .update_customer(
            &caller("manager", Uuid::new_v4()),
            id,
            person_data(CPF, "ana@example.com"),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Customer"));
}

/// Repositories resolving the person, role and user of `target`
fn reassignment(target: &Employee) -> Repos {
    let (person, role, user) = (
        target.person().clone(),
        target.role().clone(),
        target.user().clone(),
    );

    let mut repos = Repos::default();
    repos
        .persons
        .expect_find_by_id()
        .returning(move |_| Ok(Some(person.clone())));
    repos
        .roles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(role.clone())));
    repos
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    repos
}

fn assignment_of(employee: &Employee) -> EmployeeAssignment {
    EmployeeAssignment {
        person_id: employee.person().id(),
        role_id: employee.role().id(),
        user_id: employee.user().id(),
        dates: EmploymentDates::default(),
    }
}

#[tokio::test]
async fn test_update_employee_reassigns_role() {
    let current = employee("employee", "joao.silva");
    let id = current.id();
    let promoted = Employee::new(
        current.person().clone(),
        role("manager"),
        current.user().clone(),
        EmploymentDates::default(),
    );

    let mut repos = reassignment(&promoted);
    let found = current.clone();
    repos
        .employees
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(found.clone())));
    // The employee already holds its own person and user
    let holder = current.clone();
    repos
        .employees
        .expect_find_by_person_id()
        .returning(move |_| Ok(Some(holder.clone())));
    let holder = current.clone();
    repos
        .employees
        .expect_find_by_user_id()
        .returning(move |_| Ok(Some(holder.clone())));
    repos
        .employees
        .expect_update()
        .withf(move |employee: &Employee| employee.id() == id)
        .times(1)
        .returning(|employee| Ok(employee.clone()));

    let updated = employees(repos, DeletePolicy::Soft)
        .update_employee(id, assignment_of(&promoted))
        .await
        .unwrap();

    assert_eq!(updated.id(), id);
    assert!(updated.role().is_manager());
}

#[tokio::test]
async fn test_update_employee_rejects_person_held_by_another() {
    let target = employee("employee", "joao.silva");
    let id = target.id();
    let holder = Employee::new(
        person(CPF, "ana@example.com"),
        role("employee"),
        user("ana.souza"),
        EmploymentDates::default(),
    );
    let reassigned = Employee::new(
        holder.person().clone(),
        target.role().clone(),
        target.user().clone(),
        EmploymentDates::default(),
    );

    let mut repos = reassignment(&reassigned);
    repos
        .employees
        .expect_find_by_id()
        .returning(move |_| Ok(Some(target.clone())));
    repos
        .employees
        .expect_find_by_person_id()
        .returning(move |_| Ok(Some(holder.clone())));
    repos.employees.expect_find_by_user_id().returning(|_| Ok(None));
    repos.employees.expect_update().never();

    let result = employees(repos, DeletePolicy::Soft)
        .update_employee(id, assignment_of(&reassigned))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "Employee"));
}

#[tokio::test]
async fn test_update_employee_rejects_user_held_by_retired_employee() {
    let target = employee("employee", "joao.silva");
    let id = target.id();
    let mut holder = Employee::new(
        person(CPF, "ana@example.com"),
        role("employee"),
        user("ana.souza"),
        EmploymentDates::default(),
    );
    holder.soft_delete().unwrap();
    let reassigned = Employee::new(
        target.person().clone(),
        target.role().clone(),
        holder.user().clone(),
        EmploymentDates::default(),
    );

    let mut repos = reassignment(&reassigned);
    let found = target.clone();
    repos
        .employees
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repos
        .employees
        .expect_find_by_person_id()
        .returning(move |_| Ok(Some(target.clone())));
    repos
        .employees
        .expect_find_by_user_id()
        .returning(move |_| Ok(Some(holder.clone())));
    repos.employees.expect_update().never();

    let result = employees(repos, DeletePolicy::Soft)
        .update_employee(id, assignment_of(&reassigned))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "Employee"));
}

#[tokio::test]
async fn test_update_employee_rejects_inactive_employee() {
    let mut retired = employee("employee", "joao.silva");
    retired.soft_delete().unwrap();
    let id = retired.id();
    let assignment = assignment_of(&retired);

    let mut repos = Repos::default();
    repos
        .employees
        .expect_find_by_id()
        .returning(move |_| Ok(Some(retired.clone())));
    repos.employees.expect_update().never();

    let result = employees(repos, DeletePolicy::Soft)
        .update_employee(id, assignment)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Employee"));
}

#[tokio::test]
async fn test_create_employee_rejects_two_retired_matches() {
    let mut by_user = employee("employee", "joao.silva");
    by_user.soft_delete().unwrap();
    let mut by_person = Employee::new(
        by_user.person().clone(),
        role("employee"),
        user("joao.old"),
        EmploymentDates::default(),
    );
    by_person.soft_delete().unwrap();

    let person = by_user.person().clone();
    let role = by_user.role().clone();
    let user = by_user.user().clone();
    let (role_id, user_id) = (role.id(), user.id());

    let mut repos = Repos::default();
    repos
        .persons
        .expect_find_by_cpf()
        .returning(move |_| Ok(Some(person.clone())));
    repos
        .persons
        .expect_update()
        .returning(|person| Ok(person.clone()));
    repos
        .roles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(role.clone())));
    repos
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    repos
        .employees
        .expect_find_by_username()
        .returning(move |_| Ok(Some(by_user.clone())));
    repos
        .employees
        .expect_find_by_person_id()
        .returning(move |_| Ok(Some(by_person.clone())));
    repos.employees.expect_update().never();
    repos.employees.expect_create().never();

    let result = employees(repos, DeletePolicy::Soft)
        .create_employee(NewEmployee {
            person: person_data(OTHER_CPF, "joao@example.com"),
            role_id,
            user_id,
            dates: EmploymentDates::default(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "Employee"));
}

#[tokio::test]
async fn test_delete_employee_soft_then_not_found() {
    let active = employee("employee", "joao.silva");
    let id = active.id();

    let mut repos = Repos::default();
    repos
        .employees
        .expect_find_by_id()
        .returning(move |_| Ok(Some(active.clone())));
    repos
        .employees
        .expect_update()
        .withf(|employee: &Employee| employee.is_deleted())
        .times(1)
        .returning(|employee| Ok(employee.clone()));
    repos.employees.expect_delete().never();

    employees(repos, DeletePolicy::Soft)
        .delete_employee(id)
        .await
        .unwrap();

    let mut retired = employee("employee", "joao.silva");
    retired.soft_delete().unwrap();
    let mut repos = Repos::default();
    repos
        .employees
        .expect_find_by_id()
        .returning(move |_| Ok(Some(retired.clone())));
    repos.employees.expect_update().never();

    let result = employees(repos, DeletePolicy::Soft).delete_employee(id).await;
    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Employee"));
}

#[tokio::test]
async fn test_delete_employee_hard_removes_row() {
    let active = employee("employee", "joao.silva");
    let id = active.id();

    let mut repos = Repos::default();
    repos
        .employees
        .expect_find_by_id()
        .returning(move |_| Ok(Some(active.clone())));
    repos
        .employees
        .expect_delete()
        .with(eq(id))
        .times(1)
        .returning(|_| Ok(()));
    repos.employees.expect_update().never();

    employees(repos, DeletePolicy::Hard)
        .delete_employee(id)
        .await
        .unwrap();
}
