//! Customer service - sign-up and customer maintenance.
//!
//! Callers holding the customer profile only ever see their own record;
//! anything else is reported as not found.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::person_service::upsert_person;
use super::removal::{plan_removal, Removal};
use crate::domain::{Cpf, Customer, DeletePolicy, Entity, Person, PersonData, Principal};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Customer service trait for dependency injection.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Sign up a customer, reusing (and refreshing) the person with the
    /// same CPF. Pushing the new customer to the identity provider is left
    /// to the caller, once the unit of work has committed.
    async fn create_customer(&self, data: PersonData) -> AppResult<Customer>;

    async fn get_customer(&self, caller: &Principal, id: Uuid) -> AppResult<Customer>;

    async fn get_customer_by_person_id(
        &self,
        caller: &Principal,
        person_id: Uuid,
    ) -> AppResult<Customer>;

    async fn list_customers(
        &self,
        caller: &Principal,
        include_deleted: bool,
    ) -> AppResult<Vec<Customer>>;

    /// Rewrite the customer's person details. The CPF itself cannot change.
    async fn update_customer(
        &self,
        caller: &Principal,
        id: Uuid,
        data: PersonData,
    ) -> AppResult<Customer>;

    async fn delete_customer(&self, caller: &Principal, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CustomerService using Unit of Work.
pub struct CustomerManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: DeletePolicy,
}

impl<U: UnitOfWork> CustomerManager<U> {
    pub fn new(uow: Arc<U>, policy: DeletePolicy) -> Self {
        Self { uow, policy }
    }

    fn ensure_access(caller: &Principal, customer_id: Uuid) -> AppResult<()> {
        if caller.can_access_customer(customer_id) {
            Ok(())
        } else {
            Err(AppError::not_found(Customer::NAME))
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CustomerService for CustomerManager<U> {
    async fn create_customer(&self, data: PersonData) -> AppResult<Customer> {
        let person = upsert_person(self.uow.persons().as_ref(), data, Customer::NAME).await?;

        let customers = self.uow.customers();
        match customers.find_by_person_id(person.id()).await? {
            Some(existing) if !existing.is_deleted() => {
                return Err(AppError::conflict(Customer::NAME))
            }
            Some(existing) => {
                let mut customer = existing.with_person(person);
                customer.reactivate();
                let customer = customers.update(&customer).await?;
                tracing::info!(id = %customer.id(), "Customer reactivated");
                Ok(customer)
            }
            None => {
                let customer = customers.create(&Customer::new(person)).await?;
                tracing::info!(id = %customer.id(), "Customer created");
                Ok(customer)
            }
        }
    }

    async fn get_customer(&self, caller: &Principal, id: Uuid) -> AppResult<Customer> {
        Self::ensure_access(caller, id)?;
        self.uow
            .customers()
            .find_by_id(id)
            .await?
            .ok_or_not_found(Customer::NAME)
    }

    async fn get_customer_by_person_id(
        &self,
        caller: &Principal,
        person_id: Uuid,
    ) -> AppResult<Customer> {
        let customer = self
            .uow
            .customers()
            .find_by_person_id(person_id)
            .await?
            .ok_or_not_found(Customer::NAME)?;
        Self::ensure_access(caller, customer.id())?;
        Ok(customer)
    }

    async fn list_customers(
        &self,
        caller: &Principal,
        include_deleted: bool,
    ) -> AppResult<Vec<Customer>> {
        let customers = self.uow.customers().list(include_deleted).await?;
        Ok(customers
            .into_iter()
            .filter(|customer| caller.can_access_customer(customer.id()))
            .collect())
    }

    async fn update_customer(
        &self,
        caller: &Principal,
        id: Uuid,
        data: PersonData,
    ) -> AppResult<Customer> {
        Self::ensure_access(caller, id)?;

        let customers = self.uow.customers();
        let customer = customers
            .find_by_id(id)
            .await?
            .filter(|customer| !customer.is_deleted())
            .ok_or_not_found(Customer::NAME)?;

        let submitted = data
            .cpf
            .as_deref()
            .map(Cpf::parse)
            .transpose()?;
        if customer.person().cpf() != submitted.as_ref().map(|cpf| cpf.as_str()) {
            return Err(AppError::not_found(Person::NAME));
        }

        let persons = self.uow.persons();
        let person = persons
            .find_by_id(customer.person().id())
            .await?
            .ok_or_not_found(Person::NAME)?;
        if let Some(email) = data.email.as_deref().map(str::trim) {
            if person.email() != Some(email) && persons.exists_by_email(email).await? {
                return Err(AppError::conflict(Customer::NAME));
            }
        }
        let person = persons.update(&person.revise(data)?).await?;

        let customer = customers.update(&customer.with_person(person)).await?;
        tracing::info!(id = %customer.id(), "Customer updated");
        Ok(customer)
    }

    async fn delete_customer(&self, caller: &Principal, id: Uuid) -> AppResult<()> {
        Self::ensure_access(caller, id)?;

        let customers = self.uow.customers();
        match plan_removal(self.policy, customers.find_by_id(id).await?)? {
            Removal::Soft(customer) => {
                customers.update(&customer).await?;
            }
            Removal::Hard(id) => customers.delete(id).await?,
        }
        tracing::info!(id = %id, policy = %self.policy, "Customer deleted");
        Ok(())
    }
}
