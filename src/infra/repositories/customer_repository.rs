//! Customer repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::base::{insert_row, scoped, update_row};
use super::entities::customer::{self, ActiveModel, Entity as CustomerEntity};
use super::entities::person;
use super::hydrate::Hydrator;
use crate::domain::{Customer, Entity as _};
use crate::errors::AppResult;
use crate::infra::session::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Customer repository trait for dependency injection.
///
/// Writes persist only the customer row; the wrapped person is saved
/// through the person repository.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: &Customer) -> AppResult<Customer>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>>;

    async fn find_by_person_id(&self, person_id: Uuid) -> AppResult<Option<Customer>>;

    /// Customer whose person carries `cpf`
    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<Customer>>;

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Customer>>;

    async fn update(&self, customer: &Customer) -> AppResult<Customer>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct CustomerStore {
    session: Arc<Session>,
}

impl CustomerStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CustomerRepository for CustomerStore {
    async fn create(&self, customer: &Customer) -> AppResult<Customer> {
        let session = self.session.acquire().await;
        insert_row(session.conn()?, ActiveModel::from(customer)).await?;
        session.identities().register(customer);
        Ok(customer.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>> {
        let session = self.session.acquire().await;
        if let Some(hit) = session.identities().resolve(id) {
            return Ok(Some(hit));
        }
        let hydrator = Hydrator::of(&session)?;
        match CustomerEntity::find_by_id(id).one(session.conn()?).await? {
            Some(model) => Ok(Some(hydrator.customer(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_person_id(&self, person_id: Uuid) -> AppResult<Option<Customer>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = CustomerEntity::find()
            .filter(customer::Column::PersonId.eq(person_id))
            .one(session.conn()?)
            .await?;
        match model {
            Some(model) => Ok(Some(hydrator.customer(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<Customer>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = CustomerEntity::find()
            .inner_join(person::Entity)
            .filter(person::Column::Cpf.eq(cpf))
            .one(session.conn()?)
            .await?;
        match model {
            Some(model) => Ok(Some(hydrator.customer(model).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Customer>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = scoped::<CustomerEntity>(include_deleted)
            .all(session.conn()?)
            .await?;
        hydrator.customers(models).await
    }

    async fn update(&self, customer: &Customer) -> AppResult<Customer> {
        let session = self.session.acquire().await;
        update_row(session.conn()?, ActiveModel::from(customer), Customer::NAME).await?;
        session.identities().register(customer);
        Ok(customer.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.session.acquire().await;
        CustomerEntity::delete_by_id(id).exec(session.conn()?).await?;
        session.identities().evict::<Customer>(id);
        Ok(())
    }
}
