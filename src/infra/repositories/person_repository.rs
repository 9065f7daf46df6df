//! Person repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use super::base::{insert_row, scoped, update_row};
use super::entities::person::{self, ActiveModel, Entity as PersonEntity};
use super::hydrate::Hydrator;
use crate::domain::{Entity as _, Person};
use crate::errors::AppResult;
use crate::infra::session::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Person repository trait for dependency injection.
///
/// Lookups by id and cpf return soft-deleted rows too; only `list`
/// filters them out.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn create(&self, person: &Person) -> AppResult<Person>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Person>>;

    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<Person>>;

    async fn exists_by_cpf(&self, cpf: &str) -> AppResult<bool>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Person>>;

    /// Overwrite an existing person; `NotFound` if the id is unknown
    async fn update(&self, person: &Person) -> AppResult<Person>;

    /// Remove the row; unknown ids are ignored
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed person repository bound to a request session
pub struct PersonStore {
    session: Arc<Session>,
}

impl PersonStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl PersonRepository for PersonStore {
    async fn create(&self, person: &Person) -> AppResult<Person> {
        let session = self.session.acquire().await;
        insert_row(session.conn()?, ActiveModel::from(person)).await?;
        session.identities().register(person);
        Ok(person.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Person>> {
        let session = self.session.acquire().await;
        if let Some(hit) = session.identities().resolve(id) {
            return Ok(Some(hit));
        }
        let hydrator = Hydrator::of(&session)?;
        let model = PersonEntity::find_by_id(id).one(session.conn()?).await?;
        Ok(model.map(|m| hydrator.person(m)))
    }

    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<Person>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = PersonEntity::find()
            .filter(person::Column::Cpf.eq(cpf))
            .one(session.conn()?)
            .await?;
        Ok(model.map(|m| hydrator.person(m)))
    }

    async fn exists_by_cpf(&self, cpf: &str) -> AppResult<bool> {
        let session = self.session.acquire().await;
        let count = PersonEntity::find()
            .filter(person::Column::Cpf.eq(cpf))
            .count(session.conn()?)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let session = self.session.acquire().await;
        let count = PersonEntity::find()
            .filter(person::Column::Email.eq(email))
            .count(session.conn()?)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Person>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = scoped::<PersonEntity>(include_deleted)
            .all(session.conn()?)
            .await?;
        Ok(models.into_iter().map(|m| hydrator.person(m)).collect())
    }

    async fn update(&self, person: &Person) -> AppResult<Person> {
        let session = self.session.acquire().await;
        update_row(session.conn()?, ActiveModel::from(person), Person::NAME).await?;
        session.identities().register(person);
        Ok(person.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.session.acquire().await;
        PersonEntity::delete_by_id(id).exec(session.conn()?).await?;
        session.identities().evict::<Person>(id);
        Ok(())
    }
}
