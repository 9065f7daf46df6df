//! User repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use super::base::{insert_row, scoped, update_row};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::hydrate::Hydrator;
use crate::domain::{Entity as _, User};
use crate::errors::AppResult;
use crate::infra::session::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// `name` is the login username.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Lookup by unique name, soft-deleted rows included
    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;

    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<User>>;

    async fn update(&self, user: &User) -> AppResult<User>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct UserStore {
    session: Arc<Session>,
}

impl UserStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, user: &User) -> AppResult<User> {
        let session = self.session.acquire().await;
        insert_row(session.conn()?, ActiveModel::from(user)).await?;
        session.identities().register(user);
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let session = self.session.acquire().await;
        if let Some(hit) = session.identities().resolve(id) {
            return Ok(Some(hit));
        }
        let hydrator = Hydrator::of(&session)?;
        let model = UserEntity::find_by_id(id).one(session.conn()?).await?;
        Ok(model.map(|m| hydrator.user(m)))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = UserEntity::find()
            .filter(user::Column::Name.eq(name))
            .one(session.conn()?)
            .await?;
        Ok(model.map(|m| hydrator.user(m)))
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let session = self.session.acquire().await;
        let count = UserEntity::find()
            .filter(user::Column::Name.eq(name))
            .count(session.conn()?)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<User>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = scoped::<UserEntity>(include_deleted)
            .all(session.conn()?)
            .await?;
        Ok(models.into_iter().map(|m| hydrator.user(m)).collect())
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let session = self.session.acquire().await;
        update_row(session.conn()?, ActiveModel::from(user), User::NAME).await?;
        session.identities().register(user);
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.session.acquire().await;
        UserEntity::delete_by_id(id).exec(session.conn()?).await?;
        session.identities().evict::<User>(id);
        Ok(())
    }
}
