//! Role repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use super::base::{insert_row, scoped, update_row};
use super::entities::role::{self, ActiveModel, Entity as RoleEntity};
use super::hydrate::Hydrator;
use crate::domain::{Entity as _, Role};
use crate::errors::AppResult;
use crate::infra::session::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn create(&self, role: &Role) -> AppResult<Role>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    /// Lookup by unique name, soft-deleted rows included
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Role>>;

    async fn update(&self, role: &Role) -> AppResult<Role>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct RoleStore {
    session: Arc<Session>,
}

impl RoleStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn create(&self, role: &Role) -> AppResult<Role> {
        let session = self.session.acquire().await;
        insert_row(session.conn()?, ActiveModel::from(role)).await?;
        session.identities().register(role);
        Ok(role.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        let session = self.session.acquire().await;
        if let Some(hit) = session.identities().resolve(id) {
            return Ok(Some(hit));
        }
        let hydrator = Hydrator::of(&session)?;
        let model = RoleEntity::find_by_id(id).one(session.conn()?).await?;
        Ok(model.map(|m| hydrator.role(m)))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(session.conn()?)
            .await?;
        Ok(model.map(|m| hydrator.role(m)))
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let session = self.session.acquire().await;
        let count = RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .count(session.conn()?)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Role>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = scoped::<RoleEntity>(include_deleted)
            .all(session.conn()?)
            .await?;
        Ok(models.into_iter().map(|m| hydrator.role(m)).collect())
    }

    async fn update(&self, role: &Role) -> AppResult<Role> {
        let session = self.session.acquire().await;
        update_row(session.conn()?, ActiveModel::from(role), Role::NAME).await?;
        session.identities().register(role);
        Ok(role.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.session.acquire().await;
        RoleEntity::delete_by_id(id).exec(session.conn()?).await?;
        session.identities().evict::<Role>(id);
        Ok(())
    }
}
