//! Permission repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use super::base::{insert_row, scoped, update_row};
use super::entities::permission::{self, ActiveModel, Entity as PermissionEntity};
use super::hydrate::Hydrator;
use crate::domain::{Entity as _, Permission};
use crate::errors::AppResult;
use crate::infra::session::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Permission repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn create(&self, permission: &Permission) -> AppResult<Permission>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>>;

    /// Lookup by unique name, soft-deleted rows included
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>>;

    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Permission>>;

    async fn update(&self, permission: &Permission) -> AppResult<Permission>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct PermissionStore {
    session: Arc<Session>,
}

impl PermissionStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl PermissionRepository for PermissionStore {
    async fn create(&self, permission: &Permission) -> AppResult<Permission> {
        let session = self.session.acquire().await;
        insert_row(session.conn()?, ActiveModel::from(permission)).await?;
        session.identities().register(permission);
        Ok(permission.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>> {
        let session = self.session.acquire().await;
        if let Some(hit) = session.identities().resolve(id) {
            return Ok(Some(hit));
        }
        let hydrator = Hydrator::of(&session)?;
        let model = PermissionEntity::find_by_id(id).one(session.conn()?).await?;
        Ok(model.map(|m| hydrator.permission(m)))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = PermissionEntity::find()
            .filter(permission::Column::Name.eq(name))
            .one(session.conn()?)
            .await?;
        Ok(model.map(|m| hydrator.permission(m)))
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let session = self.session.acquire().await;
        let count = PermissionEntity::find()
            .filter(permission::Column::Name.eq(name))
            .count(session.conn()?)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Permission>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = scoped::<PermissionEntity>(include_deleted)
            .all(session.conn()?)
            .await?;
        Ok(models.into_iter().map(|m| hydrator.permission(m)).collect())
    }

    async fn update(&self, permission: &Permission) -> AppResult<Permission> {
        let session = self.session.acquire().await;
        update_row(session.conn()?, ActiveModel::from(permission), Permission::NAME).await?;
        session.identities().register(permission);
        Ok(permission.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.session.acquire().await;
        PermissionEntity::delete_by_id(id).exec(session.conn()?).await?;
        session.identities().evict::<Permission>(id);
        Ok(())
    }
}
