//! Profile-permission link repository.
//!
//! Every write evicts the linked profile from the identity map so that its
//! derived permission list is reloaded on next access.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::base::{insert_row, scoped, update_row};
use super::entities::profile_permission::{self, ActiveModel, Entity as ProfilePermissionEntity};
use super::hydrate::Hydrator;
use crate::domain::{Entity as _, Profile, ProfilePermission};
use crate::errors::AppResult;
use crate::infra::session::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Profile-permission repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfilePermissionRepository: Send + Sync {
    async fn create(&self, link: &ProfilePermission) -> AppResult<ProfilePermission>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProfilePermission>>;

    async fn find_by_profile_id(&self, profile_id: Uuid) -> AppResult<Vec<ProfilePermission>>;

    async fn find_by_permission_id(
        &self,
        permission_id: Uuid,
    ) -> AppResult<Vec<ProfilePermission>>;

    /// Link for the exact pair, soft-deleted rows included
    async fn find_by_profile_id_and_permission_id(
        &self,
        profile_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<Option<ProfilePermission>>;

    async fn exists_by_profile_id_and_permission_id(
        &self,
        profile_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<bool>;

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<ProfilePermission>>;

    async fn update(&self, link: &ProfilePermission) -> AppResult<ProfilePermission>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct ProfilePermissionStore {
    session: Arc<Session>,
}

impl ProfilePermissionStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ProfilePermissionRepository for ProfilePermissionStore {
    async fn create(&self, link: &ProfilePermission) -> AppResult<ProfilePermission> {
        let session = self.session.acquire().await;
        insert_row(session.conn()?, ActiveModel::from(link)).await?;
        session.identities().evict::<Profile>(link.profile().id());
        session.identities().register(link);
        Ok(link.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProfilePermission>> {
        let session = self.session.acquire().await;
        if let Some(hit) = session.identities().resolve(id) {
            return Ok(Some(hit));
        }
        let hydrator = Hydrator::of(&session)?;
        match ProfilePermissionEntity::find_by_id(id)
            .one(session.conn()?)
            .await?
        {
            Some(model) => Ok(Some(hydrator.profile_permission(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_profile_id(&self, profile_id: Uuid) -> AppResult<Vec<ProfilePermission>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = ProfilePermissionEntity::find()
            .filter(profile_permission::Column::ProfileId.eq(profile_id))
            .order_by_asc(profile_permission::Column::CreatedAt)
            .all(session.conn()?)
            .await?;
        hydrator.profile_permissions(models).await
    }

    async fn find_by_permission_id(
        &self,
        permission_id: Uuid,
    ) -> AppResult<Vec<ProfilePermission>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = ProfilePermissionEntity::find()
            .filter(profile_permission::Column::PermissionId.eq(permission_id))
            .order_by_asc(profile_permission::Column::CreatedAt)
            .all(session.conn()?)
            .await?;
        hydrator.profile_permissions(models).await
    }

    async fn find_by_profile_id_and_permission_id(
        &self,
        profile_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<Option<ProfilePermission>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = ProfilePermissionEntity::find()
            .filter(profile_permission::Column::ProfileId.eq(profile_id))
            .filter(profile_permission::Column::PermissionId.eq(permission_id))
            .one(session.conn()?)
            .await?;
        match model {
            Some(model) => Ok(Some(hydrator.profile_permission(model).await?)),
            None => Ok(None),
        }
    }

    async fn exists_by_profile_id_and_permission_id(
        &self,
        profile_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<bool> {
        let session = self.session.acquire().await;
        let count = ProfilePermissionEntity::find()
            .filter(profile_permission::Column::ProfileId.eq(profile_id))
            .filter(profile_permission::Column::PermissionId.eq(permission_id))
            .count(session.conn()?)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<ProfilePermission>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = scoped::<ProfilePermissionEntity>(include_deleted)
            .all(session.conn()?)
            .await?;
        hydrator.profile_permissions(models).await
    }

    async fn update(&self, link: &ProfilePermission) -> AppResult<ProfilePermission> {
        let session = self.session.acquire().await;
        let identities = session.identities();
        // The link may have moved to a different profile.
        if let Some(previous) = identities.resolve::<ProfilePermission>(link.id()) {
            identities.evict::<Profile>(previous.profile().id());
        }
        update_row(
            session.conn()?,
            ActiveModel::from(link),
            ProfilePermission::NAME,
        )
        .await?;
        identities.evict::<Profile>(link.profile().id());
        identities.register(link);
        Ok(link.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.session.acquire().await;
        let model = ProfilePermissionEntity::find_by_id(id)
            .one(session.conn()?)
            .await?;
        ProfilePermissionEntity::delete_by_id(id)
            .exec(session.conn()?)
            .await?;
        if let Some(model) = model {
            session.identities().evict::<Profile>(model.profile_id);
        }
        session.identities().evict::<ProfilePermission>(id);
        Ok(())
    }
}
