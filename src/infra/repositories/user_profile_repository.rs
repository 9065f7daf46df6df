//! User-profile link repository.
//!
//! Writes evict the linked profile from the identity map so its derived
//! user list is reloaded on next access.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::base::{insert_row, scoped, update_row};
use super::entities::user_profile::{self, ActiveModel, Entity as UserProfileEntity};
use super::hydrate::Hydrator;
use crate::domain::{Entity as _, Profile, UserProfile};
use crate::errors::AppResult;
use crate::infra::session::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    async fn create(&self, link: &UserProfile) -> AppResult<UserProfile>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<UserProfile>>;

    /// Link for the exact pair, soft-deleted rows included
    async fn find_by_user_id_and_profile_id(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> AppResult<Option<UserProfile>>;

    async fn exists_by_user_id_and_profile_id(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> AppResult<bool>;

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<UserProfile>>;

    async fn update(&self, link: &UserProfile) -> AppResult<UserProfile>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct UserProfileStore {
    session: Arc<Session>,
}

impl UserProfileStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UserProfileRepository for UserProfileStore {
    async fn create(&self, link: &UserProfile) -> AppResult<UserProfile> {
        let session = self.session.acquire().await;
        insert_row(session.conn()?, ActiveModel::from(link)).await?;
        session.identities().evict::<Profile>(link.profile().id());
        session.identities().register(link);
        Ok(link.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        let session = self.session.acquire().await;
        if let Some(hit) = session.identities().resolve(id) {
            return Ok(Some(hit));
        }
        let hydrator = Hydrator::of(&session)?;
        match UserProfileEntity::find_by_id(id).one(session.conn()?).await? {
            Some(model) => Ok(Some(hydrator.user_profile(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<UserProfile>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = UserProfileEntity::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .order_by_asc(user_profile::Column::CreatedAt)
            .all(session.conn()?)
            .await?;
        hydrator.user_profiles(models).await
    }

    async fn find_by_user_id_and_profile_id(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> AppResult<Option<UserProfile>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = UserProfileEntity::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .filter(user_profile::Column::ProfileId.eq(profile_id))
            .one(session.conn()?)
            .await?;
        match model {
            Some(model) => Ok(Some(hydrator.user_profile(model).await?)),
            None => Ok(None),
        }
    }

    async fn exists_by_user_id_and_profile_id(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> AppResult<bool> {
        let session = self.session.acquire().await;
        let count = UserProfileEntity::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .filter(user_profile::Column::ProfileId.eq(profile_id))
            .count(session.conn()?)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<UserProfile>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = scoped::<UserProfileEntity>(include_deleted)
            .all(session.conn()?)
            .await?;
        hydrator.user_profiles(models).await
    }

    async fn update(&self, link: &UserProfile) -> AppResult<UserProfile> {
        let session = self.session.acquire().await;
        let identities = session.identities();
        if let Some(previous) = identities.resolve::<UserProfile>(link.id()) {
            identities.evict::<Profile>(previous.profile().id());
        }
        update_row(session.conn()?, ActiveModel::from(link), UserProfile::NAME).await?;
        identities.evict::<Profile>(link.profile().id());
        identities.register(link);
        Ok(link.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.session.acquire().await;
        let model = UserProfileEntity::find_by_id(id)
            .one(session.conn()?)
            .await?;
        UserProfileEntity::delete_by_id(id)
            .exec(session.conn()?)
            .await?;
        if let Some(model) = model {
            session.identities().evict::<Profile>(model.profile_id);
        }
        session.identities().evict::<UserProfile>(id);
        Ok(())
    }
}
