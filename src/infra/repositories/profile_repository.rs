//! Profile repository.
//!
//! A profile's permissions and users are derived from the link tables and
//! loaded on hydration; `update` writes only the profile's own columns.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use super::base::{insert_row, scoped, update_row};
use super::entities::profile::{self, ActiveModel, Entity as ProfileEntity};
use super::hydrate::Hydrator;
use crate::domain::{Entity as _, Profile};
use crate::errors::AppResult;
use crate::infra::session::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Profile repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, profile: &Profile) -> AppResult<Profile>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>>;

    /// Lookup by unique name, soft-deleted rows included
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Profile>>;

    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Profile>>;

    async fn update(&self, profile: &Profile) -> AppResult<Profile>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct ProfileStore {
    session: Arc<Session>,
}

impl ProfileStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn create(&self, profile: &Profile) -> AppResult<Profile> {
        let session = self.session.acquire().await;
        insert_row(session.conn()?, ActiveModel::from(profile)).await?;
        session.identities().register(profile);
        Ok(profile.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        let session = self.session.acquire().await;
        if let Some(hit) = session.identities().resolve(id) {
            return Ok(Some(hit));
        }
        let hydrator = Hydrator::of(&session)?;
        match ProfileEntity::find_by_id(id).one(session.conn()?).await? {
            Some(model) => Ok(Some(hydrator.profile(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Profile>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = ProfileEntity::find()
            .filter(profile::Column::Name.eq(name))
            .one(session.conn()?)
            .await?;
        match model {
            Some(model) => Ok(Some(hydrator.profile(model).await?)),
            None => Ok(None),
        }
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let session = self.session.acquire().await;
        let count = ProfileEntity::find()
            .filter(profile::Column::Name.eq(name))
            .count(session.conn()?)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Profile>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = scoped::<ProfileEntity>(include_deleted)
            .all(session.conn()?)
            .await?;
        hydrator.profiles(models).await
    }

    async fn update(&self, profile: &Profile) -> AppResult<Profile> {
        let session = self.session.acquire().await;
        update_row(session.conn()?, ActiveModel::from(profile), Profile::NAME).await?;
        session.identities().register(profile);
        Ok(profile.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.session.acquire().await;
        ProfileEntity::delete_by_id(id).exec(session.conn()?).await?;
        session.identities().evict::<Profile>(id);
        Ok(())
    }
}
