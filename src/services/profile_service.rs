//! Profile service - Profile CRUD use cases.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::removal::{plan_removal, Removal};
use crate::domain::{DeletePolicy, Entity, Profile, ProfileData};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Profile service trait for dependency injection.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Create a profile, reactivating a soft-deleted one with the same name
    async fn create_profile(&self, data: ProfileData) -> AppResult<Profile>;

    /// Get profile by id, soft-deleted included
    async fn get_profile(&self, id: Uuid) -> AppResult<Profile>;

    async fn get_profile_by_name(&self, name: &str) -> AppResult<Profile>;

    async fn list_profiles(&self, include_deleted: bool) -> AppResult<Vec<Profile>>;

    async fn update_profile(&self, id: Uuid, data: ProfileData) -> AppResult<Profile>;

    async fn delete_profile(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProfileService using Unit of Work.
pub struct ProfileManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: DeletePolicy,
}

impl<U: UnitOfWork> ProfileManager<U> {
    pub fn new(uow: Arc<U>, policy: DeletePolicy) -> Self {
        Self { uow, policy }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProfileService for ProfileManager<U> {
    async fn create_profile(&self, data: ProfileData) -> AppResult<Profile> {
        let profiles = self.uow.profiles();
        match profiles.find_by_name(data.name.trim()).await? {
            Some(existing) if !existing.is_deleted() => Err(AppError::conflict(Profile::NAME)),
            Some(existing) => {
                let mut profile = existing.revise(data)?;
                profile.reactivate();
                let profile = profiles.update(&profile).await?;
                tracing::info!(id = %profile.id(), name = %profile.name(), "Profile reactivated");
                Ok(profile)
            }
            None => {
                let profile = profiles.create(&Profile::new(data)?).await?;
                tracing::info!(id = %profile.id(), name = %profile.name(), "Profile created");
                Ok(profile)
            }
        }
    }

    async fn get_profile(&self, id: Uuid) -> AppResult<Profile> {
        self.uow
            .profiles()
            .find_by_id(id)
            .await?
            .ok_or_not_found(Profile::NAME)
    }

    async fn get_profile_by_name(&self, name: &str) -> AppResult<Profile> {
        self.uow
            .profiles()
            .find_by_name(name)
            .await?
            .ok_or_not_found(Profile::NAME)
    }

    async fn list_profiles(&self, include_deleted: bool) -> AppResult<Vec<Profile>> {
        self.uow.profiles().list(include_deleted).await
    }

    async fn update_profile(&self, id: Uuid, data: ProfileData) -> AppResult<Profile> {
        let profiles = self.uow.profiles();
        let current = profiles.find_by_id(id).await?.ok_or_not_found(Profile::NAME)?;

        // Renaming onto another profile's name
        if let Some(other) = profiles.find_by_name(data.name.trim()).await? {
            if other.id() != id {
                return Err(AppError::conflict(Profile::NAME));
            }
        }

        profiles.update(&current.revise(data)?).await
    }

    async fn delete_profile(&self, id: Uuid) -> AppResult<()> {
        let profiles = self.uow.profiles();
        match plan_removal(self.policy, profiles.find_by_id(id).await?)? {
            Removal::Soft(profile) => {
                profiles.update(&profile).await?;
            }
            Removal::Hard(id) => profiles.delete(id).await?,
        }
        tracing::info!(id = %id, policy = %self.policy, "Profile deleted");
        Ok(())
    }
}
