//! UserProfile service - assigning profiles to users.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::removal::{plan_removal, Removal};
use crate::domain::{DeletePolicy, Entity, Profile, User, UserProfile};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// UserProfile service trait for dependency injection.
#[async_trait]
pub trait UserProfileService: Send + Sync {
    /// Assign `profile_id` to `user_id`, reviving a revoked assignment.
    async fn create_user_profile(&self, user_id: Uuid, profile_id: Uuid)
        -> AppResult<UserProfile>;

    async fn get_user_profile(&self, id: Uuid) -> AppResult<UserProfile>;

    async fn get_user_profile_by_user_id_and_profile_id(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> AppResult<UserProfile>;

    async fn get_user_profiles_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<UserProfile>>;

    async fn list_user_profiles(&self, include_deleted: bool) -> AppResult<Vec<UserProfile>>;

    async fn update_user_profile(
        &self,
        id: Uuid,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> AppResult<UserProfile>;

    async fn delete_user_profile(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserProfileService using Unit of Work.
pub struct UserProfileManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: DeletePolicy,
}

impl<U: UnitOfWork> UserProfileManager<U> {
    pub fn new(uow: Arc<U>, policy: DeletePolicy) -> Self {
        Self { uow, policy }
    }

    async fn ends(&self, user_id: Uuid, profile_id: Uuid) -> AppResult<(User, Profile)> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found(User::NAME)?;
        let profile = self
            .uow
            .profiles()
            .find_by_id(profile_id)
            .await?
            .ok_or_not_found(Profile::NAME)?;
        Ok((user, profile))
    }
}

#[async_trait]
impl<U: UnitOfWork> UserProfileService for UserProfileManager<U> {
    async fn create_user_profile(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> AppResult<UserProfile> {
        let (user, profile) = self.ends(user_id, profile_id).await?;

        let links = self.uow.user_profiles();
        match links
            .find_by_user_id_and_profile_id(user_id, profile_id)
            .await?
        {
            Some(existing) if !existing.is_deleted() => Err(AppError::conflict(UserProfile::NAME)),
            Some(existing) => {
                let mut link = existing.relink(user, profile);
                link.reactivate();
                let link = links.update(&link).await?;
                tracing::info!(id = %link.id(), "User profile reactivated");
                Ok(link)
            }
            None => {
                let link = links.create(&UserProfile::new(user, profile)).await?;
                tracing::info!(
                    id = %link.id(),
                    user = %link.user().name(),
                    profile = %link.profile().name(),
                    "Profile assigned"
                );
                Ok(link)
            }
        }
    }

    async fn get_user_profile(&self, id: Uuid) -> AppResult<UserProfile> {
        self.uow
            .user_profiles()
            .find_by_id(id)
            .await?
            .ok_or_not_found(UserProfile::NAME)
    }

    async fn get_user_profile_by_user_id_and_profile_id(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> AppResult<UserProfile> {
        self.uow
            .user_profiles()
            .find_by_user_id_and_profile_id(user_id, profile_id)
            .await?
            .ok_or_not_found(UserProfile::NAME)
    }

    async fn get_user_profiles_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<UserProfile>> {
        self.uow.user_profiles().find_by_user_id(user_id).await
    }

    async fn list_user_profiles(&self, include_deleted: bool) -> AppResult<Vec<UserProfile>> {
        self.uow.user_profiles().list(include_deleted).await
    }

    async fn update_user_profile(
        &self,
        id: Uuid,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> AppResult<UserProfile> {
        let links = self.uow.user_profiles();
        let current = links
            .find_by_id(id)
            .await?
            .ok_or_not_found(UserProfile::NAME)?;
        let (user, profile) = self.ends(user_id, profile_id).await?;

        if let Some(other) = links
            .find_by_user_id_and_profile_id(user_id, profile_id)
            .await?
        {
            if other.id() != id {
                return Err(AppError::conflict(UserProfile::NAME));
            }
        }

        links.update(&current.relink(user, profile)).await
    }

    async fn delete_user_profile(&self, id: Uuid) -> AppResult<()> {
        let links = self.uow.user_profiles();
        match plan_removal(self.policy, links.find_by_id(id).await?)? {
            Removal::Soft(link) => {
                links.update(&link).await?;
            }
            Removal::Hard(id) => links.delete(id).await?,
        }
        tracing::info!(id = %id, policy = %self.policy, "User profile deleted");
        Ok(())
    }
}
