//! ProfilePermission service - granting permissions to profiles.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::removal::{plan_removal, Removal};
use crate::domain::{DeletePolicy, Entity, Permission, Profile, ProfilePermission};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// ProfilePermission service trait for dependency injection.
#[async_trait]
pub trait ProfilePermissionService: Send + Sync {
    /// Grant `permission_id` to `profile_id`, reviving a revoked grant.
    async fn create_profile_permission(
        &self,
        profile_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<ProfilePermission>;

    async fn get_profile_permission(&self, id: Uuid) -> AppResult<ProfilePermission>;

    async fn get_profile_permissions_by_profile_id(
        &self,
        profile_id: Uuid,
    ) -> AppResult<Vec<ProfilePermission>>;

    async fn get_profile_permissions_by_permission_id(
        &self,
        permission_id: Uuid,
    ) -> AppResult<Vec<ProfilePermission>>;

    async fn list_profile_permissions(
        &self,
        include_deleted: bool,
    ) -> AppResult<Vec<ProfilePermission>>;

    async fn update_profile_permission(
        &self,
        id: Uuid,
        profile_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<ProfilePermission>;

    async fn delete_profile_permission(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProfilePermissionService using Unit of Work.
pub struct ProfilePermissionManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: DeletePolicy,
}

impl<U: UnitOfWork> ProfilePermissionManager<U> {
    pub fn new(uow: Arc<U>, policy: DeletePolicy) -> Self {
        Self { uow, policy }
    }

    async fn ends(&self, profile_id: Uuid, permission_id: Uuid) -> AppResult<(Profile, Permission)> {
        let profile = self
            .uow
            .profiles()
            .find_by_id(profile_id)
            .await?
            .ok_or_not_found(Profile::NAME)?;
        let permission = self
            .uow
            .permissions()
            .find_by_id(permission_id)
            .await?
            .ok_or_not_found(Permission::NAME)?;
        Ok((profile, permission))
    }
}

#[async_trait]
impl<U: UnitOfWork> ProfilePermissionService for ProfilePermissionManager<U> {
    async fn create_profile_permission(
        &self,
        profile_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<ProfilePermission> {
        let (profile, permission) = self.ends(profile_id, permission_id).await?;

        let links = self.uow.profile_permissions();
        match links
            .find_by_profile_id_and_permission_id(profile_id, permission_id)
            .await?
        {
            Some(existing) if !existing.is_deleted() => {
                Err(AppError::conflict(ProfilePermission::NAME))
            }
            Some(existing) => {
                let mut link = existing.relink(profile, permission);
                link.reactivate();
                let link = links.update(&link).await?;
                tracing::info!(id = %link.id(), "Profile permission reactivated");
                Ok(link)
            }
            None => {
                let link = links
                    .create(&ProfilePermission::new(profile, permission))
                    .await?;
                tracing::info!(
                    id = %link.id(),
                    profile = %link.profile().name(),
                    permission = %link.permission().name(),
                    "Permission granted"
                );
                Ok(link)
            }
        }
    }

    async fn get_profile_permission(&self, id: Uuid) -> AppResult<ProfilePermission> {
        self.uow
            .profile_permissions()
            .find_by_id(id)
            .await?
            .ok_or_not_found(ProfilePermission::NAME)
    }

    async fn get_profile_permissions_by_profile_id(
        &self,
        profile_id: Uuid,
    ) -> AppResult<Vec<ProfilePermission>> {
        self.uow
            .profile_permissions()
            .find_by_profile_id(profile_id)
            .await
    }

    async fn get_profile_permissions_by_permission_id(
        &self,
        permission_id: Uuid,
    ) -> AppResult<Vec<ProfilePermission>> {
        self.uow
            .profile_permissions()
            .find_by_permission_id(permission_id)
            .await
    }

    async fn list_profile_permissions(
        &self,
        include_deleted: bool,
    ) -> AppResult<Vec<ProfilePermission>> {
        self.uow.profile_permissions().list(include_deleted).await
    }

    async fn update_profile_permission(
        &self,
        id: Uuid,
        profile_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<ProfilePermission> {
        let links = self.uow.profile_permissions();
        let current = links
            .find_by_id(id)
            .await?
            .ok_or_not_found(ProfilePermission::NAME)?;
        let (profile, permission) = self.ends(profile_id, permission_id).await?;

        if let Some(other) = links
            .find_by_profile_id_and_permission_id(profile_id, permission_id)
            .await?
        {
            if other.id() != id {
                return Err(AppError::conflict(ProfilePermission::NAME));
            }
        }

        links.update(&current.relink(profile, permission)).await
    }

    async fn delete_profile_permission(&self, id: Uuid) -> AppResult<()> {
        let links = self.uow.profile_permissions();
        match plan_removal(self.policy, links.find_by_id(id).await?)? {
            Removal::Soft(link) => {
                links.update(&link).await?;
            }
            Removal::Hard(id) => links.delete(id).await?,
        }
        tracing::info!(id = %id, policy = %self.policy, "Profile permission deleted");
        Ok(())
    }
}
