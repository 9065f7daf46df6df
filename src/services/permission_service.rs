//! Permission service - Permission CRUD use cases.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::removal::{plan_removal, Removal};
use crate::domain::{DeletePolicy, Entity, Permission, PermissionData};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Permission service trait for dependency injection.
#[async_trait]
pub trait PermissionService: Send + Sync {
    /// Create a permission, reactivating a soft-deleted one with the same name
    async fn create_permission(&self, data: PermissionData) -> AppResult<Permission>;

    /// Get permission by id, soft-deleted included
    async fn get_permission(&self, id: Uuid) -> AppResult<Permission>;

    async fn get_permission_by_name(&self, name: &str) -> AppResult<Permission>;

    async fn list_permissions(&self, include_deleted: bool) -> AppResult<Vec<Permission>>;

    async fn update_permission(&self, id: Uuid, data: PermissionData) -> AppResult<Permission>;

    async fn delete_permission(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of PermissionService using Unit of Work.
pub struct PermissionManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: DeletePolicy,
}

impl<U: UnitOfWork> PermissionManager<U> {
    pub fn new(uow: Arc<U>, policy: DeletePolicy) -> Self {
        Self { uow, policy }
    }
}

#[async_trait]
impl<U: UnitOfWork> PermissionService for PermissionManager<U> {
    async fn create_permission(&self, data: PermissionData) -> AppResult<Permission> {
        let permissions = self.uow.permissions();
        match permissions.find_by_name(data.name.trim()).await? {
            Some(existing) if !existing.is_deleted() => Err(AppError::conflict(Permission::NAME)),
            Some(existing) => {
                let mut permission = existing.revise(data)?;
                permission.reactivate();
                let permission = permissions.update(&permission).await?;
                tracing::info!(id = %permission.id(), name = %permission.name(), "Permission reactivated");
                Ok(permission)
            }
            None => {
                let permission = permissions.create(&Permission::new(data)?).await?;
                tracing::info!(id = %permission.id(), name = %permission.name(), "Permission created");
                Ok(permission)
            }
        }
    }

    async fn get_permission(&self, id: Uuid) -> AppResult<Permission> {
        self.uow
            .permissions()
            .find_by_id(id)
            .await?
            .ok_or_not_found(Permission::NAME)
    }

    async fn get_permission_by_name(&self, name: &str) -> AppResult<Permission> {
        self.uow
            .permissions()
            .find_by_name(name)
            .await?
            .ok_or_not_found(Permission::NAME)
    }

    async fn list_permissions(&self, include_deleted: bool) -> AppResult<Vec<Permission>> {
        self.uow.permissions().list(include_deleted).await
    }

    async fn update_permission(&self, id: Uuid, data: PermissionData) -> AppResult<Permission> {
        let permissions = self.uow.permissions();
        let current = permissions.find_by_id(id).await?.ok_or_not_found(Permission::NAME)?;

        // Renaming onto another permission's name
        if let Some(other) = permissions.find_by_name(data.name.trim()).await? {
            if other.id() != id {
                return Err(AppError::conflict(Permission::NAME));
            }
        }

        permissions.update(&current.revise(data)?).await
    }

    async fn delete_permission(&self, id: Uuid) -> AppResult<()> {
        let permissions = self.uow.permissions();
        match plan_removal(self.policy, permissions.find_by_id(id).await?)? {
            Removal::Soft(permission) => {
                permissions.update(&permission).await?;
            }
            Removal::Hard(id) => permissions.delete(id).await?,
        }
        tracing::info!(id = %id, policy = %self.policy, "Permission deleted");
        Ok(())
    }
}
